use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use insighthub_macros::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields;
use super::ValidationError;

/// How a report's datasets are charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Pie,
    Area,
}

impl ChartType {
    pub const ALL: [ChartType; 4] = [ChartType::Line, ChartType::Bar, ChartType::Pie, ChartType::Area];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Pie => "pie",
            ChartType::Area => "area",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                ValidationError::new(
                    "chartType",
                    format!("{s:?} is not one of line, bar, pie, area"),
                )
            })
    }
}

/// A saved report definition.
///
/// `dataset_ids` are informal references: nothing checks that points exist
/// for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
#[document(collection = "reports")]
pub struct Report {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dataset_ids: Vec<String>,
    pub chart_type: ChartType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// The dataset a dashboard shows when this report is opened.
    pub fn primary_dataset(&self) -> Option<&str> {
        self.dataset_ids.first().map(String::as_str)
    }
}

/// A validated report definition.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub title: String,
    pub description: String,
    pub dataset_ids: Vec<String>,
    pub chart_type: ChartType,
}

impl NewReport {
    /// Validate a raw JSON body. Only `chartType` is required.
    pub fn from_json(body: Value) -> Result<Self, ValidationError> {
        let obj = fields::object(body)?;

        Ok(Self {
            title: fields::optional_str(&obj, "title")?.unwrap_or_default(),
            description: fields::optional_str(&obj, "description")?.unwrap_or_default(),
            dataset_ids: fields::optional_str_list(&obj, "datasetIds")?.unwrap_or_default(),
            chart_type: fields::required_str(&obj, "chartType")?.parse()?,
        })
    }

    pub fn into_report(self, now: DateTime<Utc>) -> Report {
        Report {
            id: String::new(),
            title: self.title,
            description: self.description,
            dataset_ids: self.dataset_ids,
            chart_type: self.chart_type,
            created_at: now,
            updated_at: now,
        }
    }
}
