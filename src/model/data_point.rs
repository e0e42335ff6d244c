use chrono::{DateTime, Utc};
use insighthub_macros::Document;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields;
use super::ValidationError;

/// A timestamped measurement in a dataset. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Document)]
#[serde(rename_all = "camelCase")]
#[document(collection = "datapoints")]
pub struct DataPoint {
    #[serde(rename = "_id")]
    pub id: String,
    pub dataset_id: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub category: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// A validated ingest request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDataPoint {
    pub dataset_id: String,
    pub value: f64,
    pub category: String,
    /// Defaults to the insert time when absent.
    pub timestamp: Option<DateTime<Utc>>,
    pub metadata: Map<String, Value>,
}

impl NewDataPoint {
    /// Validate a raw JSON body.
    ///
    /// `datasetId`, `value` and `category` are required. Unknown fields are
    /// ignored and `null` counts as absent.
    pub fn from_json(body: Value) -> Result<Self, ValidationError> {
        let obj = fields::object(body)?;

        let dataset_id = fields::required_str(&obj, "datasetId")?;
        if dataset_id.is_empty() {
            return Err(ValidationError::new("datasetId", "must not be empty"));
        }

        Ok(Self {
            dataset_id,
            value: fields::required_number(&obj, "value")?,
            category: fields::required_str(&obj, "category")?,
            timestamp: fields::optional_timestamp(&obj, "timestamp")?,
            metadata: fields::optional_object(&obj, "metadata")?.unwrap_or_default(),
        })
    }

    /// Build the record to store. The id is assigned by the store.
    pub fn into_data_point(self, now: DateTime<Utc>) -> DataPoint {
        DataPoint {
            id: String::new(),
            dataset_id: self.dataset_id,
            timestamp: self.timestamp.unwrap_or(now),
            value: self.value,
            category: self.category,
            metadata: self.metadata,
        }
    }
}
