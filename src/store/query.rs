//! Query - filter, sort and limit for collection reads.

use std::cmp::Ordering;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

type Predicate<'q, D> = Box<dyn Fn(&D) -> bool + 'q>;
type Comparator<'q, D> = Box<dyn Fn(&D, &D) -> Ordering + 'q>;

/// A read query over a collection.
///
/// Documents that compare equal keep insertion order, newest insert first
/// when sorting descending. So "sort by timestamp descending" breaks
/// timestamp ties by arrival.
///
/// ```ignore
/// let query = Query::new()
///     .filter(|p: &DataPoint| p.dataset_id == "A")
///     .sort_by(Direction::Descending, |a, b| a.timestamp.cmp(&b.timestamp))
///     .limit(50);
/// ```
pub struct Query<'q, D> {
    filter: Option<Predicate<'q, D>>,
    sort: Option<(Direction, Comparator<'q, D>)>,
    limit: Option<usize>,
}

impl<D> Default for Query<'_, D> {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            limit: None,
        }
    }
}

impl<'q, D> Query<'q, D> {
    /// A query matching every document, in insertion order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only documents matching the predicate.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&D) -> bool + 'q,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Sort matching documents with the comparator, in the given direction.
    pub fn sort_by<F>(mut self, direction: Direction, compare: F) -> Self
    where
        F: Fn(&D, &D) -> Ordering + 'q,
    {
        self.sort = Some((direction, Box::new(compare)));
        self
    }

    /// Return at most `limit` documents.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Start selecting documents for this query.
    pub(crate) fn selection(&self) -> Selection<'_, 'q, D> {
        Selection {
            query: self,
            docs: Vec::new(),
        }
    }

    /// Apply the query to documents given in insertion order.
    #[cfg(test)]
    pub(crate) fn apply(&self, docs: Vec<D>) -> Vec<D> {
        let mut selection = self.selection();
        for doc in docs {
            selection.offer(doc);
        }
        selection.finish()
    }
}

/// Documents picked so far, fed one at a time in insertion order.
///
/// With a sort and a limit only the best `limit` documents are held, kept
/// in result order.
pub(crate) struct Selection<'a, 'q, D> {
    query: &'a Query<'q, D>,
    docs: Vec<D>,
}

impl<D> Selection<'_, '_, D> {
    /// True once no further document can enter the result.
    pub(crate) fn is_saturated(&self) -> bool {
        self.query.sort.is_none() && self.query.limit.is_some_and(|limit| self.docs.len() >= limit)
    }

    pub(crate) fn offer(&mut self, doc: D) {
        if let Some(predicate) = &self.query.filter {
            if !predicate(&doc) {
                return;
            }
        }

        match (&self.query.sort, self.query.limit) {
            (Some((direction, compare)), Some(limit)) => {
                // later inserts go before equal keys when descending, after when ascending
                let pos = match direction {
                    Direction::Descending => self
                        .docs
                        .partition_point(|held| compare(held, &doc) == Ordering::Greater),
                    Direction::Ascending => self
                        .docs
                        .partition_point(|held| compare(held, &doc) != Ordering::Greater),
                };
                if pos < limit {
                    self.docs.insert(pos, doc);
                    self.docs.truncate(limit);
                }
            }
            (None, Some(limit)) => {
                if self.docs.len() < limit {
                    self.docs.push(doc);
                }
            }
            (_, None) => self.docs.push(doc),
        }
    }

    pub(crate) fn finish(self) -> Vec<D> {
        let mut docs = self.docs;
        // Bounded selections are already ordered.
        if self.query.limit.is_none() {
            if let Some((direction, compare)) = &self.query.sort {
                match direction {
                    Direction::Ascending => docs.sort_by(|a, b| compare(a, b)),
                    Direction::Descending => {
                        // stable sort over reversed input: ties stay newest-insert first
                        docs.reverse();
                        docs.sort_by(|a, b| compare(b, a));
                    }
                }
            }
        }
        docs
    }
}
