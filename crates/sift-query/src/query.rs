use serde::{Deserialize, Serialize};

use crate::filter::FilterClause;
use crate::sort::SortClause;

/// A requested slice of a collection: filters, then sorts, then skip/take.
///
/// Clause order is application order. For sorts the first clause is the
/// primary key and every later clause only breaks ties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    pub skip: usize,
    pub take: usize,
    pub filter: Vec<FilterClause>,
    pub sort: Vec<SortClause>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn take(mut self, take: usize) -> Self {
        self.take = take;
        self
    }

    pub fn filter(mut self, clause: FilterClause) -> Self {
        self.filter.push(clause);
        self
    }

    pub fn sort(mut self, clause: SortClause) -> Self {
        self.sort.push(clause);
        self
    }

    pub fn has_filters(&self) -> bool {
        !self.filter.is_empty()
    }

    pub fn has_sorts(&self) -> bool {
        !self.sort.is_empty()
    }
}
