use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

use crate::error::{Result, StoreError};

/// Field equality conditions; a record matches when every key equals its field.
pub type Condition = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    /// Parses `"name,-last_time"` style sort strings.
    pub fn parse_all(sort: &str) -> Result<Vec<SortKey>> {
        sort.split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| {
                let (field, descending) = match key.strip_prefix('-') {
                    Some(field) => (field, true),
                    None => (key.strip_prefix('+').unwrap_or(key), false),
                };

                let valid = !field.is_empty()
                    && field
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_');

                if !valid {
                    return Err(StoreError::InvalidSortField(key.to_owned()));
                }

                Ok(SortKey {
                    field: field.to_owned(),
                    descending,
                })
            })
            .collect()
    }
}

/// Pagination as sent by clients: `limit <= 0` means unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub start: i64,
    pub limit: i64,
    pub sort: String,
}

impl Page {
    pub fn skip(&self) -> u64 {
        u64::try_from(self.start).unwrap_or(0)
    }

    pub fn limit(&self) -> Option<u64> {
        u64::try_from(self.limit).ok().filter(|limit| *limit > 0)
    }
}

/// Projection, condition and page of a search request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FindArgs {
    pub fields: Vec<String>,
    pub condition: Condition,
    pub page: Page,
}

impl FindArgs {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            ..Self::default()
        }
    }

    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    pub fn page(mut self, page: Page) -> Self {
        self.page = page;
        self
    }
}

#[cfg_attr(not(feature = "memory"), allow(dead_code))]
pub(crate) fn matches(record: &Map<String, Value>, condition: &Condition) -> bool {
    condition
        .iter()
        .all(|(key, value)| record.get(key) == Some(value))
}

#[cfg_attr(not(feature = "memory"), allow(dead_code))]
pub(crate) fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            match (a.as_i64(), b.as_i64()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => a
                    .as_f64()
                    .partial_cmp(&b.as_f64())
                    .unwrap_or(Ordering::Equal),
            }
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        _ => rank(a).cmp(&rank(b)),
    }
}
