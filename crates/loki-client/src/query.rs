//! LogQL query parameters.
//!
//! Each request owns its own parameter map, so nothing leaks between calls.
//! Extra parameters are applied first and are overridden by the named ones.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default `limit` for instant queries.
pub const DEFAULT_QUERY_LIMIT: u32 = 10;

/// Default `limit` for range queries, matching the Loki server default.
pub const DEFAULT_RANGE_LIMIT: u32 = 100;

/// Sort order of returned log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Newest entries first.
    #[default]
    Backward,
    /// Oldest entries first.
    Forward,
}

impl Direction {
    /// Wire value of the direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Backward => "backward",
            Direction::Forward => "forward",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "backward" => Ok(Direction::Backward),
            "forward" => Ok(Direction::Forward),
            other => Err(Error::invalid_argument(format!(
                "invalid direction value: {:?}, expected \"backward\" or \"forward\"",
                other
            ))),
        }
    }
}

/// Format a timestamp as a nanosecond Unix epoch.
fn epoch_nanos(at: DateTime<Utc>) -> Result<String> {
    at.timestamp_nanos_opt()
        .map(|nanos| nanos.to_string())
        .ok_or_else(|| Error::invalid_argument(format!("timestamp out of range: {}", at)))
}

fn validate_query(query: &str) -> Result<()> {
    if query.is_empty() {
        return Err(Error::invalid_argument("query empty"));
    }
    Ok(())
}

/// Parameters for `GET /loki/api/v1/query`.
///
/// # Example
///
/// ```rust
/// use loki_api_client::{Direction, QueryRequest};
///
/// let request = QueryRequest::new(r#"{job="varlogs"}"#)
///     .limit(25)
///     .direction(Direction::Forward);
/// assert_eq!(request.limit_value(), Some(25));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    query: String,
    limit: Option<u32>,
    time: Option<String>,
    direction: Direction,
    params: BTreeMap<String, String>,
}

impl QueryRequest {
    /// Create a request for the given LogQL expression.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: Some(DEFAULT_QUERY_LIMIT),
            time: None,
            direction: Direction::default(),
            params: BTreeMap::new(),
        }
    }

    /// Maximum number of entries to return. `0` omits the parameter.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Omit `limit`, leaving the server default in effect.
    pub fn no_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Evaluation time as a nanosecond Unix epoch string.
    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Evaluation time from a timestamp.
    pub fn at(mut self, at: DateTime<Utc>) -> Result<Self> {
        self.time = Some(epoch_nanos(at)?);
        Ok(self)
    }

    /// Sort order of the returned entries.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Add an extra query-string parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// The LogQL expression.
    pub fn query_str(&self) -> &str {
        &self.query
    }

    /// The configured limit, if any.
    pub fn limit_value(&self) -> Option<u32> {
        self.limit
    }

    /// Validate and flatten into query-string pairs.
    pub fn to_params(&self) -> Result<BTreeMap<String, String>> {
        validate_query(&self.query)?;

        let mut params = self.params.clone();
        params.insert("query".to_string(), self.query.clone());
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            params.insert("limit".to_string(), limit.to_string());
        }
        if let Some(time) = self.time.as_ref().filter(|t| !t.is_empty()) {
            params.insert("time".to_string(), time.clone());
        }
        params.insert("direction".to_string(), self.direction.to_string());
        Ok(params)
    }
}

/// Parameters for `GET /loki/api/v1/query_range`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQueryRequest {
    query: String,
    limit: Option<u32>,
    start: Option<String>,
    end: Option<String>,
    step: Option<String>,
    direction: Direction,
    params: BTreeMap<String, String>,
}

impl RangeQueryRequest {
    /// Create a range request for the given LogQL expression.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: Some(DEFAULT_RANGE_LIMIT),
            start: None,
            end: None,
            step: None,
            direction: Direction::default(),
            params: BTreeMap::new(),
        }
    }

    /// Maximum number of entries to return. `0` omits the parameter.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Omit `limit`, leaving the server default in effect.
    pub fn no_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Start of the range (nanosecond epoch or RFC 3339).
    pub fn start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// End of the range (nanosecond epoch or RFC 3339).
    pub fn end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Range bounds from timestamps.
    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(Error::invalid_argument(format!(
                "range end {} is before start {}",
                end, start
            )));
        }
        self.start = Some(epoch_nanos(start)?);
        self.end = Some(epoch_nanos(end)?);
        Ok(self)
    }

    /// Resolution step for metric queries, e.g. `"30s"` or `"60"`.
    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.step = Some(step.into());
        self
    }

    /// Sort order of the returned entries.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Add an extra query-string parameter.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Validate and flatten into query-string pairs.
    pub fn to_params(&self) -> Result<BTreeMap<String, String>> {
        validate_query(&self.query)?;

        let mut params = self.params.clone();
        params.insert("query".to_string(), self.query.clone());
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            params.insert("limit".to_string(), limit.to_string());
        }
        for (name, value) in [("start", &self.start), ("end", &self.end), ("step", &self.step)] {
            if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                params.insert(name.to_string(), value.clone());
            }
        }
        params.insert("direction".to_string(), self.direction.to_string());
        Ok(params)
    }
}
