use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The parts of a Timestream `Query` response that are read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResult {
    #[serde(default)]
    pub rows: Vec<Row>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Row {
    #[serde(default)]
    pub data: Vec<Datum>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Datum {
    pub scalar_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlindEvent {
    pub time: String,
    pub status: String,
}

impl BlindEvent {
    /// Cell 0 holds the event time, cell 1 the measure name (`Open` or `Closing`).
    pub fn from_row(row: &Row) -> Result<Self, Error> {
        Ok(Self {
            time: scalar(row, 0, "time")?,
            status: scalar(row, 1, "status")?,
        })
    }
}

fn scalar(row: &Row, index: usize, name: &str) -> Result<String, Error> {
    let datum = row
        .data
        .get(index)
        .ok_or_else(|| Error::MalformedRow(format!("missing {name} cell at index {index}")))?;

    datum.scalar_value.clone().ok_or_else(|| {
        Error::MalformedRow(format!("{name} cell at index {index} has no scalar value"))
    })
}

impl fmt::Display for BlindEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "New event: {} at {}", self.status, self.time)
    }
}

pub const SENT_BODY: &str = "Notification sent to Discord successfully";
pub const NOT_FOUND_BODY: &str = "No new events found in Timestream";
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub body: String,
}

impl Response {
    fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    pub fn sent() -> Self {
        Self::new(200, SENT_BODY)
    }

    pub fn not_found() -> Self {
        Self::new(404, NOT_FOUND_BODY)
    }

    pub fn internal_error() -> Self {
        Self::new(500, INTERNAL_ERROR_BODY)
    }
}

impl From<&Error> for Response {
    fn from(err: &Error) -> Self {
        match err {
            Error::MissingConfig(key) => Self::new(500, format!("Missing configuration: {key}")),
            _ => Self::internal_error(),
        }
    }
}
