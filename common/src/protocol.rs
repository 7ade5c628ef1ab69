//! Wire format of the homework statuses API and the status lookup table.

use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::HomeworkError;

/// Review status codes the API is known to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    pub fn code(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Sentence shown to the user for this status.
    pub fn verdict(self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = HomeworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HomeworkStatus::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| HomeworkError::UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One submission exactly as the API sent it.
///
/// Nothing about the element is checked until it is rendered, so a broken
/// entry further down the list never blocks the newest one.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeworkRecord(Value);

impl HomeworkRecord {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self(json!({"homework_name": name.into(), "status": status.into()}))
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn homework_name(&self) -> Option<&str> {
        self.0.get("homework_name").and_then(Value::as_str)
    }

    /// The `status` field, whatever its JSON type. `null` counts as absent.
    pub fn status(&self) -> Option<&Value> {
        self.0.get("status").filter(|v| !v.is_null())
    }

    /// Build the notification text for this record.
    pub fn render_message(&self) -> Result<String, HomeworkError> {
        let name = self
            .homework_name()
            .ok_or(HomeworkError::Field("homework_name"))?;
        let status = self.status().ok_or(HomeworkError::Field("status"))?;
        let status: HomeworkStatus = match status.as_str() {
            Some(code) => code.parse()?,
            None => return Err(HomeworkError::UnknownStatus(status.to_string())),
        };

        Ok(format!(
            "Изменился статус проверки работы \"{}\". {}",
            name,
            status.verdict()
        ))
    }
}

impl From<Value> for HomeworkRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Validated body of a status API response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusResponse {
    pub homeworks: Vec<HomeworkRecord>,
    pub current_date: Option<i64>,
}

impl StatusResponse {
    /// Check the outer shape of a raw response body.
    ///
    /// Only the envelope is checked: the elements of `homeworks` are kept
    /// as sent, in the API's order.
    pub fn validate(body: Value) -> Result<Self, HomeworkError> {
        let mut object = match body {
            Value::Object(map) => map,
            other => {
                return Err(HomeworkError::Shape(format!(
                    "expected a JSON object, got {}",
                    kind(&other)
                )))
            }
        };

        let items = match object.remove("homeworks") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(HomeworkError::Shape(format!(
                    "`homeworks` must be an array, got {}",
                    kind(&other)
                )))
            }
            None => return Err(HomeworkError::Shape("`homeworks` key is missing".into())),
        };

        Ok(Self {
            homeworks: items.into_iter().map(HomeworkRecord::from).collect(),
            current_date: object.get("current_date").and_then(Value::as_i64),
        })
    }

    /// The API lists the most recent update first.
    pub fn latest(&self) -> Option<&HomeworkRecord> {
        self.homeworks.first()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
