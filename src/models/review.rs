use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationIssue;

/// Wire names of the required fields, in reporting order.
pub const REQUIRED_FIELDS: [&str; 4] = ["userName", "userTitle", "propertyName", "reviewText"];

/// A validated request: every field present and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub user_name: String,
    pub user_title: String,
    pub property_name: String,
    pub review_text: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ReviewDraft {
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    user_title: Option<String>,
    #[serde(default)]
    property_name: Option<String>,
    #[serde(default)]
    review_text: Option<String>,
}

/// Successful reply body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub response: String,
}

impl ReviewRequest {
    pub fn parse(body: &[u8]) -> Result<Self, ValidationIssue> {
        let draft = if body.iter().all(u8::is_ascii_whitespace) {
            ReviewDraft::default()
        } else {
            // Derived struct deserialisation also accepts sequences, so insist on an object first.
            match serde_json::from_slice::<Value>(body) {
                Ok(object @ Value::Object(_)) => serde_json::from_value::<ReviewDraft>(object)
                    .map_err(|e| ValidationIssue::MalformedBody(e.to_string()))?,
                Ok(other) => {
                    return Err(ValidationIssue::MalformedBody(format!(
                        "expected a JSON object, found {}",
                        json_type(&other)
                    )))
                }
                Err(e) => return Err(ValidationIssue::MalformedBody(e.to_string())),
            }
        };
        draft.validate()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl ReviewDraft {
    fn validate(self) -> Result<ReviewRequest, ValidationIssue> {
        let values = [self.user_name, self.user_title, self.property_name, self.review_text]
            .map(|v| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()));

        match values {
            [Some(user_name), Some(user_title), Some(property_name), Some(review_text)] => {
                Ok(ReviewRequest { user_name, user_title, property_name, review_text })
            }
            values => Err(ValidationIssue::MissingFields(
                REQUIRED_FIELDS
                    .iter()
                    .zip(values.iter())
                    .filter(|(_, v)| v.is_none())
                    .map(|(name, _)| *name)
                    .collect(),
            )),
        }
    }
}
