use crate::models::UserInput;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

const NAME_REQUIRED: &str = "Name cannot be blank";
const EMAIL_REQUIRED: &str = "Email cannot be blank";

/// Required fields missing from a write request, keyed by field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub fields: BTreeMap<&'static str, &'static str>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing: Vec<&str> = self.fields.keys().copied().collect();
        write!(f, "missing required field(s): {}", missing.join(", "))
    }
}

impl Error for ValidationError {}

/// Extracts `name` and `email` from a raw request body.
///
/// Anything that is not a JSON object counts as an empty object; a field
/// is missing when absent, null, not a string, or empty.
pub fn parse(body: &[u8]) -> Result<UserInput, ValidationError> {
    let object = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    let name = required_string(&object, "name");
    let email = required_string(&object, "email");

    match (name, email) {
        (Some(name), Some(email)) => Ok(UserInput { name, email }),
        (name, email) => {
            let mut fields = BTreeMap::new();
            if name.is_none() {
                fields.insert("name", NAME_REQUIRED);
            }
            if email.is_none() {
                fields.insert("email", EMAIL_REQUIRED);
            }
            Err(ValidationError { fields })
        }
    }
}

fn required_string(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}
