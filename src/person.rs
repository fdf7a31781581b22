//! The person record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A person as the record store holds it.
///
/// `id` is assigned by the store; `0` means "not yet assigned".
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub address: String,
    pub workplace: String,
}

/// Keys a create body must carry, in the order they are read.
pub const REQUIRED_FIELDS: [&str; 5] = ["firstName", "lastName", "age", "address", "workplace"];

/// Why a create body could not become a [`NewPerson`].
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("missing field `{0}`")]
    Missing(&'static str),
    #[error("field `{field}` has the wrong type: {source}")]
    Mistyped {
        field: &'static str,
        source: serde_json::Error,
    },
}

/// Body of a create request. Unknown keys are ignored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub age: i64,
    pub address: String,
    pub workplace: String,
}

impl NewPerson {
    /// Reads the five fields out of a JSON object.
    ///
    /// Every key is checked for presence before any value is typed, so a
    /// body both incomplete and mistyped reports [`FieldError::Missing`].
    pub fn from_fields(mut fields: Map<String, Value>) -> Result<Self, FieldError> {
        if let Some(missing) = REQUIRED_FIELDS.into_iter().find(|key| !fields.contains_key(*key)) {
            return Err(FieldError::Missing(missing));
        }
        Ok(Self {
            first_name: take(&mut fields, "firstName")?,
            last_name: take(&mut fields, "lastName")?,
            age: take(&mut fields, "age")?,
            address: take(&mut fields, "address")?,
            workplace: take(&mut fields, "workplace")?,
        })
    }

    /// The unsaved record handed to the store, always with `id = 0`.
    pub fn into_person(self) -> Person {
        Person {
            id: 0,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            address: self.address,
            workplace: self.workplace,
        }
    }
}

fn take<T: DeserializeOwned>(fields: &mut Map<String, Value>, field: &'static str) -> Result<T, FieldError> {
    let value = fields.remove(field).ok_or(FieldError::Missing(field))?;
    serde_json::from_value(value).map_err(|source| FieldError::Mistyped { field, source })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn new_person_becomes_unsaved_record() {
        let body = json!({"firstName":"Bob","lastName":"Smith","age":25,"address":"Somewhere","workplace":"ACME","extra":1});
        let new = NewPerson::from_fields(fields(body)).expect("valid body");
        let person = new.into_person();

        assert_eq!(person.id, 0);
        assert_eq!(person.first_name, "Bob");
        assert_eq!(person.age, 25);
        assert_eq!(person.workplace, "ACME");
    }

    #[test]
    fn missing_key_is_reported_before_types() {
        let body = json!({"firstName": 7, "lastName": "Smith", "age": "x", "address": "Somewhere"});
        assert!(matches!(
            NewPerson::from_fields(fields(body)),
            Err(FieldError::Missing("workplace"))
        ));
    }

    #[test]
    fn mistyped_value_names_its_field() {
        let body = json!({"firstName":"Bob","lastName":"Smith","age":"25","address":"Somewhere","workplace":"ACME"});
        assert!(matches!(
            NewPerson::from_fields(fields(body)),
            Err(FieldError::Mistyped { field: "age", .. })
        ));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let person = Person {
            id: 3,
            first_name: "Alice".into(),
            last_name: "Doe".into(),
            age: 30,
            address: "X".into(),
            workplace: "Y".into(),
        };
        let value = serde_json::to_value(&person).expect("serializable");
        assert_eq!(
            value,
            serde_json::json!({
                "id": 3, "firstName": "Alice", "lastName": "Doe",
                "age": 30, "address": "X", "workplace": "Y"
            })
        );
    }
}
