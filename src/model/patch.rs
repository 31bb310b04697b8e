use crate::core::{Result, SyncError};
use serde::Serialize;
use serde_json::{Map, Value};

use super::Entity;

/// Shallow field patch applied by `update`.
///
/// Top-level keys replace the corresponding entity fields; keys absent from the
/// patch leave fields untouched. The `id` key is never applied: identity is
/// fixed once an entity exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EntityPatch(Map<String, Value>);

impl EntityPatch {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style field setter.
    pub fn set(mut self, field: impl Into<String>, value: impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        self.0.insert(field.into(), value);
        Ok(self)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(SyncError::Serialization(format!(
                "patch must be a JSON object, got {}",
                other
            ))),
        }
    }

    /// Patch carrying every serialized field of `entity`.
    pub fn from_entity<T: Entity>(entity: &T) -> Result<Self> {
        Self::from_value(serde_json::to_value(entity)?)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Returns `target` with this patch merged over it.
    pub fn apply_to<T: Entity>(&self, target: &T) -> Result<T> {
        let mut fields = match serde_json::to_value(target)? {
            Value::Object(fields) => fields,
            _ => {
                return Err(SyncError::InvalidPatch {
                    kind: T::KIND,
                    message: "entity does not serialize as an object".to_string(),
                });
            }
        };

        for (field, value) in &self.0 {
            if field == "id" || field == "_id" {
                continue;
            }
            fields.insert(field.clone(), value.clone());
        }

        serde_json::from_value(Value::Object(fields)).map_err(|err| SyncError::InvalidPatch {
            kind: T::KIND,
            message: err.to_string(),
        })
    }
}

impl From<Map<String, Value>> for EntityPatch {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;
    use crate::model::Activity;
    use serde_json::json;

    fn activity() -> Activity {
        Activity {
            id: EntityId::from("a-1"),
            projectid: EntityId::from("p-1"),
            activity_name: "Well survey".to_string(),
            activity_type: Some("survey".to_string()),
            date: None,
            location: Some("Kisumu".to_string()),
            notes: None,
        }
    }

    #[test]
    fn apply_replaces_only_named_fields() {
        let patch = EntityPatch::new().set("location", "Nakuru").unwrap();
        let patched = patch.apply_to(&activity()).unwrap();
        assert_eq!(patched.location.as_deref(), Some("Nakuru"));
        assert_eq!(patched.activity_name, "Well survey");
        assert_eq!(patched.activity_type.as_deref(), Some("survey"));
    }

    #[test]
    fn apply_never_changes_identity() {
        let patch = EntityPatch::from_value(json!({ "id": "other", "notes": "n" })).unwrap();
        let patched = patch.apply_to(&activity()).unwrap();
        assert_eq!(patched.id.as_str(), "a-1");
        assert_eq!(patched.notes.as_deref(), Some("n"));
    }

    #[test]
    fn apply_rejects_type_mismatch() {
        let patch = EntityPatch::from_value(json!({ "activity_name": 42 })).unwrap();
        let err = patch.apply_to(&activity()).unwrap_err();
        assert!(matches!(err, SyncError::InvalidPatch { .. }));
    }

    #[test]
    fn from_value_requires_object() {
        assert!(EntityPatch::from_value(json!([1, 2])).is_err());
    }
}
