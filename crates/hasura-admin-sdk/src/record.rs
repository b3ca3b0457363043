//! Record container handed to the host framework.

use serde::Serialize;
use serde_json::{Map, Value};

/// Field name to value mapping, as exchanged with the host.
pub type Params = Map<String, Value>;

const PATH_SEPARATOR: char = '.';

/// One row of a resource.
///
/// Params are kept flattened (`address.city`) so the host can address
/// nested JSON columns by path. An object with a key containing `.` is kept
/// whole under its own path.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    resource_id: String,
    pk_property: String,
    params: Params,
}

/// Plain-data projection of a [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordJson {
    pub id: Option<String>,
    pub params: Params,
}

impl Record {
    /// Wrap row data. `null` (no matching row) gives an empty record.
    pub fn new(data: Value, resource_id: impl Into<String>, pk_property: impl Into<String>) -> Self {
        let params = match data {
            Value::Object(map) => flatten_params(map),
            _ => Params::new(),
        };
        Self {
            resource_id: resource_id.into(),
            pk_property: pk_property.into(),
            params,
        }
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, path: &str) -> Option<&Value> {
        self.params.get(path)
    }

    /// Primary key value rendered as a string.
    pub fn id(&self) -> Option<String> {
        match self.params.get(&self.pk_property)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn to_json(&self) -> RecordJson {
        RecordJson {
            id: self.id(),
            params: self.params.clone(),
        }
    }

    /// Row data with nested paths restored.
    pub fn into_data(self) -> Value {
        Value::Object(unflatten_params(self.params))
    }
}

/// Flatten nested objects into dotted keys. Arrays and scalars are leaves;
/// so are empty objects and objects with a dotted key, which could not be
/// rebuilt from the flat form.
pub fn flatten_params(params: Params) -> Params {
    let mut flat = Params::new();
    for (key, value) in params {
        flatten_into(&mut flat, key, value);
    }
    flat
}

fn flatten_into(flat: &mut Params, prefix: String, value: Value) {
    match value {
        Value::Object(map)
            if !map.is_empty() && !map.keys().any(|k| k.contains(PATH_SEPARATOR)) =>
        {
            for (key, inner) in map {
                flatten_into(flat, format!("{}{}{}", prefix, PATH_SEPARATOR, key), inner);
            }
        }
        other => {
            flat.insert(prefix, other);
        }
    }
}

/// Rebuild nested objects from dotted keys. A later scalar at a path that
/// is already an object overwrites it.
pub fn unflatten_params(params: Params) -> Params {
    let mut nested = Params::new();
    for (key, value) in params {
        let mut segments: Vec<&str> = key.split(PATH_SEPARATOR).collect();
        let Some(last) = segments.pop() else {
            continue;
        };
        let mut cursor = &mut nested;
        for segment in segments {
            let slot = cursor
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Params::new()));
            if !slot.is_object() {
                *slot = Value::Object(Params::new());
            }
            cursor = match slot {
                Value::Object(map) => map,
                _ => unreachable!("slot was just made an object"),
            };
        }
        cursor.insert(last.to_string(), value);
    }
    nested
}
