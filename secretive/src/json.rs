//! Conversions between the value model and `serde_json::Value`.
//!
//! JSON is the interchange form for fixtures and for shipping scrubbed
//! payloads next to a serialized [`SecretStore`](crate::SecretStore).
//!
//! Going JSON → [`Value`] is total: objects become initialized mappings and
//! arrays initialized sequences (JSON has no absent-container notion).
//! Going [`Value`] → JSON is fallible only for opaques; absent containers
//! and absent references collapse to `null`, and present references unwrap.

use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::error::ReflectError;
use crate::value::{Scalar, Value};

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(flag) => Value::Scalar(Scalar::Bool(flag)),
            JsonValue::Number(number) => {
                if let Some(signed) = number.as_i64() {
                    Value::Scalar(Scalar::Int(signed))
                } else if let Some(unsigned) = number.as_u64() {
                    Value::Scalar(Scalar::UInt(unsigned))
                } else {
                    Value::Scalar(Scalar::Float(number.as_f64().unwrap_or_default()))
                }
            }
            JsonValue::String(text) => Value::Scalar(Scalar::String(text)),
            JsonValue::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            JsonValue::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<Value> for JsonValue {
    type Error = ReflectError;

    fn try_from(value: Value) -> Result<Self, ReflectError> {
        Ok(match value {
            Value::Null => JsonValue::Null,
            Value::Scalar(Scalar::Bool(flag)) => JsonValue::Bool(flag),
            Value::Scalar(Scalar::Int(signed)) => JsonValue::from(signed),
            Value::Scalar(Scalar::UInt(unsigned)) => JsonValue::from(unsigned),
            Value::Scalar(Scalar::Float(float)) => {
                // JSON cannot carry NaN or infinities.
                Number::from_f64(float).map_or(JsonValue::Null, JsonValue::Number)
            }
            Value::Scalar(Scalar::Char(character)) => JsonValue::String(character.to_string()),
            Value::Scalar(Scalar::String(text)) => JsonValue::String(text),
            Value::Reference(inner) => JsonValue::try_from(*inner)?,
            Value::Record(record) => {
                let mut map = JsonMap::with_capacity(record.len());
                for (name, child) in record {
                    map.insert(name, JsonValue::try_from(child)?);
                }
                JsonValue::Object(map)
            }
            Value::Sequence(sequence) => match sequence.into_items() {
                None => JsonValue::Null,
                Some(items) => JsonValue::Array(
                    items
                        .into_iter()
                        .map(JsonValue::try_from)
                        .collect::<Result<_, _>>()?,
                ),
            },
            Value::Mapping(mapping) => match mapping.into_entries() {
                None => JsonValue::Null,
                Some(entries) => {
                    let mut map = JsonMap::with_capacity(entries.len());
                    for (key, child) in entries {
                        map.insert(key, JsonValue::try_from(child)?);
                    }
                    JsonValue::Object(map)
                }
            },
            Value::Opaque(_) => {
                return Err(ReflectError::Unrepresentable {
                    context: "an opaque value",
                })
            }
        })
    }
}
