use super::in_memory::InMemoryParameterStore;
use crate::error::{ExportError, Result};
use serde_json::{Map, Value};
use std::io::Read;

/// Loads a parameter store from a JSON object of full parameter names to values.
///
/// ```json
/// { "/parcs-export/OutputDir": "out", "/parcs-export/EmitJson": true }
/// ```
///
/// `null` is kept as a parameter without a value. Other non-string scalars are
/// stored in their JSON text form.
pub async fn load_parameters<R: Read>(source: R) -> Result<InMemoryParameterStore> {
    let object: Map<String, Value> = serde_json::from_reader(source)?;

    let store = InMemoryParameterStore::new();
    for (name, value) in object {
        let value = match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
            Value::Array(_) | Value::Object(_) => {
                return Err(ExportError::ParameterStoreError(format!(
                    "parameter {name:?} must be a scalar"
                )));
            }
        };
        store.put(name, value).await;
    }
    Ok(store)
}
