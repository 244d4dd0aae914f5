use crate::descriptor::{InputKind, ToolDescriptor};
use crate::error::ToolError;
use serde_json::{Map, Value};

/// Arguments validated against a [`ToolDescriptor`].
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    values: Map<String, Value>,
}

impl ToolArgs {
    /// Check `args` (a JSON object, or null for "no arguments") against the
    /// descriptor and fill in defaults.
    pub fn bind(descriptor: &ToolDescriptor, args: Value) -> Result<Self, ToolError> {
        let mut given = match args {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(ToolError::InvalidArgument("arguments must be a JSON object".into())),
        };
        if let Some(unknown) = given.keys().find(|k| descriptor.input(k).is_none()) {
            return Err(ToolError::InvalidArgument(format!(
                "{} does not take a parameter named {unknown:?}",
                descriptor.name
            )));
        }

        let mut values = Map::new();
        for input in &descriptor.inputs {
            match given.remove(input.name) {
                None | Some(Value::Null) => {
                    if let Some(default) = &input.default {
                        values.insert(input.name.to_string(), default.clone());
                    } else if input.required {
                        return Err(ToolError::InvalidArgument(format!("missing required parameter {:?}", input.name)));
                    }
                }
                Some(v) => {
                    let ok = match input.kind {
                        InputKind::String => v.is_string(),
                        InputKind::Integer => v.as_i64().is_some(),
                    };
                    if !ok {
                        return Err(ToolError::InvalidArgument(format!(
                            "parameter {:?} must be {}, got {v}",
                            input.name,
                            match input.kind {
                                InputKind::String => "a string",
                                InputKind::Integer => "an integer",
                            }
                        )));
                    }
                    values.insert(input.name.to_string(), v);
                }
            }
        }
        Ok(Self { values })
    }

    pub fn string(&self, name: &str) -> Result<&str, ToolError> {
        self.values
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidArgument(format!("missing string parameter {name:?}")))
    }

    pub fn integer(&self, name: &str) -> Result<i64, ToolError> {
        self.values
            .get(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| ToolError::InvalidArgument(format!("missing integer parameter {name:?}")))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}
