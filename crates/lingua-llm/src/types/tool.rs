use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::message::ToolType;

/// Declaration of a tool the model can call
///
/// This is the canonical (OpenAI-shaped) form; backend-specific
/// declarations are derived from it on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool kind
    #[serde(rename = "type", default)]
    pub kind: ToolType,
    /// Function specification
    pub function: FunctionSpec,
}

impl ToolSpec {
    /// Declare a function tool
    pub fn function(name: impl Into<String>, description: impl Into<String>, parameters: ParametersSchema) -> Self {
        Self {
            kind: ToolType::Function,
            function: FunctionSpec {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Specification of a callable function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// JSON Schema for the function parameters
    #[serde(default)]
    pub parameters: ParametersSchema,
}

/// JSON-Schema object describing function parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametersSchema {
    /// Schema type, `object` for every function
    #[serde(rename = "type", default = "object_type")]
    pub kind: String,
    /// Properties in declaration order
    #[serde(default)]
    pub properties: IndexMap<String, PropertySchema>,
    /// Names of required properties, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Other schema keywords (e.g. `additionalProperties`)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn object_type() -> String {
    "object".to_owned()
}

impl Default for ParametersSchema {
    fn default() -> Self {
        Self {
            kind: object_type(),
            properties: IndexMap::new(),
            required: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

impl ParametersSchema {
    /// Empty object schema
    pub fn object() -> Self {
        Self::default()
    }

    /// Add an optional property
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Add a property and mark it required
    #[must_use]
    pub fn required_property(mut self, name: impl Into<String>, schema: PropertySchema) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.insert(name, schema);
        self
    }
}

/// Schema of a single parameter property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// JSON type name (e.g. `string`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Other schema keywords (e.g. `enum`, `items`)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PropertySchema {
    /// Property of the given JSON type with a description
    pub fn new(kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            description: Some(description.into()),
            extra: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_openai_tool_declaration() {
        let tool: ToolSpec = serde_json::from_value(json!({
            "type": "function",
            "function": {
                "name": "get_weather",
                "description": "Get the weather.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "location": {"type": "string", "description": "City name."},
                        "unit": {"type": "string", "enum": ["c", "f"]}
                    },
                    "required": ["location"]
                }
            }
        }))
        .unwrap();

        assert_eq!(tool.function.name, "get_weather");
        let names: Vec<_> = tool.function.parameters.properties.keys().map(String::as_str).collect();
        assert_eq!(names, ["location", "unit"]);
        assert_eq!(tool.function.parameters.properties["unit"].extra["enum"], json!(["c", "f"]));
        assert_eq!(tool.function.parameters.required, ["location"]);
    }

    #[test]
    fn builder_matches_declaration() {
        let built = ToolSpec::function(
            "get_weather",
            "Get the weather.",
            ParametersSchema::object().required_property("location", PropertySchema::new("string", "City name.")),
        );

        assert_eq!(
            serde_json::to_value(&built).unwrap(),
            json!({
                "type": "function",
                "function": {
                    "name": "get_weather",
                    "description": "Get the weather.",
                    "parameters": {
                        "type": "object",
                        "properties": {"location": {"type": "string", "description": "City name."}},
                        "required": ["location"]
                    }
                }
            })
        );
    }
}
