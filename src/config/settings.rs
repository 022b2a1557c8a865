//! Settings document (`settings.json`)
//!
//! The document is open-ended: only the `hooks` key has a known shape, every
//! other key is carried through untouched. Key order is preserved so a
//! rewrite leaves unrelated keys where the user put them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved key holding named hook entries
pub const HOOKS_KEY: &str = "hooks";

/// A named command run by the host tool on some event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookEntry {
    pub command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continue_on_error: Option<bool>,
    /// Fields this version does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HookEntry {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: None,
            continue_on_error: None,
            extra: Map::new(),
        }
    }
}

/// Hooks to add, keyed by name, in declaration order
pub type HookMap = Vec<(String, HookEntry)>;

/// Parsed settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsDocument(Map<String, Value>);

impl SettingsDocument {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Parse settings JSON; the top level must be an object
    pub fn from_json(json: &str) -> std::result::Result<Self, String> {
        match serde_json::from_str::<Value>(json).map_err(|e| e.to_string())? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(format!("expected a JSON object, found {}", type_name(&other))),
        }
    }

    /// Render as pretty JSON with a trailing newline
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(&self.0)?;
        json.push('\n');
        Ok(json)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// The hooks map, if present and an object
    pub fn hooks(&self) -> Option<&Map<String, Value>> {
        self.0.get(HOOKS_KEY).and_then(Value::as_object)
    }

    /// Whether a hook with this name exists
    pub fn has_hook(&self, name: &str) -> bool {
        self.hooks().is_some_and(|hooks| hooks.contains_key(name))
    }

    /// Remove the whole hooks map, returning it
    pub fn remove_hooks(&mut self) -> Option<Value> {
        self.0.shift_remove(HOOKS_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read the `hooks` object of a settings fragment into typed entries
///
/// Entries that are not objects with a `command` string are rejected.
pub fn parse_hook_map(value: &Value) -> std::result::Result<HookMap, String> {
    let Some(hooks) = value.as_object() else {
        return Err(format!("`{HOOKS_KEY}` must be an object, found {}", type_name(value)));
    };

    hooks
        .iter()
        .map(|(name, entry)| {
            serde_json::from_value::<HookEntry>(entry.clone())
                .map(|hook| (name.clone(), hook))
                .map_err(|e| format!("hook `{name}`: {e}"))
        })
        .collect()
}
