//! Ingredient lookup tables.
//!
//! Two tables drive every lookup: the CIR ingredient index (a flat
//! name → identifier mapping) and the ECHA cross-reference index, which is
//! arbitrarily nested and therefore decoded into a [`KeyTree`].

use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// `path` is unset when the index was parsed from a string.
    #[error("Malformed index: {message}")]
    Malformed {
        path: Option<String>,
        message: String,
    },
}

impl IndexError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            path: None,
            message: message.into(),
        }
    }

    /// Attaches the file a malformed index was read from.
    pub fn at(self, file: &Path) -> Self {
        match self {
            Self::Malformed { message, .. } => Self::Malformed {
                path: Some(file.display().to_string()),
                message,
            },
            io => io,
        }
    }

    /// File the error refers to, if known.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Malformed { path, .. } => path.as_deref(),
        }
    }
}

fn read_index_file(path: &Path) -> Result<String, IndexError> {
    std::fs::read_to_string(path).map_err(|e| IndexError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Ingredient display name → report identifier, in file order.
#[derive(Debug, Clone, Default)]
pub struct IngredientIndex {
    entries: Vec<(String, String)>,
    positions: HashMap<String, usize>,
}

impl IngredientIndex {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        Self::from_json_str(&read_index_file(path)?).map_err(|e| e.at(path))
    }

    pub fn from_json_str(json: &str) -> Result<Self, IndexError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| IndexError::malformed(e.to_string()))?;
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(IndexError::malformed(format!(
                    "expected a JSON object at the top level, found {}",
                    json_kind(&other)
                )))
            }
        };

        let mut index = Self::default();
        for (name, value) in object {
            let identifier = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(IndexError::malformed(format!(
                        "identifier for '{}' must be a string or number, found {}",
                        name,
                        json_kind(&other)
                    )))
                }
            };
            index.insert(name, identifier);
        }
        Ok(index)
    }

    fn insert(&mut self, name: String, identifier: String) {
        match self.positions.get(&name) {
            Some(&pos) => self.entries[pos].1 = identifier,
            None => {
                self.positions.insert(name.clone(), self.entries.len());
                self.entries.push((name, identifier));
            }
        }
    }

    /// Identifier for an ingredient. Blank identifiers count as missing.
    pub fn identifier(&self, name: &str) -> Option<&str> {
        self.positions
            .get(name)
            .map(|&pos| self.entries[pos].1.as_str())
            .filter(|id| !id.is_empty())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Leaf value of a decoded cross-reference document.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(String),
    Text(String),
}

/// Tagged-variant view of decoded JSON: mappings keep their stored order.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyTree {
    Mapping(Vec<(String, KeyTree)>),
    Sequence(Vec<KeyTree>),
    Scalar(Scalar),
}

impl From<Value> for KeyTree {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(object) => KeyTree::Mapping(
                object
                    .into_iter()
                    .map(|(key, value)| (key, KeyTree::from(value)))
                    .collect(),
            ),
            Value::Array(items) => KeyTree::Sequence(items.into_iter().map(KeyTree::from).collect()),
            Value::String(s) => KeyTree::Scalar(Scalar::Text(s)),
            Value::Number(n) => KeyTree::Scalar(Scalar::Number(n.to_string())),
            Value::Bool(b) => KeyTree::Scalar(Scalar::Bool(b)),
            Value::Null => KeyTree::Scalar(Scalar::Null),
        }
    }
}

/// ECHA cross-reference index: a nested document whose root is a mapping.
#[derive(Debug, Clone)]
pub struct CrossReferenceIndex {
    root: KeyTree,
}

impl CrossReferenceIndex {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        Self::from_json_str(&read_index_file(path)?).map_err(|e| e.at(path))
    }

    pub fn from_json_str(json: &str) -> Result<Self, IndexError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| IndexError::malformed(e.to_string()))?;
        if !value.is_object() {
            return Err(IndexError::malformed(format!(
                "expected a JSON object at the top level, found {}",
                json_kind(&value)
            )));
        }
        Ok(Self {
            root: KeyTree::from(value),
        })
    }

    pub fn tree(&self) -> &KeyTree {
        &self.root
    }

    /// Dossier identifier stored directly under `key` at the top level.
    ///
    /// Only non-empty text and non-zero numbers qualify; nested values,
    /// booleans and nulls are treated as missing.
    pub fn identifier(&self, key: &str) -> Option<String> {
        let KeyTree::Mapping(entries) = &self.root else {
            return None;
        };
        let (_, value) = entries.iter().find(|(k, _)| k == key)?;
        match value {
            KeyTree::Scalar(Scalar::Text(s)) if !s.is_empty() => Some(s.clone()),
            KeyTree::Scalar(Scalar::Number(n)) if n.parse::<f64>().map_or(true, |v| v != 0.0) => {
                Some(n.clone())
            }
            _ => None,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
