//! JSON codec backed by serde_json.

use serde_json::{Map, Number};

use super::{ConfigFormat, FormatError};
use crate::{
    ConfigOptions, Node, NodeMut, Result, Value,
    node::{Scalar, ScalarKind},
};

const NAME: &str = "json";

/// Reads and writes JSON documents.
///
/// Objects become maps in document order, arrays become lists. Opaque
/// scalars are written as their display text. Comments and headers have no
/// JSON form and are dropped on write.
///
/// ```
/// # use configtree::{path, format::{ConfigFormat, JsonFormat}};
/// let json = JsonFormat::compact();
/// let tree = json.read(r#"{"server": {"port": 8080, "tags": ["a", "b"]}}"#)?;
/// assert_eq!(tree.node(path!["server", "tags", 1]).get_string().as_deref(), Some("b"));
/// assert_eq!(json.write(&tree)?, r#"{"server":{"port":8080,"tags":["a","b"]}}"#);
/// # Ok::<(), configtree::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonFormat {
    pretty: bool,
}

impl JsonFormat {
    /// Indented output.
    pub fn pretty() -> Self {
        JsonFormat { pretty: true }
    }

    /// Single-line output.
    pub fn compact() -> Self {
        JsonFormat { pretty: false }
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    fn to_json(&self, node: &Node<'_>) -> std::result::Result<serde_json::Value, FormatError> {
        if node.is_map() {
            let mut object = Map::new();
            for (key, child) in node.children_map() {
                object.insert(key.to_string(), self.to_json(&child)?);
            }
            return Ok(serde_json::Value::Object(object));
        }
        if node.is_list() {
            return node
                .children_list()
                .iter()
                .map(|child| self.to_json(child))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(serde_json::Value::Array);
        }
        Ok(match node.scalar() {
            None => serde_json::Value::Null,
            Some(Scalar::Bool(b)) => serde_json::Value::Bool(*b),
            Some(Scalar::Int(n)) => serde_json::Value::from(*n),
            Some(Scalar::Float(x)) => Number::from_f64(*x)
                .map(serde_json::Value::Number)
                .ok_or_else(|| FormatError::Unrepresentable {
                    format: NAME,
                    path: node.path(),
                    reason: format!("{x} is not a finite number"),
                })?,
            Some(Scalar::Text(text)) => serde_json::Value::String(text.clone()),
            Some(Scalar::Opaque(opaque)) => serde_json::Value::String(opaque.to_string()),
        })
    }
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self::pretty()
    }
}

impl ConfigFormat for JsonFormat {
    fn name(&self) -> &'static str {
        NAME
    }

    fn default_options(&self) -> ConfigOptions {
        ConfigOptions::default().with_accepted_types([
            ScalarKind::Bool,
            ScalarKind::Int,
            ScalarKind::Float,
            ScalarKind::Text,
        ])
    }

    fn read_into(&self, input: &str, node: &mut NodeMut<'_>) -> Result<()> {
        if input.trim().is_empty() {
            node.clear();
            return Ok(());
        }
        let document: serde_json::Value =
            serde_json::from_str(input).map_err(|err| FormatError::Parse {
                format: NAME,
                line: err.line(),
                column: err.column(),
                reason: err.to_string(),
            })?;
        node.set_value(Value::from(document))?;
        Ok(())
    }

    fn write_node(&self, node: &Node<'_>) -> Result<String> {
        if node.is_null() {
            return Ok(String::new());
        }
        let document = self.to_json(node)?;
        let mut output = if self.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        if self.pretty {
            output.push('\n');
        }
        Ok(output)
    }
}
