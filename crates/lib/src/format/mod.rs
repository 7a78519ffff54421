//! The boundary between trees and textual formats.
//!
//! A [`ConfigFormat`] reads text into a node and writes a node back out using
//! only the public node API: values, children and hints. Formats publish the
//! [`ConfigOptions`] that suit them, such as the scalar kinds they can store
//! natively.

mod errors;
mod json;

use std::{fs, path::Path};

use tracing::debug;

pub use errors::FormatError;
pub use json::JsonFormat;

use crate::{ConfigOptions, ConfigTree, Node, NodeMut, Result};

/// A textual configuration format.
pub trait ConfigFormat {
    /// Short name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Options for trees holding documents of this format.
    fn default_options(&self) -> ConfigOptions {
        ConfigOptions::default()
    }

    /// Parses `input` and stores the document in `node`, replacing its
    /// content. Empty input yields an empty node.
    fn read_into(&self, input: &str, node: &mut NodeMut<'_>) -> Result<()>;

    /// Renders the subtree at `node`.
    fn write_node(&self, node: &Node<'_>) -> Result<String>;

    /// Parses `input` into a new tree using [`default_options`](Self::default_options).
    fn read(&self, input: &str) -> Result<ConfigTree> {
        self.read_with(input, self.default_options())
    }

    /// Parses `input` into a new tree with the given options.
    fn read_with(&self, input: &str, options: ConfigOptions) -> Result<ConfigTree> {
        let mut tree = ConfigTree::with_options(options);
        self.read_into(input, &mut tree.root_mut())?;
        Ok(tree)
    }

    /// Renders the whole tree.
    fn write(&self, tree: &ConfigTree) -> Result<String> {
        self.write_node(&tree.root())
    }

    /// Reads the file at `path`. A missing file yields an empty tree.
    fn load(&self, path: &Path) -> Result<ConfigTree> {
        let input = match fs::read_to_string(path) {
            Ok(input) => input,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = %path.display(), format = self.name(), bytes = input.len(), "loading configuration");
        self.read(&input)
    }

    /// Writes the tree to the file at `path`, replacing its content.
    fn save(&self, tree: &ConfigTree, path: &Path) -> Result<()> {
        let output = self.write(tree)?;
        debug!(path = %path.display(), format = self.name(), bytes = output.len(), "saving configuration");
        fs::write(path, output)?;
        Ok(())
    }
}
