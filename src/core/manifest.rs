// src/core/manifest.rs

//! Two-stage manifest loading.
//!
//! Stage one parses the raw text into a generic `serde_yaml::Value`; stage
//! two converts that value into the strict [`CommandNode`] shape, carrying
//! the path to the offending field when a node does not fit. Nothing in the
//! crate reads the generic value directly.

use crate::models::{CommandNode, ProjectManifest, Runnable, Section};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("could not read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Syntax(#[from] serde_yaml::Error),
    #[error("invalid manifest at `{path}`: {reason}")]
    Node { path: String, reason: String },
}

fn node_error(path: &str, reason: impl Into<String>) -> ManifestError {
    ManifestError::Node {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Reads and parses the manifest file.
pub fn load(path: &Path) -> Result<ProjectManifest, ManifestError> {
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text)
}

/// Parses manifest text into a fresh [`ProjectManifest`].
///
/// Top-level keys other than the three section identifiers are ignored. An
/// empty document yields an empty manifest.
pub fn parse(text: &str) -> Result<ProjectManifest, ManifestError> {
    let document: Value = serde_yaml::from_str(text)?;
    let mut roots = BTreeMap::new();
    match document {
        Value::Null => {}
        Value::Mapping(_) => {
            for section in Section::ALL {
                if let Some(value) = document.get(section.key()) {
                    roots.insert(section.key(), convert_node(value, section.key())?);
                }
            }
        }
        _ => {
            return Err(node_error(".", "top level must be a mapping of sections"));
        }
    }
    Ok(ProjectManifest::new(roots))
}

fn convert_node(value: &Value, path: &str) -> Result<CommandNode, ManifestError> {
    if value.as_mapping().is_none() {
        return Err(node_error(path, "expected a mapping"));
    }

    let name = match value.get("name") {
        Some(v) => required_string(v, &format!("{path}.name"))?,
        None => return Err(node_error(path, "missing required field `name`")),
    };

    let command = match value.get("command") {
        None | Some(Value::Null) => None,
        Some(Value::String(line)) => Some(Runnable::Single(line.clone())),
        Some(Value::Sequence(items)) => {
            let mut lines = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                lines.push(required_string(item, &format!("{path}.command[{index}]"))?);
            }
            Some(Runnable::Sequence(lines))
        }
        Some(_) => {
            return Err(node_error(
                &format!("{path}.command"),
                "expected a string or a sequence of strings",
            ));
        }
    };

    let actions = match value.get("actions") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => {
            let mut children = Vec::with_capacity(items.len());
            for (index, child) in items.iter().enumerate() {
                children.push(convert_node(child, &format!("{path}.actions[{index}]"))?);
            }
            children
        }
        Some(_) => {
            return Err(node_error(
                &format!("{path}.actions"),
                "expected a sequence of child entries",
            ));
        }
    };

    Ok(CommandNode {
        name,
        description: optional_string(value, "description", path)?,
        tooltip: optional_string(value, "tooltip", path)?,
        title: optional_string(value, "title", path)?,
        command,
        actions,
    })
}

fn required_string(value: &Value, path: &str) -> Result<String, ManifestError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| node_error(path, "expected a string"))
}

fn optional_string(node: &Value, field: &str, path: &str) -> Result<Option<String>, ManifestError> {
    match node.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => required_string(value, &format!("{path}.{field}")).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_single_runnable_section() {
        let manifest = parse("develop:\n  name: Build\n  command: npm run build\n").unwrap();
        let root = manifest.section(Section::Develop).unwrap();
        assert_eq!(root.name, "Build");
        assert_eq!(
            root.command,
            Some(Runnable::Single("npm run build".to_string()))
        );
        assert!(root.actions.is_empty());
        assert!(manifest.section(Section::Publish).is_none());
    }

    #[test]
    fn parses_nested_actions_in_order() {
        let text = concat!(
            "tools:\n",
            "  name: Tools\n",
            "  actions:\n",
            "    - name: Export tables\n",
            "      command:\n",
            "        - node tools/export.js\n",
            "        - node tools/check.js\n",
            "    - name: Clean\n",
            "      command: rm -rf .temp\n",
        );
        let manifest = parse(text).unwrap();
        let root = manifest.section(Section::Tools).unwrap();
        assert_eq!(root.actions.len(), 2);
        assert_eq!(root.actions[0].name, "Export tables");
        assert_eq!(root.actions[1].name, "Clean");
        assert_eq!(
            root.actions[0].command,
            Some(Runnable::Sequence(vec![
                "node tools/export.js".to_string(),
                "node tools/check.js".to_string(),
            ]))
        );
    }

    #[test]
    fn ignores_unrecognized_top_level_keys() {
        let manifest = parse("version: 3\ndevelop:\n  name: Dev\n").unwrap();
        assert!(manifest.section(Section::Develop).is_some());
    }

    #[test]
    fn empty_document_is_an_empty_manifest() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn missing_name_reports_the_node_path() {
        let err = parse("publish:\n  actions:\n    - command: upload\n").unwrap_err();
        assert!(
            err.to_string().contains("publish.actions[0]"),
            "error was: {err}"
        );
    }

    #[test]
    fn non_string_command_element_reports_the_element_path() {
        let err = parse("develop:\n  name: Dev\n  command:\n    - ok\n    - 42\n").unwrap_err();
        assert!(
            err.to_string().contains("develop.command[1]"),
            "error was: {err}"
        );
    }

    #[test]
    fn invalid_syntax_is_a_syntax_error() {
        let err = parse("develop: [unclosed\n").unwrap_err();
        assert!(matches!(err, ManifestError::Syntax(_)));
    }

    #[test]
    fn scalar_top_level_is_rejected() {
        let err = parse("just a string").unwrap_err();
        assert!(matches!(err, ManifestError::Node { .. }));
    }
}
