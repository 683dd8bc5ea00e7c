//! # Type Collection
//!
//! Loads every schema file in a directory into one immutable name → node
//! map and checks it for self-consistency before anything is validated.
//!
//! ## File Shapes
//!
//! A schema file is either a flat mapping of type names to definitions, or
//! a sectioned document:
//!
//! ```yaml
//! types:
//!   Money:
//!     type: number
//!     minimum: 0
//! traits:
//!   paged:
//!     queryParameters:
//!       page: { type: integer, minimum: 1, default: 1 }
//!       perPage: { type: integer, maximum: 200, default: 50 }
//! ```
//!
//! Each trait group becomes a synthetic object type named
//! `traits/<group>/<trait>`; the example above yields
//! `traits/queryParameters/paged`.
//!
//! ## Consistency Checks
//!
//! Loading fails on duplicate names, dangling references, empty unions or
//! enums, inverted facet bounds, and reference cycles that never descend
//! into the value (`A: B`, `B: A | string`), since those would recurse
//! forever on any input.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SchemaError;
use crate::messages::MESSAGE_FILES;
use crate::types::{Properties, TypeName, TypeNode};

/// Immutable mapping from type name to definition.
#[derive(Debug, Clone, Default)]
pub struct TypeCollection {
    types: HashMap<String, TypeNode>,
}

/// A document with explicit `types` / `traits` sections.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SectionedDocument {
    #[serde(default)]
    types: HashMap<String, TypeNode>,
    #[serde(default)]
    traits: HashMap<String, HashMap<String, serde_yaml::Value>>,
}

impl TypeCollection {
    /// Build a collection from in-memory definitions.
    ///
    /// # Errors
    ///
    /// Fails on duplicate names or any consistency violation.
    pub fn from_types(
        types: impl IntoIterator<Item = (String, TypeNode)>,
    ) -> Result<Self, SchemaError> {
        let mut collection = Self::default();
        for (name, node) in types {
            collection.insert(name, node, "<inline>")?;
        }
        collection.check()?;
        Ok(collection)
    }

    /// Load every `*.yaml`, `*.yml` and `*.json` file in `dir`.
    ///
    /// Files are read in name order. Message template files are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Io`] for unreadable paths, [`SchemaError::Parse`]
    /// for malformed files, and the consistency errors described in the
    /// module docs.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let dir = dir.as_ref();
        let io_err = |path: &Path| {
            let path = path.display().to_string();
            move |source| SchemaError::Io { path, source }
        };

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err(dir))? {
            let path = entry.map_err(io_err(dir))?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let is_schema = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml" | "yml" | "json")
            );
            if path.is_file() && is_schema && !MESSAGE_FILES.contains(&name) {
                files.push(path);
            }
        }
        files.sort();

        let mut collection = Self::default();
        for path in &files {
            let content = std::fs::read_to_string(path).map_err(io_err(path))?;
            let file = path.display().to_string();
            let is_json = path.extension().is_some_and(|e| e == "json");
            for (name, node) in parse_document(&content, is_json, &file)? {
                collection.insert(name, node, &file)?;
            }
        }
        collection.check()?;

        tracing::info!(
            dir = %dir.display(),
            files = files.len(),
            types = collection.len(),
            "loaded type schema"
        );
        Ok(collection)
    }

    /// Look up a definition.
    pub fn get(&self, name: &str) -> Option<&TypeNode> {
        self.types.get(name)
    }

    /// Whether a name is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of definitions, synthetic trait types included.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether nothing is defined.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn insert(&mut self, name: String, node: TypeNode, file: &str) -> Result<(), SchemaError> {
        if self.types.contains_key(&name) {
            return Err(SchemaError::DuplicateType {
                type_name: name,
                file: file.to_string(),
            });
        }
        self.types.insert(name, node);
        Ok(())
    }

    fn check(&self) -> Result<(), SchemaError> {
        for name in self.names() {
            let Some(root) = self.types.get(name) else {
                continue;
            };
            let mut failure: Option<SchemaError> = None;
            root.walk(&mut |node| {
                if failure.is_none() {
                    failure = self.check_node(name, node).err();
                }
            });
            if let Some(err) = failure {
                return Err(err);
            }
        }
        self.check_cycles()
    }

    fn check_node(&self, type_name: &str, node: &TypeNode) -> Result<(), SchemaError> {
        let inconsistent = |reason: String| SchemaError::Inconsistent {
            type_name: type_name.to_string(),
            reason,
        };

        if let TypeName::Custom(reference) = &node.kind {
            if !self.contains(reference) {
                return Err(SchemaError::UnknownReference {
                    type_name: type_name.to_string(),
                    reference: reference.clone(),
                });
            }
        }
        if node.kind == TypeName::Union && node.any_of.is_empty() {
            return Err(inconsistent("union declares no anyOf alternatives".to_string()));
        }
        if node.enum_values.as_ref().is_some_and(Vec::is_empty) {
            return Err(inconsistent("enum is empty".to_string()));
        }
        if let (Some(min), Some(max)) = (node.minimum, node.maximum) {
            if min > max {
                return Err(inconsistent(format!("minimum {min} exceeds maximum {max}")));
            }
        }
        if let (Some(min), Some(max)) = (node.min_length, node.max_length) {
            if min > max {
                return Err(inconsistent(format!("minLength {min} exceeds maxLength {max}")));
            }
        }
        if let (Some(min), Some(max)) = (node.min_items, node.max_items) {
            if min > max {
                return Err(inconsistent(format!("minItems {min} exceeds maxItems {max}")));
            }
        }
        Ok(())
    }

    /// Reject reference loops that revisit a type without consuming any of
    /// the value (through `type` aliases and union alternatives only).
    fn check_cycles(&self) -> Result<(), SchemaError> {
        let mut done: HashSet<&str> = HashSet::new();
        for name in self.names() {
            let mut stack: Vec<&str> = Vec::new();
            self.visit_aliases(name, &mut stack, &mut done)?;
        }
        Ok(())
    }

    fn visit_aliases<'a>(
        &'a self,
        name: &'a str,
        stack: &mut Vec<&'a str>,
        done: &mut HashSet<&'a str>,
    ) -> Result<(), SchemaError> {
        if done.contains(name) {
            return Ok(());
        }
        if stack.contains(&name) {
            stack.push(name);
            return Err(SchemaError::Inconsistent {
                type_name: stack[0].to_string(),
                reason: format!("reference cycle {}", stack.join(" -> ")),
            });
        }
        let Some(node) = self.types.get(name) else {
            return Ok(());
        };
        stack.push(name);
        let mut next = Vec::new();
        same_value_references(node, &mut next);
        for reference in next {
            self.visit_aliases(reference, stack, done)?;
        }
        stack.pop();
        done.insert(name);
        Ok(())
    }
}

/// Names a node hands the *same* value to: its own custom `type` and those
/// of its union alternatives.
fn same_value_references<'a>(node: &'a TypeNode, out: &mut Vec<&'a str>) {
    if let TypeName::Custom(reference) = &node.kind {
        out.push(reference);
    }
    for alternative in &node.any_of {
        same_value_references(alternative, out);
    }
}

/// Parse one schema file into its named definitions, expanding traits.
fn parse_document(
    content: &str,
    is_json: bool,
    file: &str,
) -> Result<Vec<(String, TypeNode)>, SchemaError> {
    let parse_err = |reason: String| SchemaError::Parse {
        file: file.to_string(),
        reason,
    };

    // Both formats land in a YAML value so mapping order is kept either way.
    let document: serde_yaml::Value = if is_json {
        serde_json::from_str(content).map_err(|e| parse_err(e.to_string()))?
    } else {
        serde_yaml::from_str(content).map_err(|e| parse_err(e.to_string()))?
    };

    let mapping = match &document {
        serde_yaml::Value::Null => return Ok(Vec::new()),
        serde_yaml::Value::Mapping(mapping) => mapping,
        _ => return Err(parse_err("top level must be a mapping of type names".to_string())),
    };

    let sectioned = !mapping.is_empty()
        && mapping
            .keys()
            .all(|k| matches!(k.as_str(), Some("types" | "traits")));

    if !sectioned {
        let types: Vec<(String, TypeNode)> = serde_yaml::from_value::<HashMap<String, TypeNode>>(
            document,
        )
        .map_err(|e| parse_err(e.to_string()))?
        .into_iter()
        .collect();
        return Ok(types);
    }

    let sections: SectionedDocument =
        serde_yaml::from_value(document).map_err(|e| parse_err(e.to_string()))?;
    let mut types: Vec<(String, TypeNode)> = sections.types.into_iter().collect();
    for (trait_name, groups) in sections.traits {
        for (group, body) in groups {
            // Scalar entries such as `description` or `usage` carry no properties.
            if !body.is_mapping() {
                continue;
            }
            let properties: Properties = serde_yaml::from_value(body)
                .map_err(|e| parse_err(format!("trait '{trait_name}' group '{group}': {e}")))?;
            types.push((
                format!("traits/{group}/{trait_name}"),
                TypeNode::object(properties.0),
            ));
        }
    }
    Ok(types)
}
