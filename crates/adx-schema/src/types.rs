//! # Type Model
//!
//! A [`TypeNode`] is one definition in the schema graph. Nodes are
//! deserialized straight from the YAML/JSON schema files with serde; a
//! definition may be written out in full or as a bare type expression:
//!
//! ```yaml
//! DealProposal:
//!   properties:
//!     name: string                 # bare builtin
//!     floorPrice: Money            # bare custom reference
//!     tags: string[]               # array shorthand
//!     target: Geo | Audience       # union shorthand
//!     status:
//!       type: string
//!       enum: [draft, proposed]
//! ```
//!
//! Custom types are referenced by name and resolved through the
//! [`TypeCollection`](crate::TypeCollection) at validation time, so a node
//! never holds a pointer to another named definition and recursive types
//! need no special handling.

use std::fmt;

use regex::Regex;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The `type` of a node: a builtin or the name of another definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    /// Object with `properties`.
    Object,
    /// UTF-8 string.
    String,
    /// Whole number.
    Integer,
    /// Any number.
    Number,
    /// `true` / `false`.
    Boolean,
    /// Ordered list, elements checked against `items`.
    Array,
    /// `YYYY-MM-DD`.
    DateOnly,
    /// `HH:MM:SS`.
    TimeOnly,
    /// `YYYY-MM-DDTHH:MM:SS` without an offset.
    DateTimeOnly,
    /// Any parseable date-time, offset allowed.
    DateTime,
    /// One of `anyOf`.
    Union,
    /// Accepts everything.
    Any,
    /// Reference to a named definition.
    Custom(String),
}

impl TypeName {
    /// Resolve a single type token (no shorthand).
    pub fn parse(name: &str) -> Self {
        match name {
            "object" => Self::Object,
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "date-only" => Self::DateOnly,
            "time-only" => Self::TimeOnly,
            "datetime-only" => Self::DateTimeOnly,
            "datetime" => Self::DateTime,
            "union" => Self::Union,
            "any" => Self::Any,
            other => Self::Custom(other.to_string()),
        }
    }

    /// The name as written in schema files.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Object => "object",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::DateOnly => "date-only",
            Self::TimeOnly => "time-only",
            Self::DateTimeOnly => "datetime-only",
            Self::DateTime => "datetime",
            Self::Union => "union",
            Self::Any => "any",
            Self::Custom(name) => name,
        }
    }

}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled `pattern` facet.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a pattern.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    /// Unanchored match, as schema patterns are written.
    pub fn is_match(&self, s: &str) -> bool {
        self.0.is_match(s)
    }

    /// The source text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source)
            .map_err(|e| de::Error::custom(format!("invalid pattern {source:?}: {e}")))
    }
}

/// One node of the schema graph.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "TypeDecl")]
pub struct TypeNode {
    /// Builtin or custom type.
    pub kind: TypeName,
    /// Whether absence is an error.
    pub required: bool,
    /// Declared properties in declaration order (object types).
    pub properties: Option<Vec<(String, TypeNode)>>,
    /// When false, undeclared keys are reported.
    pub additional_properties: bool,
    /// Allowed literals, compared in string form.
    pub enum_values: Option<Vec<Value>>,
    /// Value used by `fillDefaults` / `forceDefaults` / `forceOnError`.
    pub default: Option<Value>,
    /// Inclusive lower bound for numbers.
    pub minimum: Option<f64>,
    /// Inclusive upper bound for numbers.
    pub maximum: Option<f64>,
    /// Minimum string length in characters.
    pub min_length: Option<usize>,
    /// Maximum string length in characters.
    pub max_length: Option<usize>,
    /// String pattern.
    pub pattern: Option<Pattern>,
    /// Minimum array length.
    pub min_items: Option<usize>,
    /// Maximum array length.
    pub max_items: Option<usize>,
    /// Reject arrays with duplicate elements.
    pub unique_items: bool,
    /// Element type for arrays.
    pub items: Option<Box<TypeNode>>,
    /// Union alternatives, tried in order.
    pub any_of: Vec<TypeNode>,
    /// Human-readable name, ignored by validation.
    pub display_name: Option<String>,
    /// Free text, ignored by validation.
    pub description: Option<String>,
}

impl TypeNode {
    /// A bare node of the given type with every facet unset.
    pub fn of(kind: TypeName) -> Self {
        Self {
            kind,
            required: false,
            properties: None,
            additional_properties: true,
            enum_values: None,
            default: None,
            minimum: None,
            maximum: None,
            min_length: None,
            max_length: None,
            pattern: None,
            min_items: None,
            max_items: None,
            unique_items: false,
            items: None,
            any_of: Vec::new(),
            display_name: None,
            description: None,
        }
    }

    /// An object node with the given properties.
    pub fn object(properties: Vec<(String, TypeNode)>) -> Self {
        Self {
            properties: Some(properties),
            ..Self::of(TypeName::Object)
        }
    }

    /// Mark the node required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a default.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Parse a type expression such as `string`, `Money[]`, or `A | B[]`.
    pub fn from_expr(expr: &str) -> Result<Self, String> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Err("empty type expression".to_string());
        }

        let alternatives = split_top_level(expr, '|');
        if alternatives.len() > 1 {
            let any_of = alternatives
                .into_iter()
                .map(Self::from_expr)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self {
                any_of,
                ..Self::of(TypeName::Union)
            });
        }

        if let Some(inner) = expr.strip_suffix("[]") {
            let items = Self::from_expr(inner)?;
            return Ok(Self {
                items: Some(Box::new(items)),
                ..Self::of(TypeName::Array)
            });
        }

        if let Some(inner) = expr.strip_prefix('(').and_then(|e| e.strip_suffix(')')) {
            return Self::from_expr(inner);
        }

        if expr.contains(['(', ')', '[', ']']) {
            return Err(format!("malformed type expression {expr:?}"));
        }
        Ok(Self::of(TypeName::parse(expr)))
    }

    /// Whether this node constrains its value to a fixed set of literals.
    pub fn is_enum(&self) -> bool {
        self.enum_values.is_some()
    }

    /// Depth-first walk over this node and every nested node
    /// (properties, items, union alternatives). Named references are not
    /// followed.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a TypeNode)) {
        f(self);
        if let Some(properties) = &self.properties {
            for (_, child) in properties {
                child.walk(f);
            }
        }
        if let Some(items) = &self.items {
            items.walk(f);
        }
        for alternative in &self.any_of {
            alternative.walk(f);
        }
    }
}

/// Split on `sep` where it is not nested inside parentheses.
fn split_top_level(expr: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&expr[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&expr[start..]);
    parts
}

/// A definition as written: a bare type expression or a full mapping.
pub(crate) enum TypeDecl {
    Expr(String),
    Node(Box<RawTypeNode>),
}

impl<'de> Deserialize<'de> for TypeDecl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DeclVisitor;

        impl<'de> Visitor<'de> for DeclVisitor {
            type Value = TypeDecl;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a type expression or a type definition mapping")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<TypeDecl, E> {
                Ok(TypeDecl::Expr(v.to_string()))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<TypeDecl, A::Error> {
                let raw = RawTypeNode::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(TypeDecl::Node(Box::new(raw)))
            }
        }

        deserializer.deserialize_any(DeclVisitor)
    }
}

impl TryFrom<TypeDecl> for TypeNode {
    type Error = String;

    fn try_from(decl: TypeDecl) -> Result<Self, Self::Error> {
        match decl {
            TypeDecl::Expr(expr) => TypeNode::from_expr(&expr),
            TypeDecl::Node(raw) => raw.into_node(),
        }
    }
}

/// Field-for-field image of a definition mapping before normalization.
/// Unrecognized keys are a load error, so a misspelled facet cannot be
/// silently dropped.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct RawTypeNode {
    #[serde(rename = "type")]
    type_expr: Option<String>,
    required: Option<bool>,
    properties: Option<Properties>,
    additional_properties: Option<bool>,
    #[serde(rename = "enum")]
    enum_values: Option<Vec<Value>>,
    default: Option<Value>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Pattern>,
    min_items: Option<usize>,
    max_items: Option<usize>,
    unique_items: Option<bool>,
    items: Option<TypeNode>,
    any_of: Option<Vec<TypeNode>>,
    display_name: Option<String>,
    description: Option<String>,
}

impl RawTypeNode {
    fn into_node(self) -> Result<TypeNode, String> {
        let mut node = match &self.type_expr {
            Some(expr) => TypeNode::from_expr(expr)?,
            None if self.properties.is_some() => TypeNode::of(TypeName::Object),
            None if self.any_of.is_some() => TypeNode::of(TypeName::Union),
            None if self.items.is_some() => TypeNode::of(TypeName::Array),
            None => TypeNode::of(TypeName::String),
        };

        node.required = self.required.unwrap_or(false);
        node.properties = self.properties.map(|p| p.0);
        node.additional_properties = self.additional_properties.unwrap_or(true);
        node.enum_values = self.enum_values;
        node.default = self.default;
        node.minimum = self.minimum;
        node.maximum = self.maximum;
        node.min_length = self.min_length;
        node.max_length = self.max_length;
        node.pattern = self.pattern;
        node.min_items = self.min_items;
        node.max_items = self.max_items;
        node.unique_items = self.unique_items.unwrap_or(false);
        node.display_name = self.display_name;
        node.description = self.description;
        // Explicit `items` / `anyOf` win over what the shorthand implied.
        if let Some(items) = self.items {
            node.items = Some(Box::new(items));
        }
        if let Some(any_of) = self.any_of {
            node.any_of = any_of;
        }
        Ok(node)
    }
}

/// Ordered property map. A trailing `?` on a key marks it optional.
pub(crate) struct Properties(pub(crate) Vec<(String, TypeNode)>);

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = Properties;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of property names to type definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Properties, A::Error> {
                let mut properties: Vec<(String, TypeNode)> = Vec::new();
                while let Some((key, mut node)) = map.next_entry::<String, TypeNode>()? {
                    let name = match key.strip_suffix('?') {
                        Some(stripped) => {
                            node.required = false;
                            stripped.to_string()
                        }
                        None => key,
                    };
                    if properties.iter().any(|(existing, _)| *existing == name) {
                        return Err(de::Error::custom(format!("duplicate property {name:?}")));
                    }
                    properties.push((name, node));
                }
                Ok(Properties(properties))
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}
