//! Path specs and the field trie built from them.
//!
//! A path spec names the fields that restrict a comparison. Each element is
//! either a dot-joined string (`"a.b.c"`), an explicit list of segments
//! (`["a", "b.c"]`, useful when a field name itself contains a dot) or a bare
//! number or boolean, which reads as its string form.
//!
//! The spec is compiled once into a [`PathTree`]. A leaf in the tree stands
//! for the whole subtree beneath it, so `"a"` together with `"a.b"` means
//! just `"a"`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DedupError;
use crate::value::format_number;

/// One path in a path spec, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum PathElement {
    /// Dot-joined field names.
    Dotted(String),
    /// Pre-split field names, used as-is.
    Segments(Vec<String>),
    /// Numeric key, read through its string form.
    Number(f64),
    /// Boolean key, read through its string form.
    Bool(bool),
}

impl PathElement {
    /// Split into field-name segments.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::InvalidPathSpec`] for an empty string, a string
    /// with an empty segment (`"a..b"`) or an empty segment list.
    pub fn segments(&self) -> Result<Vec<String>, DedupError> {
        match self {
            Self::Dotted(path) => split_dotted(path),
            Self::Segments(segments) if segments.is_empty() => {
                Err(DedupError::invalid_path("empty segment list"))
            }
            Self::Segments(segments) => Ok(segments.clone()),
            Self::Number(n) => split_dotted(&format_number(*n)),
            Self::Bool(b) => Ok(vec![b.to_string()]),
        }
    }
}

fn split_dotted(path: &str) -> Result<Vec<String>, DedupError> {
    if path.is_empty() {
        return Err(DedupError::invalid_path("empty path"));
    }
    let segments: Vec<String> = path.split('.').map(str::to_string).collect();
    if segments.iter().any(String::is_empty) {
        return Err(DedupError::invalid_path(format!("empty segment in '{path}'")));
    }
    Ok(segments)
}

impl From<&str> for PathElement {
    fn from(path: &str) -> Self {
        Self::Dotted(path.to_string())
    }
}

impl From<String> for PathElement {
    fn from(path: String) -> Self {
        Self::Dotted(path)
    }
}

impl From<Vec<String>> for PathElement {
    fn from(segments: Vec<String>) -> Self {
        Self::Segments(segments)
    }
}

impl From<&[&str]> for PathElement {
    fn from(segments: &[&str]) -> Self {
        Self::Segments(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

impl From<f64> for PathElement {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for PathElement {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for PathElement {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A list of paths as supplied by the caller.
///
/// Deserializes from a single scalar (one path), a list whose items are
/// scalars or segment lists, going through `serde_json::Value` so every
/// format shares one validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub struct PathSpecInput(pub Vec<PathElement>);

impl PathSpecInput {
    /// Create a spec from paths.
    pub fn new<P: Into<PathElement>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }

    /// The paths, in the order given.
    #[must_use]
    pub fn elements(&self) -> &[PathElement] {
        &self.0
    }

    /// Check if no paths were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P: Into<PathElement>> From<Vec<P>> for PathSpecInput {
    fn from(paths: Vec<P>) -> Self {
        Self::new(paths)
    }
}

impl From<&str> for PathSpecInput {
    fn from(path: &str) -> Self {
        Self(vec![PathElement::from(path)])
    }
}

impl From<PathElement> for PathSpecInput {
    fn from(element: PathElement) -> Self {
        Self(vec![element])
    }
}

impl TryFrom<serde_json::Value> for PathSpecInput {
    type Error = DedupError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match json {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(element_from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self),
            other => element_from_json(other).map(|element| Self(vec![element])),
        }
    }
}

fn element_from_json(json: serde_json::Value) -> Result<PathElement, DedupError> {
    match json {
        serde_json::Value::String(s) => Ok(PathElement::Dotted(s)),
        serde_json::Value::Number(n) => Ok(PathElement::Number(n.as_f64().unwrap_or(f64::NAN))),
        serde_json::Value::Bool(b) => Ok(PathElement::Bool(b)),
        serde_json::Value::Array(segments) => segments
            .into_iter()
            .map(segment_from_json)
            .collect::<Result<Vec<_>, _>>()
            .map(PathElement::Segments),
        serde_json::Value::Null => Err(DedupError::invalid_path("null is not a path")),
        serde_json::Value::Object(_) => Err(DedupError::invalid_path("an object is not a path")),
    }
}

fn segment_from_json(json: serde_json::Value) -> Result<String, DedupError> {
    match json {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(format_number(n.as_f64().unwrap_or(f64::NAN))),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(DedupError::invalid_path(format!("segment must be a scalar, got {other}"))),
    }
}

impl From<PathSpecInput> for serde_json::Value {
    fn from(spec: PathSpecInput) -> Self {
        serde_json::Value::Array(spec.0.into_iter().map(element_to_json).collect())
    }
}

fn element_to_json(element: PathElement) -> serde_json::Value {
    match element {
        PathElement::Dotted(s) => serde_json::Value::String(s),
        PathElement::Segments(segments) => {
            serde_json::Value::Array(segments.into_iter().map(serde_json::Value::String).collect())
        }
        PathElement::Number(n) => serde_json::Number::from_f64(n)
            .map_or_else(|| serde_json::Value::String(format_number(n)), serde_json::Value::Number),
        PathElement::Bool(b) => serde_json::Value::Bool(b),
    }
}

/// Node of a [`PathTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathNode {
    /// The field is selected as a whole.
    Leaf,
    /// Only the listed fields beneath are selected.
    Branch(PathTree),
}

impl PathNode {
    /// Check if this node selects its whole subtree.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }
}

/// Trie of field names compiled from a [`PathSpecInput`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathTree {
    children: BTreeMap<String, PathNode>,
}

impl PathTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a path spec.
    ///
    /// # Errors
    ///
    /// Returns [`DedupError::InvalidPathSpec`] if any element is malformed.
    pub fn build(spec: &PathSpecInput) -> Result<Self, DedupError> {
        let mut tree = Self::new();
        for element in spec.elements() {
            tree.insert(&element.segments()?);
        }
        Ok(tree)
    }

    /// Insert one path.
    ///
    /// A path running through an existing leaf is already covered and is
    /// ignored. A path ending where deeper paths exist replaces them.
    pub fn insert(&mut self, segments: &[String]) {
        let Some((first, rest)) = segments.split_first() else {
            return;
        };

        if rest.is_empty() {
            self.children.insert(first.clone(), PathNode::Leaf);
            return;
        }

        let node = self
            .children
            .entry(first.clone())
            .or_insert_with(|| PathNode::Branch(PathTree::new()));
        if let PathNode::Branch(subtree) = node {
            subtree.insert(rest);
        }
    }

    /// Node at `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PathNode> {
        self.children.get(key)
    }

    /// Check if `key` is selected as a whole.
    #[must_use]
    pub fn is_leaf(&self, key: &str) -> bool {
        self.children.get(key).is_some_and(PathNode::is_leaf)
    }

    /// Top-level keys and their nodes.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if the tree selects nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Every selected path, dot-joined.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths("", &mut out);
        out
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (key, node) in &self.children {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match node {
                PathNode::Leaf => out.push(path),
                PathNode::Branch(subtree) => subtree.collect_paths(&path, out),
            }
        }
    }
}
