//! Script loader: YAML node descriptions → behavior trees.
//!
//! Every node is a mapping with a `type` tag plus type-specific fields.
//! [`NodeRegistry`] maps tags to constructors; [`BehaviorLibrary`] holds a
//! named set of templates loaded from one script file.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde_yaml::Value;

use crate::composite::{Parallel, Repeat, Sequence};
use crate::{BehaviorError, BehaviorNode, BehaviorResult, NavigateBehavior, WaitBehavior};

/// Builds one node from its description.  Composite constructors use the
/// registry to build their children.
pub type NodeConstructor = fn(&Value, &NodeRegistry) -> BehaviorResult<Box<dyn BehaviorNode>>;

// ── NodeRegistry ──────────────────────────────────────────────────────────────

/// Tag → constructor table.
///
/// `NodeRegistry::default()` knows `navigate`, `wait`, `sequence`,
/// `parallel` and `repeat`; [`register`][Self::register] adds more.
#[derive(Clone)]
pub struct NodeRegistry {
    constructors: BTreeMap<String, NodeConstructor>,
}

impl NodeRegistry {
    /// A registry with no tags at all.
    pub fn empty() -> Self {
        Self { constructors: BTreeMap::new() }
    }

    /// Add or replace the constructor for `tag`.
    pub fn register(&mut self, tag: impl Into<String>, constructor: NodeConstructor) -> &mut Self {
        self.constructors.insert(tag.into(), constructor);
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.constructors.keys().map(String::as_str)
    }

    /// Build the tree rooted at `desc`.  Any failure aborts the whole tree.
    pub fn build(&self, desc: &Value) -> BehaviorResult<Box<dyn BehaviorNode>> {
        let tag = desc
            .as_mapping()
            .and_then(|m| m.get("type"))
            .and_then(Value::as_str)
            .ok_or(BehaviorError::MissingType)?;
        let constructor = self
            .constructors
            .get(tag)
            .ok_or_else(|| BehaviorError::UnknownNodeType(tag.to_owned()))?;
        constructor(desc, self)
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register("navigate", build_navigate)
            .register("wait", build_wait)
            .register("sequence", build_sequence)
            .register("parallel", build_parallel)
            .register("repeat", build_repeat);
        registry
    }
}

fn build_navigate(desc: &Value, _: &NodeRegistry) -> BehaviorResult<Box<dyn BehaviorNode>> {
    Ok(Box::new(NavigateBehavior::from_yaml(desc)?))
}

fn build_wait(desc: &Value, _: &NodeRegistry) -> BehaviorResult<Box<dyn BehaviorNode>> {
    Ok(Box::new(WaitBehavior::from_yaml(desc)?))
}

fn build_sequence(desc: &Value, registry: &NodeRegistry) -> BehaviorResult<Box<dyn BehaviorNode>> {
    Ok(Box::new(Sequence::from_yaml(desc, registry)?))
}

fn build_parallel(desc: &Value, registry: &NodeRegistry) -> BehaviorResult<Box<dyn BehaviorNode>> {
    Ok(Box::new(Parallel::from_yaml(desc, registry)?))
}

fn build_repeat(desc: &Value, registry: &NodeRegistry) -> BehaviorResult<Box<dyn BehaviorNode>> {
    Ok(Box::new(Repeat::from_yaml(desc, registry)?))
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.tags()).finish()
    }
}

/// Build a tree with the built-in node types.
pub fn build_node(desc: &Value) -> BehaviorResult<Box<dyn BehaviorNode>> {
    NodeRegistry::default().build(desc)
}

/// Parse a YAML node description and build it with the built-in node types.
pub fn parse_node(text: &str) -> BehaviorResult<Box<dyn BehaviorNode>> {
    let desc: Value = serde_yaml::from_str(text)?;
    build_node(&desc)
}

// ── BehaviorLibrary ───────────────────────────────────────────────────────────

/// Named behavior templates from one script document:
///
/// ```yaml
/// behaviors:
///   patrol:
///     type: sequence
///     children:
///       - { type: navigate, destination: Dock-1 }
///       - { type: wait, seconds: 5 }
///   # A bare list is shorthand for a sequence.
///   hop:
///     - { type: navigate, destination: Dock-2 }
/// ```
///
/// Templates are never ticked; [`instantiate`][Self::instantiate] hands out
/// fresh clones.
#[derive(Debug, Default)]
pub struct BehaviorLibrary {
    templates: BTreeMap<String, Box<dyn BehaviorNode>>,
}

impl BehaviorLibrary {
    pub fn load(path: &Path) -> BehaviorResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let library = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), behaviors = library.len(), "behavior library loaded");
        Ok(library)
    }

    pub fn from_yaml_str(text: &str) -> BehaviorResult<Self> {
        Self::from_yaml_str_with(text, &NodeRegistry::default())
    }

    /// Like [`from_yaml_str`][Self::from_yaml_str] with a custom registry.
    pub fn from_yaml_str_with(text: &str, registry: &NodeRegistry) -> BehaviorResult<Self> {
        let doc: Value = serde_yaml::from_str(text)?;
        let behaviors = doc
            .get("behaviors")
            .and_then(Value::as_mapping)
            .ok_or_else(|| BehaviorError::Script("missing top-level `behaviors` mapping".into()))?;

        let mut templates = BTreeMap::new();
        for (key, desc) in behaviors {
            let name = key
                .as_str()
                .ok_or_else(|| BehaviorError::Script(format!("behavior name {key:?} is not a string")))?;
            let node = match desc {
                Value::Sequence(items) => items
                    .iter()
                    .map(|item| registry.build(item))
                    .collect::<BehaviorResult<Vec<_>>>()
                    .map(|children| Box::new(Sequence::new(children)) as Box<dyn BehaviorNode>),
                _ => registry.build(desc),
            }
            .map_err(|e| BehaviorError::InBehavior { name: name.to_owned(), source: Box::new(e) })?;
            templates.insert(name.to_owned(), node);
        }
        Ok(Self { templates })
    }

    /// Add or replace a template.
    pub fn insert(&mut self, name: impl Into<String>, template: Box<dyn BehaviorNode>) {
        self.templates.insert(name.into(), template);
    }

    pub fn get(&self, name: &str) -> Option<&dyn BehaviorNode> {
        self.templates.get(name).map(|b| b.as_ref())
    }

    /// A fresh clone of the named template.
    pub fn instantiate(&self, name: &str) -> BehaviorResult<Box<dyn BehaviorNode>> {
        self.get(name)
            .map(|t| t.clone_node())
            .ok_or_else(|| BehaviorError::UnknownBehavior(name.to_owned()))
    }

    /// Behavior names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

// ── Field helpers ─────────────────────────────────────────────────────────────

pub(crate) mod fields {
    use serde_yaml::Value;

    use crate::BehaviorError;

    pub fn invalid(node: &str, field: &'static str, reason: impl Into<String>) -> BehaviorError {
        BehaviorError::InvalidField { node: node.to_owned(), field, reason: reason.into() }
    }

    pub fn require<'v>(desc: &'v Value, node: &str, field: &'static str) -> Result<&'v Value, BehaviorError> {
        desc.get(field)
            .ok_or_else(|| BehaviorError::MissingField { node: node.to_owned(), field })
    }

    pub fn require_str<'v>(desc: &'v Value, node: &str, field: &'static str) -> Result<&'v str, BehaviorError> {
        require(desc, node, field)?
            .as_str()
            .ok_or_else(|| invalid(node, field, "must be a string"))
    }

    pub fn require_f64(desc: &Value, node: &str, field: &'static str) -> Result<f64, BehaviorError> {
        as_finite_f64(require(desc, node, field)?, node, field)
    }

    pub fn require_u32(desc: &Value, node: &str, field: &'static str) -> Result<u32, BehaviorError> {
        require(desc, node, field)?
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| invalid(node, field, "must be a non-negative integer"))
    }

    pub fn require_seq<'v>(desc: &'v Value, node: &str, field: &'static str) -> Result<&'v [Value], BehaviorError> {
        require(desc, node, field)?
            .as_sequence()
            .map(Vec::as_slice)
            .ok_or_else(|| invalid(node, field, "must be a list of nodes"))
    }

    /// `Ok(None)` when absent; present values must be finite and `> 0`.
    pub fn optional_positive_f64(
        desc:  &Value,
        node:  &str,
        field: &'static str,
    ) -> Result<Option<f64>, BehaviorError> {
        let Some(value) = desc.get(field) else {
            return Ok(None);
        };
        let v = as_finite_f64(value, node, field)?;
        if v <= 0.0 {
            return Err(invalid(node, field, "must be greater than zero"));
        }
        Ok(Some(v))
    }

    fn as_finite_f64(value: &Value, node: &str, field: &'static str) -> Result<f64, BehaviorError> {
        value
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(node, field, "must be a finite number"))
    }
}
