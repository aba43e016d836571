//! Data models for API snapshots.
//!
//! These types represent the public surface of one revision of a library,
//! providing a language-agnostic tree of units, fields, and functions that
//! the differ can compare. Extraction from real source code happens upstream;
//! by the time a snapshot reaches this crate it is immutable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A type descriptor that knows which other types it can stand in for.
///
/// `new.is_compatible(old)` answers whether code written against `old`
/// keeps working when it receives `new` (numeric widening, subtyping, ...).
pub trait ApiType: Eq + Hash + fmt::Debug {
    fn is_compatible(&self, other: &Self) -> bool;
}

/// Top-level mapping from entity name to entity.
pub type Codebase<T> = BTreeMap<String, Entity<T>>;

/// A nominal type with an explicit list of types it accepts.
///
/// Equality only looks at the name and array dimension; `accepts` is
/// compatibility metadata computed by the extractor (usually the transitive
/// set of subtypes or narrower numeric types).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NamedType {
    pub name: String,
    #[serde(default)]
    pub dimension: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepts: Vec<String>,
}

impl NamedType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimension: 0,
            accepts: Vec::new(),
        }
    }

    /// Set array dimension.
    pub fn with_dimension(mut self, dimension: u32) -> Self {
        self.dimension = dimension;
        self
    }

    /// Add type names this type can stand in for.
    pub fn accepting<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepts.extend(names.into_iter().map(Into::into));
        self
    }
}

impl PartialEq for NamedType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.dimension == other.dimension
    }
}

impl Eq for NamedType {}

impl Hash for NamedType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.dimension.hash(state);
    }
}

impl ApiType for NamedType {
    fn is_compatible(&self, other: &Self) -> bool {
        if self == other {
            return true;
        }
        self.dimension == other.dimension && self.accepts.iter().any(|name| *name == other.name)
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for _ in 0..self.dimension {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// A function parameter.
///
/// Parameters are compared by position, so the name is informational and
/// does not take part in equality.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Parameter<T> {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl<T> Parameter<T> {
    pub fn new(name: impl Into<String>, ty: T) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
        }
    }

    /// Set default value, making the parameter optional.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }
}

impl<T: PartialEq> PartialEq for Parameter<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.default_value == other.default_value
    }
}

impl<T: Eq> Eq for Parameter<T> {}

impl<T: Hash> Hash for Parameter<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.hash(state);
        self.default_value.hash(state);
    }
}

/// One overload of a callable entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Signature<T> {
    #[serde(default)]
    pub parameters: Vec<Parameter<T>>,
}

impl<T> Signature<T> {
    pub fn new(parameters: Vec<Parameter<T>>) -> Self {
        Self { parameters }
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

/// What an entity is, and therefore which comparisons apply to it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "snake_case",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub enum EntityKind<T> {
    /// A typed leaf (field, constant, property).
    Field {
        #[serde(rename = "type")]
        ty: T,
    },
    /// A callable with a return type and one or more overloads.
    Function {
        #[serde(rename = "type")]
        ty: T,
        #[serde(default)]
        signatures: Vec<Signature<T>>,
    },
    /// A namespace (module, class, interface) holding named children.
    Unit {
        #[serde(default)]
        fields: Codebase<T>,
        #[serde(default)]
        functions: Codebase<T>,
        #[serde(default)]
        units: Codebase<T>,
    },
}

/// A named node of an API snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entity<T> {
    pub name: String,
    #[serde(flatten)]
    pub kind: EntityKind<T>,
}

impl<T> Entity<T> {
    pub fn field(name: impl Into<String>, ty: T) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Field { ty },
        }
    }

    pub fn function(name: impl Into<String>, ty: T, signatures: Vec<Signature<T>>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Function { ty, signatures },
        }
    }

    pub fn unit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Unit {
                fields: BTreeMap::new(),
                functions: BTreeMap::new(),
                units: BTreeMap::new(),
            },
        }
    }

    /// Add a field to a unit. No-op on other kinds.
    pub fn with_field(mut self, child: Entity<T>) -> Self {
        if let EntityKind::Unit { fields, .. } = &mut self.kind {
            fields.insert(child.name.clone(), child);
        }
        self
    }

    /// Add a function to a unit. No-op on other kinds.
    pub fn with_function(mut self, child: Entity<T>) -> Self {
        if let EntityKind::Unit { functions, .. } = &mut self.kind {
            functions.insert(child.name.clone(), child);
        }
        self
    }

    /// Add a nested unit to a unit. No-op on other kinds.
    pub fn with_unit(mut self, child: Entity<T>) -> Self {
        if let EntityKind::Unit { units, .. } = &mut self.kind {
            units.insert(child.name.clone(), child);
        }
        self
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            EntityKind::Field { .. } => "field",
            EntityKind::Function { .. } => "function",
            EntityKind::Unit { .. } => "unit",
        }
    }

    pub fn ty(&self) -> Option<&T> {
        match &self.kind {
            EntityKind::Field { ty } | EntityKind::Function { ty, .. } => Some(ty),
            EntityKind::Unit { .. } => None,
        }
    }

    pub fn signatures(&self) -> Option<&[Signature<T>]> {
        match &self.kind {
            EntityKind::Function { signatures, .. } => Some(signatures),
            _ => None,
        }
    }

    /// Named child collections, in a fixed order per kind.
    pub fn children(&self) -> Vec<(&'static str, &Codebase<T>)> {
        match &self.kind {
            EntityKind::Unit {
                fields,
                functions,
                units,
            } => vec![("fields", fields), ("functions", functions), ("units", units)],
            _ => Vec::new(),
        }
    }

    /// Whether both entities expose the same capability set.
    pub fn same_shape(&self, other: &Entity<T>) -> bool {
        std::mem::discriminant(&self.kind) == std::mem::discriminant(&other.kind)
    }
}

/// Build a codebase from a list of entities, keyed by name.
pub fn codebase<T>(entities: impl IntoIterator<Item = Entity<T>>) -> Codebase<T> {
    entities
        .into_iter()
        .map(|entity| (entity.name.clone(), entity))
        .collect()
}
