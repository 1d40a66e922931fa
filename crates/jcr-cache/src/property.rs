// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Property values and the cached per-property entry.
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;

use crate::definition::PropertyDefinitionId;
use crate::ident::{Name, NodeId};

/// Value type of a property, as declared by its definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyType {
    /// Unicode text.
    String,
    /// Opaque bytes.
    Binary,
    /// 64-bit signed integer.
    Long,
    /// 64-bit float.
    Double,
    /// Point in time.
    Date,
    /// `true` / `false`.
    Boolean,
    /// Qualified name.
    Name,
    /// Repository path.
    Path,
    /// Reference to another node by identifier.
    Reference,
    /// Any of the above; decided per value.
    Undefined,
}

/// A single property value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Unicode text.
    String(Arc<str>),
    /// Opaque bytes.
    Binary(Bytes),
    /// 64-bit signed integer.
    Long(i64),
    /// 64-bit float.
    Double(f64),
    /// Milliseconds since the Unix epoch (UTC).
    Date(i64),
    /// `true` / `false`.
    Boolean(bool),
    /// Qualified name.
    Name(Name),
    /// Repository path, as text.
    Path(Arc<str>),
    /// Reference to another node.
    Reference(NodeId),
}

impl Value {
    /// Reads the value as a name: `Name` values directly, `String` values by
    /// their text. Other kinds yield `None`.
    #[must_use]
    pub fn as_name(&self) -> Option<Name> {
        match self {
            Self::Name(name) => Some(name.clone()),
            Self::String(text) => Some(Name::new(Arc::clone(text))),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Name> for Value {
    fn from(value: Name) -> Self {
        Self::Name(value)
    }
}

/// Value holder: a property name with one or more values.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    name: Name,
    values: Vec<Value>,
}

impl Property {
    /// Creates a property holding `values`.
    pub fn new(name: Name, values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            name,
            values: values.into_iter().collect(),
        }
    }

    /// Property name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// All values in order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// First value, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Value> {
        self.values.first()
    }

    /// Returns `true` when the property holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Identity of a property: owning node plus property name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId {
    node: NodeId,
    name: Name,
}

impl PropertyId {
    /// Creates a property id.
    #[must_use]
    pub const fn new(node: NodeId, name: Name) -> Self {
        Self { node, name }
    }

    /// Node that owns the property.
    #[must_use]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// Property name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.node, self.name)
    }
}

/// Error returned by [`PropertyEntryBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyEntryError {
    /// A property cannot be both newly created and modified.
    #[error("property {0} cannot be both new and modified")]
    NewAndModified(PropertyId),
    /// The value holder's name differs from the property id's name.
    #[error("property {id} holds values named `{found}`")]
    NameMismatch {
        /// Property identity.
        id: PropertyId,
        /// Name carried by the value holder.
        found: Name,
    },
}

/// Immutable cached state of one property.
///
/// Equality and hashing use the [`PropertyId`] only. `is_new` and
/// `is_modified` are never both `true`; [`PropertyEntryBuilder::build`]
/// rejects that combination.
#[derive(Clone, Debug)]
pub struct PropertyEntry {
    id: PropertyId,
    definition: PropertyDefinitionId,
    property_type: PropertyType,
    property: Arc<Property>,
    multi_valued: bool,
    is_new: bool,
    is_modified: bool,
}

impl PropertyEntry {
    /// Starts building an entry. Defaults: type taken from the definition,
    /// single-valued unless the definition allows multiple, neither new nor
    /// modified.
    #[must_use]
    pub fn builder(
        id: PropertyId,
        definition: PropertyDefinitionId,
        property: Property,
    ) -> PropertyEntryBuilder {
        PropertyEntryBuilder {
            property_type: definition.property_type(),
            multi_valued: definition.allows_multiple(),
            id,
            definition,
            property,
            is_new: false,
            is_modified: false,
        }
    }

    /// Property identity.
    #[must_use]
    pub const fn id(&self) -> &PropertyId {
        &self.id
    }

    /// Property name, shorthand for `id().name()`.
    #[must_use]
    pub const fn name(&self) -> &Name {
        self.id.name()
    }

    /// Definition the property was set under.
    #[must_use]
    pub const fn definition_id(&self) -> &PropertyDefinitionId {
        &self.definition
    }

    /// Actual value type.
    #[must_use]
    pub const fn property_type(&self) -> PropertyType {
        self.property_type
    }

    /// Value holder.
    #[must_use]
    pub fn property(&self) -> &Property {
        &self.property
    }

    /// Whether the property is multi-valued.
    #[must_use]
    pub const fn is_multi_valued(&self) -> bool {
        self.multi_valued
    }

    /// Created in the current session and not yet saved.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.is_new
    }

    /// Existed before the session and was changed in it.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Same entry with both status flags cleared, as it reads once saved.
    #[must_use]
    pub fn persisted(&self) -> Self {
        Self {
            is_new: false,
            is_modified: false,
            ..self.clone()
        }
    }
}

impl PartialEq for PropertyEntry {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PropertyEntry {}

impl Hash for PropertyEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Builder for [`PropertyEntry`].
#[derive(Clone, Debug)]
#[must_use]
pub struct PropertyEntryBuilder {
    id: PropertyId,
    definition: PropertyDefinitionId,
    property_type: PropertyType,
    property: Property,
    multi_valued: bool,
    is_new: bool,
    is_modified: bool,
}

impl PropertyEntryBuilder {
    /// Overrides the value type.
    pub const fn property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = property_type;
        self
    }

    /// Overrides multi-valuedness.
    pub const fn multi_valued(mut self, multi_valued: bool) -> Self {
        self.multi_valued = multi_valued;
        self
    }

    /// Marks the property as created in this session.
    pub const fn new_property(mut self, is_new: bool) -> Self {
        self.is_new = is_new;
        self
    }

    /// Marks the property as modified in this session.
    pub const fn modified(mut self, is_modified: bool) -> Self {
        self.is_modified = is_modified;
        self
    }

    /// Validates and builds the entry.
    pub fn build(self) -> Result<PropertyEntry, PropertyEntryError> {
        if self.is_new && self.is_modified {
            return Err(PropertyEntryError::NewAndModified(self.id));
        }
        if self.property.name() != self.id.name() {
            return Err(PropertyEntryError::NameMismatch {
                found: self.property.name().clone(),
                id: self.id,
            });
        }
        Ok(PropertyEntry {
            id: self.id,
            definition: self.definition,
            property_type: self.property_type,
            property: Arc::new(self.property),
            multi_valued: self.multi_valued,
            is_new: self.is_new,
            is_modified: self.is_modified,
        })
    }
}
