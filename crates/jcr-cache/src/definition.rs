// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Opaque references to node and property definitions.
//!
//! The type system that owns these definitions lives outside this crate. Here
//! they are plain values: stored, cloned and compared, never interpreted.
use std::fmt;
use std::sync::Arc;

use crate::ident::Name;
use crate::property::PropertyType;

/// Identifies the child-node definition a node was created under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeDefinitionId {
    declaring_type: Name,
    child_name: Name,
    required_primary_types: Arc<[Name]>,
}

impl NodeDefinitionId {
    /// Creates a definition id.
    pub fn new(
        declaring_type: Name,
        child_name: Name,
        required_primary_types: impl IntoIterator<Item = Name>,
    ) -> Self {
        Self {
            declaring_type,
            child_name,
            required_primary_types: required_primary_types.into_iter().collect(),
        }
    }

    /// Node type that declares the definition.
    #[must_use]
    pub const fn declaring_type(&self) -> &Name {
        &self.declaring_type
    }

    /// Child name the definition applies to (`*` for residual definitions).
    #[must_use]
    pub const fn child_name(&self) -> &Name {
        &self.child_name
    }

    /// Primary types a child under this definition must have.
    #[must_use]
    pub fn required_primary_types(&self) -> &[Name] {
        &self.required_primary_types
    }
}

impl fmt::Display for NodeDefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.declaring_type, self.child_name)?;
        for (i, ty) in self.required_primary_types.iter().enumerate() {
            f.write_str(if i == 0 { "/" } else { "," })?;
            write!(f, "{ty}")?;
        }
        Ok(())
    }
}

/// Identifies the property definition a property was set under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyDefinitionId {
    declaring_type: Name,
    property_name: Name,
    property_type: PropertyType,
    allows_multiple: bool,
}

impl PropertyDefinitionId {
    /// Creates a definition id.
    #[must_use]
    pub const fn new(
        declaring_type: Name,
        property_name: Name,
        property_type: PropertyType,
        allows_multiple: bool,
    ) -> Self {
        Self {
            declaring_type,
            property_name,
            property_type,
            allows_multiple,
        }
    }

    /// Node type that declares the definition.
    #[must_use]
    pub const fn declaring_type(&self) -> &Name {
        &self.declaring_type
    }

    /// Property name the definition applies to (`*` for residual definitions).
    #[must_use]
    pub const fn property_name(&self) -> &Name {
        &self.property_name
    }

    /// Declared value type.
    #[must_use]
    pub const fn property_type(&self) -> PropertyType {
        self.property_type
    }

    /// Whether the definition is multi-valued.
    #[must_use]
    pub const fn allows_multiple(&self) -> bool {
        self.allows_multiple
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_definition_display_lists_required_types() {
        let id = NodeDefinitionId::new(
            "acme:container".into(),
            "acme:geniuses".into(),
            [Name::from("acme:a"), Name::from("acme:b")],
        );
        assert_eq!(id.to_string(), "acme:container/acme:geniuses/acme:a,acme:b");
        assert_eq!(id.required_primary_types().len(), 2);
    }

    #[test]
    fn definitions_compare_by_value() {
        let def = |multiple| {
            PropertyDefinitionId::new("nt:base".into(), "*".into(), PropertyType::String, multiple)
        };
        let (a, b, c) = (def(false), def(false), def(true));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
