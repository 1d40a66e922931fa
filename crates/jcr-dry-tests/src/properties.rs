// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `PropertyEntry` helpers for tests.

use jcr_cache::{
    Name, NodeId, Property, PropertyDefinitionId, PropertyEntry, PropertyId, PropertyType, Value,
    MIXIN_TYPES_PROPERTY,
};

fn entry(
    node: NodeId,
    name: &str,
    ty: PropertyType,
    multiple: bool,
    values: Vec<Value>,
) -> PropertyEntry {
    let name = Name::from(name);
    PropertyEntry::builder(
        PropertyId::new(node, name.clone()),
        PropertyDefinitionId::new("nt:base".into(), "*".into(), ty, multiple),
        Property::new(name, values),
    )
    .build()
    .expect("id and value holder share a name")
}

/// Single-valued string property owned by `node`.
pub fn string_property(node: NodeId, name: &str, value: &str) -> PropertyEntry {
    entry(node, name, PropertyType::String, false, vec![Value::from(value)])
}

/// Multi-valued name property owned by `node`.
pub fn name_property(node: NodeId, name: &str, values: &[&str]) -> PropertyEntry {
    let values = values.iter().map(|v| Value::Name(Name::from(*v))).collect();
    entry(node, name, PropertyType::Name, true, values)
}

/// `jcr:mixinTypes` property listing `mixins`.
pub fn mixin_types_property(node: NodeId, mixins: &[&str]) -> PropertyEntry {
    name_property(node, MIXIN_TYPES_PROPERTY, mixins)
}
