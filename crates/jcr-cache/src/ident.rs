// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifier, name and location types.
use std::fmt;
use std::sync::Arc;

use blake3::Hasher;
use uuid::Uuid;

/// Opaque, globally unique identity of a node.
///
/// `NodeId` is a 128-bit identifier. Nodes loaded from a backing store carry
/// whatever identifier the store assigned; nodes created in a session usually
/// get one from [`NodeId::random`]. Fixtures and tooling that need stable ids
/// use [`make_node_id`] (`blake3("node:" || label)`, truncated to 16 bytes).
///
/// Identity is independent of a node's name or position: a node keeps its
/// `NodeId` when it is renumbered among same-name siblings or moved.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Generates a fresh random (v4) identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps raw identifier bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the canonical byte representation of this id.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Produces a stable, domain‑separated node identifier (prefix `b"node:"`) using BLAKE3.
pub fn make_node_id(label: &str) -> NodeId {
    let mut hasher = Hasher::new();
    hasher.update(b"node:");
    hasher.update(label.as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest[..16]);
    NodeId::from_bytes(bytes)
}

/// Qualified name of a node, child, property or node type (e.g. `acme:geniusType`).
///
/// Names are compared as plain strings; namespace resolution happens before a
/// name reaches this layer. Cloning is cheap (shared buffer).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Name(Arc<str>);

impl Name {
    /// Creates a name from any string-like value.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Where a node was loaded from: its identifier plus the path it had at load time.
///
/// The path is informational; it goes stale as soon as an ancestor is moved or
/// renumbered, which is why reads key on [`Location::id`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    id: NodeId,
    path: Option<Arc<str>>,
}

impl Location {
    /// A location known only by identifier.
    #[must_use]
    pub const fn new(id: NodeId) -> Self {
        Self { id, path: None }
    }

    /// A location with both a path and an identifier.
    pub fn at(path: impl Into<Arc<str>>, id: NodeId) -> Self {
        Self {
            id,
            path: Some(path.into()),
        }
    }

    /// Identifier of the located node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Path the node had when it was loaded, if known.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}
