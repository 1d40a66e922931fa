// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Path segments: a child name plus its same-name-sibling (SNS) index.
use std::fmt;
use std::num::NonZeroUsize;

use thiserror::Error;

use crate::ident::Name;

/// Error returned by [`Segment::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    /// The name part of the segment is empty.
    #[error("segment name is empty")]
    EmptyName,
    /// An opening `[` without a matching trailing `]` (or vice versa).
    #[error("malformed segment `{0}`: unbalanced brackets")]
    Malformed(String),
    /// The index part is not a positive integer.
    #[error("invalid same-name-sibling index `{0}`")]
    InvalidIndex(String),
}

/// One step of a path: `name[index]`, where `index` is the 1-based position of
/// the child among its siblings that share `name`.
///
/// The index is a [`NonZeroUsize`], so `index >= 1` holds by construction.
/// Constructing a segment is the only way this layer produces positional
/// state; [`crate::ChildReference::with_segment`] uses it when renumbering.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    name: Name,
    index: NonZeroUsize,
}

impl Segment {
    /// Creates a segment with an explicit SNS index.
    #[must_use]
    pub const fn new(name: Name, index: NonZeroUsize) -> Self {
        Self { name, index }
    }

    /// Creates the first segment for `name` (`name[1]`).
    #[must_use]
    pub const fn first(name: Name) -> Self {
        Self::new(name, NonZeroUsize::MIN)
    }

    /// Creates the segment for the sibling that follows `count` existing
    /// same-named siblings (`name[count + 1]`).
    #[must_use]
    pub const fn after(name: Name, count: usize) -> Self {
        Self::new(name, NonZeroUsize::MIN.saturating_add(count))
    }

    /// Parses `name` or `name[index]`.
    pub fn parse(text: &str) -> Result<Self, SegmentError> {
        let (name, index) = match text.find('[') {
            None => {
                if text.ends_with(']') {
                    return Err(SegmentError::Malformed(text.to_owned()));
                }
                (text, NonZeroUsize::MIN)
            }
            Some(open) => {
                let Some(digits) = text[open + 1..].strip_suffix(']') else {
                    return Err(SegmentError::Malformed(text.to_owned()));
                };
                let index = digits
                    .parse::<NonZeroUsize>()
                    .map_err(|_| SegmentError::InvalidIndex(digits.to_owned()))?;
                (&text[..open], index)
            }
        };
        if name.is_empty() {
            return Err(SegmentError::EmptyName);
        }
        Ok(Self::new(Name::from(name), index))
    }

    /// The child name.
    #[must_use]
    pub const fn name(&self) -> &Name {
        &self.name
    }

    /// The 1-based SNS index.
    #[must_use]
    pub const fn index(&self) -> NonZeroUsize {
        self.index
    }

    /// Zero-based position among same-named siblings (`index - 1`).
    #[must_use]
    pub const fn position(&self) -> usize {
        self.index.get() - 1
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.index)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn parse_bare_name_defaults_to_first_index() {
        let seg = Segment::parse("acme:child").unwrap();
        assert_eq!(seg.name().as_str(), "acme:child");
        assert_eq!(seg.index().get(), 1);
    }

    #[test]
    fn parse_and_display_agree() {
        let seg = Segment::parse("childA[3]").unwrap();
        assert_eq!(seg.index().get(), 3);
        assert_eq!(seg.position(), 2);
        assert_eq!(seg.to_string(), "childA[3]");
    }

    #[test]
    fn parse_rejects_zero_and_garbage() {
        assert_eq!(
            Segment::parse("a[0]"),
            Err(SegmentError::InvalidIndex("0".into()))
        );
        assert_eq!(
            Segment::parse("a[x]"),
            Err(SegmentError::InvalidIndex("x".into()))
        );
        assert_eq!(
            Segment::parse("a[2"),
            Err(SegmentError::Malformed("a[2".into()))
        );
        assert_eq!(Segment::parse("[2]"), Err(SegmentError::EmptyName));
        assert_eq!(Segment::parse(""), Err(SegmentError::EmptyName));
    }

    #[test]
    fn after_counts_existing_siblings() {
        assert_eq!(Segment::after(Name::from("a"), 0), Segment::first("a".into()));
        assert_eq!(Segment::after(Name::from("a"), 4).index().get(), 5);
    }
}
