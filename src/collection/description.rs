use super::segment::CollectionSegment;
use crate::error::CollectionTypeError;
use itertools::Itertools;
use std::fmt;
use std::str::FromStr;

/// Describes the nesting shape of a collection, outermost segment first.
///
/// Besides concrete shapes such as `list` or `list:paired` there are two
/// sentinels: [`CollectionTypeDescription::Any`] stands for "some collection,
/// shape unknown" and [`CollectionTypeDescription::Null`] for "not a
/// collection at all". Equality is structural for concrete shapes and each
/// sentinel is only equal to itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CollectionTypeDescription {
    /// Not a collection. Rank 0.
    #[default]
    Null,
    /// Any collection; matches every collection but never maps over.
    Any,
    /// A concrete, non-empty segment sequence.
    Concrete(Vec<CollectionSegment>),
}

/// Shared "not a collection" description.
pub const NULL_COLLECTION_TYPE_DESCRIPTION: CollectionTypeDescription =
    CollectionTypeDescription::Null;

/// Shared "any collection" description.
pub const ANY_COLLECTION_TYPE_DESCRIPTION: CollectionTypeDescription =
    CollectionTypeDescription::Any;

impl CollectionTypeDescription {
    /// Parses a colon-joined collection type such as `"list:paired"`.
    pub fn new(collection_type: &str) -> Result<Self, CollectionTypeError> {
        collection_type.parse()
    }

    /// Builds a concrete description from its segments.
    pub fn from_segments(segments: Vec<CollectionSegment>) -> Result<Self, CollectionTypeError> {
        if segments.is_empty() {
            return Err(CollectionTypeError::Empty);
        }
        Ok(CollectionTypeDescription::Concrete(segments))
    }

    pub fn list() -> Self {
        CollectionTypeDescription::Concrete(vec![CollectionSegment::List])
    }

    pub fn paired() -> Self {
        CollectionTypeDescription::Concrete(vec![CollectionSegment::Paired])
    }

    /// `true` for `Any` and for every concrete shape.
    pub fn is_collection(&self) -> bool {
        !matches!(self, CollectionTypeDescription::Null)
    }

    /// Number of nesting levels; `None` for `Any` whose depth is unknown.
    pub fn rank(&self) -> Option<usize> {
        match self {
            CollectionTypeDescription::Null => Some(0),
            CollectionTypeDescription::Any => None,
            CollectionTypeDescription::Concrete(segments) => Some(segments.len()),
        }
    }

    /// Segments outermost first. Empty for both sentinels.
    pub fn segments(&self) -> &[CollectionSegment] {
        match self {
            CollectionTypeDescription::Concrete(segments) => segments,
            _ => &[],
        }
    }

    /// The innermost segment of a concrete shape.
    pub fn innermost(&self) -> Option<CollectionSegment> {
        self.segments().last().copied()
    }

    /// The colon-joined form for concrete shapes.
    pub fn collection_type(&self) -> Option<String> {
        match self {
            CollectionTypeDescription::Concrete(segments) => Some(segments.iter().join(":")),
            _ => None,
        }
    }

    /// `true` when both sides denote the same effective shape.
    ///
    /// `Any` matches every collection (including `Any`), `Null` matches only
    /// `Null`, and concrete shapes match when their segments are identical.
    pub fn can_match(&self, other: &CollectionTypeDescription) -> bool {
        use CollectionTypeDescription::*;
        match (self, other) {
            (Null, Null) => true,
            (Null, _) | (_, Null) => false,
            (Any, _) | (_, Any) => true,
            (Concrete(a), Concrete(b)) => a == b,
        }
    }

    /// `true` when `other` is a strict suffix of this shape.
    ///
    /// Mapping requires explicit shapes on both sides, so neither sentinel
    /// ever maps over or is mapped over.
    pub fn can_map_over(&self, other: &CollectionTypeDescription) -> bool {
        match (self, other) {
            (
                CollectionTypeDescription::Concrete(outer),
                CollectionTypeDescription::Concrete(inner),
            ) => outer.len() > inner.len() && outer.ends_with(inner),
            _ => false,
        }
    }

    /// Wraps `other` in this shape: `list.append(paired) == list:paired`.
    ///
    /// `Null` is the identity on either side; `Any` absorbs everything else.
    pub fn append(&self, other: &CollectionTypeDescription) -> CollectionTypeDescription {
        use CollectionTypeDescription::*;
        match (self, other) {
            (Null, _) => other.clone(),
            (_, Null) => self.clone(),
            (Any, _) | (_, Any) => Any,
            (Concrete(outer), Concrete(inner)) => {
                Concrete(outer.iter().chain(inner.iter()).copied().collect())
            }
        }
    }

    /// The leading segments left once `inner` is peeled off the end.
    ///
    /// Returns `Null` unless `self.can_map_over(inner)`.
    pub fn effective_map_over(&self, inner: &CollectionTypeDescription) -> CollectionTypeDescription {
        if !self.can_map_over(inner) {
            return CollectionTypeDescription::Null;
        }
        let outer = self.segments();
        let keep = outer.len() - inner.segments().len();
        CollectionTypeDescription::Concrete(outer[..keep].to_vec())
    }

    /// `true` when `prefix` equals this shape or wraps it from the outside.
    pub(crate) fn starts_with(&self, prefix: &CollectionTypeDescription) -> bool {
        match (self, prefix) {
            (_, CollectionTypeDescription::Null) => true,
            (CollectionTypeDescription::Any, CollectionTypeDescription::Any) => true,
            (CollectionTypeDescription::Concrete(this), CollectionTypeDescription::Concrete(p)) => {
                this.starts_with(p)
            }
            _ => false,
        }
    }
}

impl FromStr for CollectionTypeDescription {
    type Err = CollectionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CollectionTypeError::Empty);
        }
        let segments = s
            .split(':')
            .map(|part| {
                part.parse::<CollectionSegment>()
                    .map_err(|_| CollectionTypeError::UnknownSegment {
                        segment: part.to_string(),
                        collection_type: s.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_segments(segments)
    }
}

impl fmt::Display for CollectionTypeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionTypeDescription::Null => f.write_str("null"),
            CollectionTypeDescription::Any => f.write_str("any"),
            CollectionTypeDescription::Concrete(segments) => {
                write!(f, "{}", segments.iter().join(":"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctd(s: &str) -> CollectionTypeDescription {
        CollectionTypeDescription::new(s).unwrap()
    }

    #[test]
    fn parses_nested_types() {
        let desc = ctd("list:paired");
        assert_eq!(
            desc.segments(),
            &[CollectionSegment::List, CollectionSegment::Paired]
        );
        assert_eq!(desc.rank(), Some(2));
        assert_eq!(desc.collection_type().as_deref(), Some("list:paired"));
    }

    #[test]
    fn rejects_malformed_types() {
        assert_eq!(
            CollectionTypeDescription::new(""),
            Err(CollectionTypeError::Empty)
        );
        assert!(matches!(
            CollectionTypeDescription::new("list::paired"),
            Err(CollectionTypeError::UnknownSegment { .. })
        ));
        assert!(matches!(
            CollectionTypeDescription::new("list:tuple"),
            Err(CollectionTypeError::UnknownSegment { segment, .. }) if segment == "tuple"
        ));
    }

    #[test]
    fn sentinel_ranks() {
        assert_eq!(NULL_COLLECTION_TYPE_DESCRIPTION.rank(), Some(0));
        assert_eq!(ANY_COLLECTION_TYPE_DESCRIPTION.rank(), None);
    }

    #[test]
    fn append_with_sentinels() {
        let list = CollectionTypeDescription::list();
        assert_eq!(NULL_COLLECTION_TYPE_DESCRIPTION.append(&list), list);
        assert_eq!(list.append(&NULL_COLLECTION_TYPE_DESCRIPTION), list);
        assert_eq!(
            list.append(&ANY_COLLECTION_TYPE_DESCRIPTION),
            ANY_COLLECTION_TYPE_DESCRIPTION
        );
    }

    #[test]
    fn effective_map_over_peels_suffix() {
        assert_eq!(
            ctd("list:list:paired").effective_map_over(&ctd("paired")),
            ctd("list:list")
        );
        assert_eq!(
            ctd("list").effective_map_over(&ctd("list")),
            NULL_COLLECTION_TYPE_DESCRIPTION
        );
    }

    #[test]
    fn display_forms() {
        assert_eq!(ctd("list:paired").to_string(), "list:paired");
        assert_eq!(NULL_COLLECTION_TYPE_DESCRIPTION.to_string(), "null");
        assert_eq!(ANY_COLLECTION_TYPE_DESCRIPTION.to_string(), "any");
    }
}
