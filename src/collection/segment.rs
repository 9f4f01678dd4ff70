use crate::error::CollectionTypeError;
use std::fmt;
use std::str::FromStr;

/// A single level of collection nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionSegment {
    List,
    Paired,
}

impl CollectionSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionSegment::List => "list",
            CollectionSegment::Paired => "paired",
        }
    }
}

impl fmt::Display for CollectionSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionSegment {
    type Err = CollectionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(CollectionSegment::List),
            "paired" => Ok(CollectionSegment::Paired),
            "" => Err(CollectionTypeError::Empty),
            other => Err(CollectionTypeError::UnknownSegment {
                segment: other.to_string(),
                collection_type: other.to_string(),
            }),
        }
    }
}
