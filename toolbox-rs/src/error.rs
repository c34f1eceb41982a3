use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::entities::{ContainerKey, InstanceId, ItemId};

/// Geometric reason why a rectangle cannot occupy a position in a container.
/// Expected and frequent: the caller can retry elsewhere or fall back to the nearby-slot search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("rectangle exceeds the container bounds")]
    OutOfBounds,
    #[error("rectangle is too close to placement {0}")]
    Overlap(InstanceId),
}

/// Identifier which could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Container(ContainerKey),
    Item(ItemId),
    Instance(InstanceId),
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Reference::Container(key) => write!(f, "container {key:?}"),
            Reference::Item(id) => write!(f, "item {id}"),
            Reference::Instance(id) => write!(f, "placement {id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("placement rejected: {0}")]
    Rejected(#[from] Rejection),
    #[error("no container selected")]
    NoContainerSelected,
    #[error("unknown {0}")]
    UnknownReference(Reference),
}

impl PlacementError {
    /// Geometric rejections are part of normal operation.
    /// The other variants indicate that the caller holds stale or invalid identifiers.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PlacementError::Rejected(_))
    }
}

impl From<Reference> for PlacementError {
    fn from(reference: Reference) -> Self {
        PlacementError::UnknownReference(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_rejections_are_recoverable() {
        assert!(PlacementError::Rejected(Rejection::OutOfBounds).is_recoverable());
        assert!(!PlacementError::NoContainerSelected.is_recoverable());
        assert!(!PlacementError::UnknownReference(Reference::Item(ItemId(3))).is_recoverable());
    }

    #[test]
    fn messages_name_the_reference() {
        let err = PlacementError::from(Reference::Item(ItemId(7)));
        assert_eq!(err.to_string(), "unknown item 7");
    }
}
