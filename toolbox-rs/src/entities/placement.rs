use std::fmt::Display;

use crate::entities::ItemId;
use crate::geometry::primitives::Point;

/// Unique handle of a [`Placement`], distinguishes multiple placements of the same item definition.
/// Issued exclusively by the [`Session`](crate::entities::Session).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    pub(crate) fn new(raw: u64) -> Self {
        InstanceId(raw)
    }
}

impl Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An instance of an item definition positioned within a container.
/// `position` is the top-left corner of the item's footprint, in container-local units.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub item_id: ItemId,
    pub instance_id: InstanceId,
    pub position: Point,
}
