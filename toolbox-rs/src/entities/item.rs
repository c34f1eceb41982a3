use std::fmt::Display;

use anyhow::{Result, ensure};

use crate::geometry::primitives::{Point, Rect};

/// Identifier of an [`ItemDefinition`] in the [`Catalog`](crate::entities::Catalog)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub usize);

impl Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog entry describing a tool: its display name and real-valued dimensions.
/// Immutable once created, [`Placement`](crate::entities::Placement)s refer to it by [`ItemId`].
#[derive(Clone, Debug, PartialEq)]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    pub width: f32,
    pub height: f32,
}

impl ItemDefinition {
    pub fn new(id: ItemId, name: impl Into<String>, width: f32, height: f32) -> Result<Self> {
        ensure!(
            width > 0.0 && height > 0.0,
            "item dimensions must be positive, got {width} x {height}"
        );
        Ok(ItemDefinition {
            id,
            name: name.into(),
            width,
            height,
        })
    }

    /// The footprint of the item when its top-left corner is placed at `position`
    #[inline(always)]
    pub fn rect_at(&self, position: Point) -> Rect {
        Rect::from_origin(position.0, position.1, self.width, self.height)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}
