use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::entities::{Catalog, InstanceId, Placement};
use crate::geometry::primitives::{Point, Rect};
use crate::util::assertions;

new_key_type! {
    /// Unique key for each [`Container`] in a [`Session`](crate::entities::Session)
    pub struct ContainerKey;
}

/// The two kinds of compartments a toolbox can be divided into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Drawer,
    Shelf,
}

impl ContainerKind {
    /// Fixed height of a freshly created container of this kind
    pub fn default_height(&self) -> f32 {
        match self {
            ContainerKind::Drawer => 2.0,
            ContainerKind::Shelf => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContainerKind::Drawer => "Drawer",
            ContainerKind::Shelf => "Shelf",
        }
    }
}

/// A horizontal strip of the toolbox in which items can be placed.
///
/// The container owns its placements in insertion order.
/// Mutations performed here never check geometry: deciding whether a position is acceptable
/// is the job of [`placement`](crate::placement), this type only does the bookkeeping.
#[derive(Clone, Debug)]
pub struct Container {
    pub kind: ContainerKind,
    pub name: String,
    width: f32,
    height: f32,
    /// Distance from the top of the toolbox to the top of this container
    offset: f32,
    placements: Vec<Placement>,
}

impl Container {
    pub(crate) fn new(
        kind: ContainerKind,
        name: impl Into<String>,
        width: f32,
        height: f32,
    ) -> Self {
        debug_assert!(width > 0.0 && height > 0.0, "degenerate container: {width} x {height}");
        Container {
            kind,
            name: name.into(),
            width,
            height,
            offset: 0.0,
            placements: vec![],
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// The region available for placements, in container-local coordinates
    pub fn bbox(&self) -> Rect {
        Rect::from_origin(0.0, 0.0, self.width, self.height)
    }

    /// All placements, in the order they were committed
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, instance_id: InstanceId) -> Option<&Placement> {
        self.placements
            .iter()
            .find(|p| p.instance_id == instance_id)
    }

    /// True if no items are placed
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// The sum of the areas of the items placed in the container.
    pub fn placed_item_area(&self, catalog: &Catalog) -> f32 {
        self.placements
            .iter()
            .filter_map(|p| catalog.item(p.item_id))
            .map(|item| item.area())
            .sum::<f32>()
    }

    /// Ratio of the area covered by items to the area of the container
    pub fn density(&self, catalog: &Catalog) -> f32 {
        self.placed_item_area(catalog) / self.bbox().area()
    }

    pub(crate) fn insert(&mut self, placement: Placement) {
        self.placements.push(placement);
        debug_assert!(assertions::instance_ids_unique(self));
    }

    /// Moves a placement, returns its previous position
    pub(crate) fn set_position(
        &mut self,
        instance_id: InstanceId,
        position: Point,
    ) -> Option<Point> {
        self.placements
            .iter_mut()
            .find(|p| p.instance_id == instance_id)
            .map(|p| std::mem::replace(&mut p.position, position))
    }

    pub(crate) fn remove(&mut self, instance_id: InstanceId) -> Option<Placement> {
        let index = self
            .placements
            .iter()
            .position(|p| p.instance_id == instance_id)?;
        Some(self.placements.remove(index))
    }

    pub(crate) fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub(crate) fn set_offset(&mut self, offset: f32) {
        self.offset = offset;
    }
}
