use std::fmt::{Display, Formatter};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use toolbox_rs::entities::{InstanceId, ItemId, Placement, PlacementOutcome, Session};
use toolbox_rs::error::{PlacementError, Reference};
use toolbox_rs::geometry::primitives::Point;

/// Conversion of pointer positions (pixels, relative to the drawer view) to container coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerMapping {
    pub px_per_unit: f32,
    pub snap_increment: f32,
}

impl PointerMapping {
    pub fn to_units(&self, px: Point) -> Point {
        Point(px.0 / self.px_per_unit, px.1 / self.px_per_unit)
    }

    /// Rounds both coordinates to the nearest multiple of the snap increment
    pub fn snap(&self, p: Point) -> Point {
        let snap = |v: f32| (v / self.snap_increment).round() * self.snap_increment;
        Point(snap(p.0), snap(p.1))
    }
}

/// What is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// A definition from the palette, dropping it creates a new placement
    Palette(ItemId),
    /// An existing placement in the selected container
    Container(InstanceId),
}

/// Where a drag gesture ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropTarget {
    /// Over the view of the selected container, `pointer_px` relative to its top-left corner
    Drawer { pointer_px: Point },
    /// Anywhere else
    Outside,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    Placed(PlacementOutcome),
    Moved(PlacementOutcome),
    /// A placement was dragged out of its container and removed
    Discarded(Placement),
    /// A palette item was dropped outside the container, nothing changed
    Cancelled,
    /// Nothing changed
    Rejected(PlacementError),
}

impl Display for GestureOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GestureOutcome::Placed(o) | GestureOutcome::Moved(o) => {
                let verb = match self {
                    GestureOutcome::Placed(_) => "placed",
                    _ => "moved",
                };
                write!(f, "{verb} {} at {}", o.instance_id, o.position)?;
                if o.adjusted {
                    write!(f, " (adjusted)")?;
                }
                Ok(())
            }
            GestureOutcome::Discarded(p) => write!(f, "discarded {}", p.instance_id),
            GestureOutcome::Cancelled => write!(f, "cancelled"),
            GestureOutcome::Rejected(err) => write!(f, "rejected: {err}"),
        }
    }
}

/// A drag and drop interaction, split in the three phases of a pointer gesture.
///
/// Only [`DragGesture::end`] touches the session, the earlier phases merely track the pointer.
#[derive(Debug, Clone)]
pub struct DragGesture {
    source: DragSource,
    /// Position of the pointer relative to the top-left corner of the dragged item
    grab_offset_px: Point,
    pointer_px: Option<Point>,
    mapping: PointerMapping,
}

impl DragGesture {
    /// Starts dragging `source`.
    /// Fails if no container is selected, or if `source` does not resolve.
    pub fn begin(
        session: &Session,
        source: DragSource,
        grab_offset_px: Point,
        mapping: PointerMapping,
    ) -> Result<Self, PlacementError> {
        let (_, container) = session.selected_container()?;
        match source {
            DragSource::Palette(item_id) => {
                session
                    .catalog()
                    .item(item_id)
                    .ok_or(Reference::Item(item_id))?;
            }
            DragSource::Container(instance_id) => {
                container
                    .placement(instance_id)
                    .ok_or(Reference::Instance(instance_id))?;
            }
        }
        debug!("[DRAG] begin {source:?} in {}, grabbed at {grab_offset_px}", container.name);
        Ok(Self {
            source,
            grab_offset_px,
            pointer_px: None,
            mapping,
        })
    }

    pub fn update(&mut self, pointer_px: Point) {
        self.pointer_px = Some(pointer_px);
    }

    /// Last pointer position reported through [`DragGesture::update`]
    pub fn pointer_px(&self) -> Option<Point> {
        self.pointer_px
    }

    /// Container coordinates at which the dragged item would be requested, if dropped at `pointer_px`.
    ///
    /// The top-left corner of the item is snapped and then clamped into the container,
    /// items larger than the container are clamped to the origin.
    pub fn requested_position(
        &self,
        session: &Session,
        pointer_px: Point,
    ) -> Result<Point, PlacementError> {
        let (_, container) = session.selected_container()?;
        let item_id = match self.source {
            DragSource::Palette(item_id) => item_id,
            DragSource::Container(instance_id) => {
                container
                    .placement(instance_id)
                    .ok_or(Reference::Instance(instance_id))?
                    .item_id
            }
        };
        let item = session.catalog().item(item_id).ok_or(Reference::Item(item_id))?;

        let corner_px = pointer_px.translate(-self.grab_offset_px.0, -self.grab_offset_px.1);
        let snapped = self.mapping.snap(self.mapping.to_units(corner_px));
        let clamp = |v: f32, limit: f32| v.min(limit).max(0.0);
        Ok(Point(
            clamp(snapped.0, container.width() - item.width),
            clamp(snapped.1, container.height() - item.height),
        ))
    }

    /// Finishes the gesture and commits its effect to the session, if any.
    pub fn end(self, session: &mut Session, drop: DropTarget) -> GestureOutcome {
        let outcome = match (drop, self.source) {
            (DropTarget::Drawer { pointer_px }, source) => {
                match self.requested_position(session, pointer_px) {
                    Err(err) => GestureOutcome::Rejected(err),
                    Ok(requested) => match source {
                        DragSource::Palette(item_id) => session
                            .place_item(item_id, requested)
                            .map_or_else(GestureOutcome::Rejected, GestureOutcome::Placed),
                        DragSource::Container(instance_id) => session
                            .relocate_item(instance_id, requested)
                            .map_or_else(GestureOutcome::Rejected, GestureOutcome::Moved),
                    },
                }
            }
            (DropTarget::Outside, DragSource::Palette(_)) => GestureOutcome::Cancelled,
            (DropTarget::Outside, DragSource::Container(instance_id)) => session
                .discard_item(instance_id)
                .map_or_else(GestureOutcome::Rejected, GestureOutcome::Discarded),
        };
        info!("[DRAG] {:?}: {outcome}", self.source);
        outcome
    }
}
