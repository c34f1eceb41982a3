use anyhow::Context;
use log::{debug, warn};
use slotmap::SlotMap;

use crate::entities::{
    Catalog, Container, ContainerKey, ContainerKind, InstanceId, ItemDefinition, ItemId, Placement,
    Toolbox,
};
use crate::error::{PlacementError, Reference, Rejection};
use crate::geometry::geo_traits::ContainsWithin;
use crate::geometry::primitives::{Point, Rect};
use crate::placement;
use crate::util::{PlacementConfig, assertions};

/// A committed placement decision
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementOutcome {
    pub container: ContainerKey,
    pub instance_id: InstanceId,
    pub position: Point,
    /// True if the requested position was rejected and a nearby one was used instead
    pub adjusted: bool,
}

/// All state of one planning session: the toolbox, its containers (stacked top to bottom),
/// the active selection and the catalog of item definitions.
///
/// Two groups of operations are offered:
/// * registry operations ([`Session::commit_placement`], [`Session::move_placement`], [`Session::remove_placement`])
///   which only check whether the referenced entities exist, and perform no geometric validation.
/// * decisions ([`Session::place_item`], [`Session::relocate_item`]) which validate the requested position,
///   fall back to the nearby-slot search, and only then use the registry operations.
///   A rejected decision leaves the session untouched.
#[derive(Clone, Debug)]
pub struct Session {
    toolbox: Toolbox,
    config: PlacementConfig,
    catalog: Catalog,
    containers: SlotMap<ContainerKey, Container>,
    /// Keys of all containers, from the top of the toolbox to the bottom
    stack: Vec<ContainerKey>,
    selected: Option<ContainerKey>,
    /// Used to name containers, never reused
    next_ordinal: usize,
    next_instance_id: u64,
}

impl Session {
    pub fn new(toolbox: Toolbox, config: PlacementConfig) -> anyhow::Result<Self> {
        toolbox.validate()?;
        config.validate()?;
        Ok(Self {
            toolbox,
            config,
            catalog: Catalog::new(),
            containers: SlotMap::with_key(),
            stack: vec![],
            selected: None,
            next_ordinal: 1,
            next_instance_id: 1,
        })
    }

    pub fn toolbox(&self) -> &Toolbox {
        &self.toolbox
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// All containers, from the top of the toolbox to the bottom
    pub fn containers(&self) -> impl Iterator<Item = (ContainerKey, &Container)> {
        self.stack.iter().map(|&key| (key, &self.containers[key]))
    }

    pub fn container(&self, key: ContainerKey) -> Result<&Container, PlacementError> {
        self.containers
            .get(key)
            .ok_or(PlacementError::UnknownReference(Reference::Container(key)))
    }

    /// Sum of the heights of all containers
    pub fn stacked_height(&self) -> f32 {
        self.containers().map(|(_, c)| c.height()).sum()
    }

    /// Appends a new container at the bottom of the stack.
    /// It spans the full width of the toolbox and has the default height of its kind.
    pub fn add_container(&mut self, kind: ContainerKind) -> ContainerKey {
        let name = format!("{} {}", kind.label(), self.next_ordinal);
        self.next_ordinal += 1;

        let mut container = Container::new(kind, name, self.toolbox.width, kind.default_height());
        container.set_offset(self.stacked_height());

        if container.offset() + container.height() > self.toolbox.height {
            warn!(
                "[SES] {} extends beyond the bottom of the toolbox ({} > {})",
                container.name,
                container.offset() + container.height(),
                self.toolbox.height
            );
        }
        debug!("[SES] added {} at offset {}", container.name, container.offset());

        let key = self.containers.insert(container);
        self.stack.push(key);

        debug_assert!(assertions::containers_stacked(self));
        key
    }

    /// Removes a container together with all of its placements.
    /// Clears the selection if it pointed to this container, and closes the gap in the stack.
    pub fn remove_container(&mut self, key: ContainerKey) -> Result<Container, PlacementError> {
        let container = self
            .containers
            .remove(key)
            .ok_or(PlacementError::UnknownReference(Reference::Container(key)))?;
        self.stack.retain(|k| *k != key);
        if self.selected == Some(key) {
            self.selected = None;
        }
        self.restack();

        debug!(
            "[SES] removed {} and its {} placement(s)",
            container.name,
            container.placements().len()
        );
        debug_assert!(assertions::containers_stacked(self));
        Ok(container)
    }

    pub fn select_container(&mut self, key: ContainerKey) -> Result<(), PlacementError> {
        let container = self.container(key)?;
        debug!("[SES] selected {}", container.name);
        self.selected = Some(key);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<ContainerKey> {
        self.selected
    }

    pub fn selected_container(&self) -> Result<(ContainerKey, &Container), PlacementError> {
        let key = self.selected.ok_or(PlacementError::NoContainerSelected)?;
        Ok((key, self.container(key)?))
    }

    /// Changes the dimensions of the toolbox, all containers follow its width.
    ///
    /// Fails, without modifying anything, if any placement would no longer fit in its container.
    /// In that case, the error can be downcast to [`PlacementError`].
    pub fn resize_toolbox(&mut self, toolbox: Toolbox) -> anyhow::Result<()> {
        toolbox.validate()?;
        for (_, container) in self.containers() {
            let bounds = Rect::from_origin(0.0, 0.0, toolbox.width, container.height());
            for p in container.placements() {
                let Some(item) = self.catalog.item(p.item_id) else {
                    continue;
                };
                if !bounds.contains_within(&item.rect_at(p.position), self.config.bounds_margin) {
                    return Err(PlacementError::Rejected(Rejection::OutOfBounds)).with_context(|| {
                        format!(
                            "{} {} in {} would not fit in a toolbox of width {}",
                            item.name, p.instance_id, container.name, toolbox.width
                        )
                    });
                }
            }
        }

        self.toolbox = toolbox;
        for container in self.containers.values_mut() {
            container.set_width(toolbox.width);
        }
        debug!(
            "[SES] resized toolbox to {} x {} x {}",
            toolbox.width, toolbox.height, toolbox.depth
        );
        Ok(())
    }

    /// Appends a placement to a container, without any geometric validation.
    /// Returns the freshly issued instance id.
    pub fn commit_placement(
        &mut self,
        key: ContainerKey,
        item_id: ItemId,
        position: Point,
    ) -> Result<InstanceId, PlacementError> {
        if self.catalog.item(item_id).is_none() {
            return Err(PlacementError::UnknownReference(Reference::Item(item_id)));
        }
        let instance_id = InstanceId::new(self.next_instance_id);
        let container = self
            .containers
            .get_mut(key)
            .ok_or(PlacementError::UnknownReference(Reference::Container(key)))?;
        container.insert(Placement {
            item_id,
            instance_id,
            position,
        });
        self.next_instance_id += 1;

        debug!(
            "[SES] committed item {item_id} as {instance_id} at {position} in {}",
            container.name
        );
        Ok(instance_id)
    }

    /// Moves a placement within its container, without any geometric validation.
    /// Returns the previous position.
    pub fn move_placement(
        &mut self,
        key: ContainerKey,
        instance_id: InstanceId,
        position: Point,
    ) -> Result<Point, PlacementError> {
        let container = self
            .containers
            .get_mut(key)
            .ok_or(PlacementError::UnknownReference(Reference::Container(key)))?;
        let previous = container
            .set_position(instance_id, position)
            .ok_or(PlacementError::UnknownReference(Reference::Instance(instance_id)))?;

        debug!(
            "[SES] moved {instance_id} from {previous} to {position} in {}",
            container.name
        );
        Ok(previous)
    }

    pub fn remove_placement(
        &mut self,
        key: ContainerKey,
        instance_id: InstanceId,
    ) -> Result<Placement, PlacementError> {
        let container = self
            .containers
            .get_mut(key)
            .ok_or(PlacementError::UnknownReference(Reference::Container(key)))?;
        let placement = container
            .remove(instance_id)
            .ok_or(PlacementError::UnknownReference(Reference::Instance(instance_id)))?;

        debug!("[SES] removed {instance_id} from {}", container.name);
        Ok(placement)
    }

    /// Reports why `rect` cannot be placed in the container, see [`placement::check`].
    pub fn check_placement(
        &self,
        key: ContainerKey,
        rect: &Rect,
        exclude: Option<InstanceId>,
    ) -> Result<(), PlacementError> {
        let container = self.container_excluding(key, exclude)?;
        placement::check(container, &self.catalog, rect, exclude, &self.config)?;
        Ok(())
    }

    /// True if `rect` can be placed in the container, see [`placement::validate`].
    pub fn validate_placement(
        &self,
        key: ContainerKey,
        rect: &Rect,
        exclude: Option<InstanceId>,
    ) -> Result<bool, PlacementError> {
        let container = self.container_excluding(key, exclude)?;
        Ok(placement::validate(
            container,
            &self.catalog,
            rect,
            exclude,
            &self.config,
        ))
    }

    /// Closest valid position around `rect`'s position, see [`placement::find_nearby`].
    pub fn find_nearby_valid_position(
        &self,
        key: ContainerKey,
        rect: &Rect,
        exclude: Option<InstanceId>,
    ) -> Result<Option<Point>, PlacementError> {
        let container = self.container_excluding(key, exclude)?;
        Ok(placement::find_nearby(
            container,
            &self.catalog,
            rect,
            exclude,
            &self.config,
        ))
    }

    /// Places a new instance of an item in the selected container, at `requested` or nearby.
    pub fn place_item(
        &mut self,
        item_id: ItemId,
        requested: Point,
    ) -> Result<PlacementOutcome, PlacementError> {
        let key = self.selected.ok_or(PlacementError::NoContainerSelected)?;
        let item = self
            .catalog
            .item(item_id)
            .ok_or(PlacementError::UnknownReference(Reference::Item(item_id)))?;
        let (position, adjusted) = self.decide(key, item, requested, None)?;
        let instance_id = self.commit_placement(key, item_id, position)?;

        debug_assert!(assertions::placement_is_valid(
            &self.containers[key],
            &self.catalog,
            instance_id,
            &self.config
        ));
        Ok(PlacementOutcome {
            container: key,
            instance_id,
            position,
            adjusted,
        })
    }

    /// Moves an existing placement of the selected container to `requested` or nearby.
    /// If no valid position is found, the placement stays where it was.
    pub fn relocate_item(
        &mut self,
        instance_id: InstanceId,
        requested: Point,
    ) -> Result<PlacementOutcome, PlacementError> {
        let (key, container) = self.selected_container()?;
        let item_id = container
            .placement(instance_id)
            .ok_or(PlacementError::UnknownReference(Reference::Instance(instance_id)))?
            .item_id;
        let item = self
            .catalog
            .item(item_id)
            .ok_or(PlacementError::UnknownReference(Reference::Item(item_id)))?;
        let (position, adjusted) = self.decide(key, item, requested, Some(instance_id))?;
        self.move_placement(key, instance_id, position)?;

        debug_assert!(assertions::placement_is_valid(
            &self.containers[key],
            &self.catalog,
            instance_id,
            &self.config
        ));
        Ok(PlacementOutcome {
            container: key,
            instance_id,
            position,
            adjusted,
        })
    }

    /// Removes a placement from the selected container (an item dragged out of it).
    pub fn discard_item(&mut self, instance_id: InstanceId) -> Result<Placement, PlacementError> {
        let key = self.selected.ok_or(PlacementError::NoContainerSelected)?;
        self.remove_placement(key, instance_id)
    }

    /// Decides where `item` goes when requested at `requested`: there if valid, otherwise the nearest valid position.
    fn decide(
        &self,
        key: ContainerKey,
        item: &ItemDefinition,
        requested: Point,
        exclude: Option<InstanceId>,
    ) -> Result<(Point, bool), PlacementError> {
        let container = self.container(key)?;
        let rect = item.rect_at(requested);
        match placement::check(container, &self.catalog, &rect, exclude, &self.config) {
            Ok(()) => Ok((requested, false)),
            Err(rejection) => {
                debug!(
                    "[SES] {} at {requested} rejected in {} ({rejection}), searching nearby",
                    item.name, container.name
                );
                match placement::find_nearby(container, &self.catalog, &rect, exclude, &self.config)
                {
                    Some(position) => Ok((position, true)),
                    None => Err(rejection.into()),
                }
            }
        }
    }

    /// Resolves a container, and ensures the excluded instance (if any) is part of it
    fn container_excluding(
        &self,
        key: ContainerKey,
        exclude: Option<InstanceId>,
    ) -> Result<&Container, PlacementError> {
        let container = self.container(key)?;
        match exclude {
            Some(id) if container.placement(id).is_none() => {
                Err(PlacementError::UnknownReference(Reference::Instance(id)))
            }
            _ => Ok(container),
        }
    }

    fn restack(&mut self) {
        let mut offset = 0.0;
        for key in &self.stack {
            let container = &mut self.containers[*key];
            container.set_offset(offset);
            offset += container.height();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_drawer() -> (Session, ContainerKey, ItemId) {
        let mut session = Session::new(Toolbox::default(), PlacementConfig::default()).unwrap();
        let item = session.catalog_mut().add_item("Tape Measure", 2.0, 2.0).unwrap();
        let key = session.add_container(ContainerKind::Drawer);
        session.select_container(key).unwrap();
        (session, key, item)
    }

    #[test]
    fn containers_are_named_and_stacked() {
        let mut session = Session::new(Toolbox::default(), PlacementConfig::default()).unwrap();
        let d1 = session.add_container(ContainerKind::Drawer);
        let s2 = session.add_container(ContainerKind::Shelf);
        let d3 = session.add_container(ContainerKind::Drawer);

        assert_eq!(session.container(s2).unwrap().name, "Shelf 2");
        assert_eq!(session.container(d3).unwrap().offset(), 3.0);

        session.remove_container(d1).unwrap();
        assert_eq!(session.container(s2).unwrap().offset(), 0.0);
        assert_eq!(session.container(d3).unwrap().offset(), 1.0);

        // ordinals are never reused
        let s4 = session.add_container(ContainerKind::Shelf);
        assert_eq!(session.container(s4).unwrap().name, "Shelf 4");
        assert_eq!(session.stacked_height(), 4.0);
    }

    #[test]
    fn instance_ids_are_unique_across_containers() {
        let (mut session, key, item) = session_with_drawer();
        let other = session.add_container(ContainerKind::Shelf);
        let a = session.commit_placement(key, item, Point(0.0, 0.0)).unwrap();
        let b = session.commit_placement(other, item, Point(0.0, 0.0)).unwrap();
        let c = session.commit_placement(key, item, Point(5.0, 0.0)).unwrap();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn adjusted_placement_is_reported() {
        let (mut session, _, item) = session_with_drawer();
        let first = session.place_item(item, Point(0.0, 0.0)).unwrap();
        assert!(!first.adjusted);

        let second = session.place_item(item, Point(1.0, 0.0)).unwrap();
        assert!(second.adjusted);
        assert_eq!(second.position, Point(2.5, 0.0));
    }

    #[test]
    fn relocate_excludes_the_moved_placement() {
        let (mut session, _, item) = session_with_drawer();
        let placed = session.place_item(item, Point(0.0, 0.0)).unwrap();
        // overlaps with its own current footprint only
        let moved = session.relocate_item(placed.instance_id, Point(0.5, 0.0)).unwrap();
        assert!(!moved.adjusted);
        assert_eq!(moved.position, Point(0.5, 0.0));
    }

    #[test]
    fn unknown_exclusion_is_a_reference_error() {
        let (mut session, key, item) = session_with_drawer();
        let other = session.add_container(ContainerKind::Drawer);
        let elsewhere = session.commit_placement(other, item, Point(0.0, 0.0)).unwrap();

        let rect = Rect::from_origin(0.0, 0.0, 1.0, 1.0);
        assert_eq!(
            session.validate_placement(key, &rect, Some(elsewhere)),
            Err(PlacementError::UnknownReference(Reference::Instance(elsewhere)))
        );
    }

    #[test]
    fn resize_is_refused_when_placements_would_not_fit() {
        let (mut session, key, item) = session_with_drawer();
        session.place_item(item, Point(15.0, 0.0)).unwrap();

        let narrow = Toolbox::new(10.0, 12.0, 6.0).unwrap();
        let err = session.resize_toolbox(narrow).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PlacementError>(),
            Some(&PlacementError::Rejected(Rejection::OutOfBounds))
        );
        assert_eq!(session.toolbox().width, 20.0);

        let wide = Toolbox::new(30.0, 12.0, 6.0).unwrap();
        session.resize_toolbox(wide).unwrap();
        assert_eq!(session.container(key).unwrap().width(), 30.0);
    }

    #[test]
    fn new_containers_take_the_current_toolbox_width() {
        let mut session = Session::new(Toolbox::default(), PlacementConfig::default()).unwrap();
        session.resize_toolbox(Toolbox::new(0.5, 12.0, 6.0).unwrap()).unwrap();
        let shelf = session.add_container(ContainerKind::Shelf);
        let drawer = session.add_container(ContainerKind::Drawer);

        let shelf = session.container(shelf).unwrap();
        assert_eq!((shelf.width(), shelf.height()), (0.5, 1.0));
        let drawer = session.container(drawer).unwrap();
        assert_eq!((drawer.width(), drawer.height(), drawer.offset()), (0.5, 2.0, 1.0));
    }
}
