use itertools::Itertools;
use log::error;

use crate::entities::{Catalog, Container, InstanceId, Session};
use crate::geometry::geo_traits::{BufferedCollidesWith, ContainsWithin};
use crate::util::PlacementConfig;
//Various checks to verify correctness of the state of the system
//Used in debug_assertion!() blocks

pub fn instance_ids_unique(container: &Container) -> bool {
    container
        .placements()
        .iter()
        .map(|p| p.instance_id)
        .all_unique()
}

/// Checks whether a single placement respects the bounds of its container and the spacing to all others.
pub fn placement_is_valid(
    container: &Container,
    catalog: &Catalog,
    instance_id: InstanceId,
    config: &PlacementConfig,
) -> bool {
    let Some(placement) = container.placement(instance_id) else {
        error!("placement {instance_id} not found in {}", container.name);
        return false;
    };
    let Some(item) = catalog.item(placement.item_id) else {
        error!("item {} not found in catalog", placement.item_id);
        return false;
    };
    let rect = item.rect_at(placement.position);
    crate::placement::validate(container, catalog, &rect, Some(instance_id), config)
}

/// Checks every pair of placements for overlap, and every placement for bounds.
pub fn container_is_feasible(
    container: &Container,
    catalog: &Catalog,
    config: &PlacementConfig,
) -> bool {
    let rects = container
        .placements()
        .iter()
        .filter_map(|p| Some((p.instance_id, catalog.item(p.item_id)?.rect_at(p.position))))
        .collect_vec();

    if rects.len() != container.placements().len() {
        error!("{} contains placements of unknown items", container.name);
        return false;
    }

    for (id, rect) in rects.iter() {
        if !container.bbox().contains_within(rect, config.bounds_margin) {
            error!("placement {id} out of bounds in {}", container.name);
            return false;
        }
    }

    for ((id_a, a), (id_b, b)) in rects.iter().tuple_combinations() {
        if a.collides_with_buffer(b, config.spacing_buffer) {
            error!("placements {id_a} and {id_b} overlap in {}", container.name);
            return false;
        }
    }
    true
}

/// Checks whether the containers are stacked on top of each other without gaps, in order.
pub fn containers_stacked(session: &Session) -> bool {
    let mut expected_offset = 0.0;
    for (_, container) in session.containers() {
        if container.offset() != expected_offset {
            error!(
                "{} has offset {}, expected {expected_offset}",
                container.name,
                container.offset()
            );
            return false;
        }
        expected_offset += container.height();
    }
    true
}
