use log::{trace, warn};

use crate::entities::{Catalog, Container, InstanceId};
use crate::error::Rejection;
use crate::geometry::geo_traits::{BufferedCollidesWith, ContainsWithin};
use crate::geometry::primitives::Rect;
use crate::util::PlacementConfig;

/// Checks whether `rect` can occupy its position in `container`.
///
/// The rectangle has to lie within the container's bounds (up to `bounds_margin`)
/// and keep at least `spacing_buffer` distance from every placement, except the one identified by `exclude`.
/// Reports the first reason for rejection.
pub fn check(
    container: &Container,
    catalog: &Catalog,
    rect: &Rect,
    exclude: Option<InstanceId>,
    config: &PlacementConfig,
) -> Result<(), Rejection> {
    if !container
        .bbox()
        .contains_within(rect, config.bounds_margin)
    {
        trace!(
            "[VAL] {rect:?} out of bounds of {} ({} x {})",
            container.name,
            container.width(),
            container.height()
        );
        return Err(Rejection::OutOfBounds);
    }

    for placement in container
        .placements()
        .iter()
        .filter(|p| Some(p.instance_id) != exclude)
    {
        let Some(item) = catalog.item(placement.item_id) else {
            warn!(
                "[VAL] item {} of placement {} not found in catalog, ignoring it",
                placement.item_id, placement.instance_id
            );
            continue;
        };
        let placed = item.rect_at(placement.position);
        if rect.collides_with_buffer(&placed, config.spacing_buffer) {
            trace!(
                "[VAL] {rect:?} overlaps with {} {} at {}",
                item.name, placement.instance_id, placement.position
            );
            return Err(Rejection::Overlap(placement.instance_id));
        }
    }

    Ok(())
}

/// True if `rect` can occupy its position in `container`. See [`check`] for the reason of a rejection.
#[inline]
pub fn validate(
    container: &Container,
    catalog: &Catalog,
    rect: &Rect,
    exclude: Option<InstanceId>,
    config: &PlacementConfig,
) -> bool {
    check(container, catalog, rect, exclude, config).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ContainerKind, ItemId, Placement};
    use crate::geometry::primitives::Point;
    use rand::prelude::SmallRng;
    use rand::{Rng, SeedableRng};
    use test_case::test_case;

    fn drawer(width: f32, height: f32) -> Container {
        Container::new(ContainerKind::Drawer, "Drawer 1", width, height)
    }

    fn place(container: &mut Container, item_id: ItemId, raw_id: u64, at: Point) -> InstanceId {
        let instance_id = InstanceId::new(raw_id);
        container.insert(Placement {
            item_id,
            instance_id,
            position: at,
        });
        instance_id
    }

    #[test]
    fn empty_container_accepts_anything_in_bounds() {
        let container = drawer(20.0, 12.0);
        let catalog = Catalog::new();
        let config = PlacementConfig::default();
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..1_000 {
            let w = rng.random_range(0.1..20.0);
            let h = rng.random_range(0.1..12.0);
            let x = rng.random_range(0.0..=(20.0 - w));
            let y = rng.random_range(0.0..=(12.0 - h));
            let rect = Rect::from_origin(x, y, w, h);
            assert!(validate(&container, &catalog, &rect, None, &config));
        }
    }

    #[test_case(19.99, 0.0, 2.0, 2.0, false; "exceeds width")]
    #[test_case(0.0, 10.5, 2.0, 2.0, false; "exceeds height")]
    #[test_case(-0.1, 0.0, 2.0, 2.0, false; "negative x")]
    #[test_case(-0.03, -0.03, 2.0, 2.0, true; "negative within margin")]
    #[test_case(18.0, 10.0, 2.0, 2.0, true; "flush with the corner")]
    fn bounds(x: f32, y: f32, w: f32, h: f32, expected: bool) {
        let container = drawer(20.0, 12.0);
        let rect = Rect::from_origin(x, y, w, h);
        let result = check(&container, &Catalog::new(), &rect, None, &PlacementConfig::default());
        match expected {
            true => assert_eq!(result, Ok(())),
            false => assert_eq!(result, Err(Rejection::OutOfBounds)),
        }
    }

    #[test]
    fn overlap_and_self_exclusion() {
        let mut catalog = Catalog::new();
        let square = catalog.add_item("Tape Measure", 2.0, 2.0).unwrap();
        let config = PlacementConfig::default();
        let mut container = drawer(20.0, 12.0);

        let first = place(&mut container, square, 1, Point(0.0, 0.0));
        let second = place(&mut container, square, 2, Point(1.0, 1.0));

        let candidate = Rect::from_origin(1.0, 1.0, 2.0, 2.0);
        assert_eq!(
            check(&container, &catalog, &candidate, None, &config),
            Err(Rejection::Overlap(first))
        );
        // the candidate still overlaps with the second placement
        assert_eq!(
            check(&container, &catalog, &candidate, Some(first), &config),
            Err(Rejection::Overlap(second))
        );
        // a rectangle overlapping only the first placement is accepted once it is excluded
        let near_first = Rect::from_origin(0.0, 0.0, 0.9, 0.9);
        assert!(!validate(&container, &catalog, &near_first, None, &config));
        assert!(validate(&container, &catalog, &near_first, Some(first), &config));
    }

    #[test]
    fn lone_placement_validates_against_itself_when_excluded() {
        let mut catalog = Catalog::new();
        let square = catalog.add_item("Tape Measure", 2.0, 2.0).unwrap();
        let config = PlacementConfig::default();
        let mut container = drawer(20.0, 12.0);
        let id = place(&mut container, square, 1, Point(0.0, 0.0));

        let same = Rect::from_origin(0.0, 0.0, 2.0, 2.0);
        assert!(!validate(&container, &catalog, &same, None, &config));
        assert!(validate(&container, &catalog, &same, Some(id), &config));
    }

    #[test_case(2.05, true; "exactly the spacing buffer apart")]
    #[test_case(2.02, false; "closer than the spacing buffer")]
    fn spacing_buffer(x: f32, expected: bool) {
        let mut catalog = Catalog::new();
        let square = catalog.add_item("Tape Measure", 2.0, 2.0).unwrap();
        let mut container = drawer(20.0, 12.0);
        place(&mut container, square, 1, Point(0.0, 0.0));

        let rect = Rect::from_origin(x, 0.0, 2.0, 2.0);
        assert_eq!(
            validate(&container, &catalog, &rect, None, &PlacementConfig::default()),
            expected
        );
    }

    #[test]
    fn unresolvable_placements_are_ignored() {
        let catalog = Catalog::new();
        let mut container = drawer(20.0, 12.0);
        place(&mut container, ItemId(99), 1, Point(0.0, 0.0));

        let rect = Rect::from_origin(0.0, 0.0, 1.0, 1.0);
        assert!(validate(&container, &catalog, &rect, None, &PlacementConfig::default()));
    }
}
