use log::debug;

use crate::entities::{Catalog, Container, InstanceId};
use crate::geometry::primitives::{Point, Rect};
use crate::placement::SquareRingIterator;
use crate::placement::validate;
use crate::util::PlacementConfig;

/// Searches the neighborhood of `rect`'s position for the closest position at which it can be placed in `container`.
///
/// Candidates lie on a grid with spacing `config.search.step`, visited in square rings of increasing radius
/// (up to `config.search.max_radius`), see [`SquareRingIterator`] for the order within a ring.
/// Each candidate is clamped into the container before being validated, the first valid one is returned.
/// Returns `None` if the neighborhood holds no valid position, which is expected for crowded containers.
pub fn find_nearby(
    container: &Container,
    catalog: &Catalog,
    rect: &Rect,
    exclude: Option<InstanceId>,
    config: &PlacementConfig,
) -> Option<Point> {
    let step = config.search.step;
    let requested = rect.origin();

    //largest coordinates at which the rect still fits
    let x_limit = container.width() - rect.width();
    let y_limit = container.height() - rect.height();
    let clamp = |v: f32, limit: f32| v.min(limit).max(0.0);

    for (n_evaluated, (i, j)) in SquareRingIterator::new(config.search.n_rings()).enumerate() {
        let candidate = Point(
            clamp(requested.0 + i as f32 * step, x_limit),
            clamp(requested.1 + j as f32 * step, y_limit),
        );
        if validate(container, catalog, &rect.with_origin(candidate), exclude, config) {
            debug!(
                "[SEARCH] found {candidate} for {requested} in {} (ring {}, {} evaluated)",
                container.name,
                i32::max(i.abs(), j.abs()),
                n_evaluated + 1
            );
            return Some(candidate);
        }
    }

    debug!(
        "[SEARCH] no valid position within {} of {requested} in {}",
        config.search.max_radius, container.name
    );
    None
}
