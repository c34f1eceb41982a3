//! Placement engine for toolbox layouts: containers (drawers and shelves) are filled with
//! rectangular tool items, subject to container bounds and a minimum spacing between items.

/// Containers, item definitions, placements and the session that ties them together
pub mod entities;

/// Error taxonomy of the placement engine
pub mod error;

/// Geometric primitives and overlap predicates
pub mod geometry;

/// Deciding where an item may go: validation and nearby-slot search
pub mod placement;

/// Helper functions which do not belong to any specific module
pub mod util;
