use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Upper bound on the number of square rings a search may visit
const MAX_SEARCH_RINGS: usize = 10_000;

///Configuration of the placement validator and the nearby-slot search
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct PlacementConfig {
    ///Distance an item may protrude beyond the container bounds, absorbs input and rounding noise
    pub bounds_margin: f32,
    ///Minimum spacing required between two placed items
    pub spacing_buffer: f32,
    ///Configuration of the nearby-slot search
    pub search: SearchConfig,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
    ///Largest offset (in both x and y) from the requested position that is considered
    pub max_radius: f32,
    ///Granularity of the search grid, also the increment between consecutive radii
    pub step: f32,
}

impl PlacementConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.bounds_margin >= 0.0,
            "bounds margin must be non-negative, got {}",
            self.bounds_margin
        );
        ensure!(
            self.spacing_buffer >= 0.0,
            "spacing buffer must be non-negative, got {}",
            self.spacing_buffer
        );
        self.search.validate()
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.step > 0.0 && self.step.is_finite(),
            "search step must be positive and finite, got {}",
            self.step
        );
        ensure!(
            self.max_radius >= 0.0 && self.max_radius.is_finite(),
            "search radius must be non-negative and finite, got {}",
            self.max_radius
        );
        ensure!(
            self.max_radius / self.step < MAX_SEARCH_RINGS as f32,
            "search radius {} with step {} exceeds {MAX_SEARCH_RINGS} rings",
            self.max_radius,
            self.step
        );
        Ok(())
    }

    /// Number of square rings around the requested position, including the degenerate ring at radius 0
    pub fn n_rings(&self) -> usize {
        // tolerate rounding noise in the division, 2.0 / 0.5 should yield exactly 5 rings
        ((self.max_radius / self.step + 1e-4).floor() as usize).saturating_add(1)
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            bounds_margin: 0.05,
            spacing_buffer: 0.05,
            search: SearchConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_radius: 2.0,
            step: 0.5,
        }
    }
}
