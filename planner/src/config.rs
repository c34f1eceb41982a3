use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use toolbox_rs::entities::{CatalogConfig, Toolbox};
use toolbox_rs::util::PlacementConfig;

use crate::gesture::PointerMapping;
use crate::io::svg_export::SvgDrawOptions;

/// Configuration of a planning session
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct PlannerConfig {
    /// Initial dimensions of the toolbox
    pub toolbox: Toolbox,
    /// Tolerances of the validator and range of the nearby-slot search
    pub placement: PlacementConfig,
    /// Random generation of the item palette
    pub catalog: CatalogConfig,
    /// Seed for the PRNG. If undefined, the palette is generated in non-deterministic mode using entropy
    pub prng_seed: Option<u64>,
    /// Scale of the drawer view, pointer positions of drag gestures are expressed in pixels
    pub px_per_unit: f32,
    /// Dropped items snap to multiples of this increment
    pub snap_increment: f32,
    /// Optional SVG drawing options
    #[serde(default)]
    pub svg_draw_options: SvgDrawOptions,
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        self.toolbox.validate()?;
        self.placement.validate()?;
        self.catalog.validate()?;
        ensure!(
            self.px_per_unit > 0.0,
            "px_per_unit must be positive, got {}",
            self.px_per_unit
        );
        ensure!(
            self.snap_increment > 0.0,
            "snap increment must be positive, got {}",
            self.snap_increment
        );
        Ok(())
    }

    pub fn pointer_mapping(&self) -> PointerMapping {
        PointerMapping {
            px_per_unit: self.px_per_unit,
            snap_increment: self.snap_increment,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            toolbox: Toolbox::default(),
            placement: PlacementConfig::default(),
            catalog: CatalogConfig::default(),
            prng_seed: Some(0),
            px_per_unit: 20.0,
            snap_increment: 0.25,
            svg_draw_options: SvgDrawOptions::default(),
        }
    }
}
