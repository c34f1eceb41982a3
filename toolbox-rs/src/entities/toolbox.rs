use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Outer dimensions of the toolbox. Every container spans the full width.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Toolbox {
    pub width: f32,
    pub height: f32,
    /// Not used for placement, items are laid out in the width x height plane of a container
    pub depth: f32,
}

impl Toolbox {
    pub fn new(width: f32, height: f32, depth: f32) -> Result<Self> {
        let toolbox = Toolbox {
            width,
            height,
            depth,
        };
        toolbox.validate()?;
        Ok(toolbox)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.width > 0.0 && self.height > 0.0 && self.depth > 0.0,
            "toolbox dimensions must be positive, got {} x {} x {}",
            self.width,
            self.height,
            self.depth
        );
        Ok(())
    }
}

impl Default for Toolbox {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 12.0,
            depth: 6.0,
        }
    }
}
