use anyhow::{Result, ensure};
use itertools::Itertools;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entities::{ItemDefinition, ItemId};

/// Template from which item definitions are generated
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Archetype {
    pub name: &'static str,
    pub width: f32,
    pub height: f32,
}

pub static ARCHETYPES: [Archetype; 10] = [
    Archetype { name: "Screwdriver", width: 1.0, height: 6.0 },
    Archetype { name: "Hammer", width: 2.0, height: 10.0 },
    Archetype { name: "Pliers", width: 1.5, height: 7.0 },
    Archetype { name: "Wrench", width: 1.0, height: 8.0 },
    Archetype { name: "Drill Bit", width: 0.5, height: 4.0 },
    Archetype { name: "Tape Measure", width: 3.0, height: 3.0 },
    Archetype { name: "Level", width: 2.0, height: 12.0 },
    Archetype { name: "Chisel", width: 1.0, height: 7.0 },
    Archetype { name: "Saw", width: 4.0, height: 10.0 },
    Archetype { name: "Clamp", width: 2.0, height: 5.0 },
];

/// Configuration of the random palette generation
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct CatalogConfig {
    ///Number of items in a generated palette
    pub n_items: usize,
    ///Maximum relative deviation from the archetype's dimensions, applied independently to width and height
    pub jitter: f32,
    ///Lower bound on each generated dimension
    pub min_dimension: f32,
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..1.0).contains(&self.jitter),
            "jitter must lie in [0, 1), got {}",
            self.jitter
        );
        ensure!(
            self.min_dimension > 0.0,
            "minimum dimension must be positive, got {}",
            self.min_dimension
        );
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            n_items: 10,
            jitter: 0.25,
            min_dimension: 0.5,
        }
    }
}

/// Owns all item definitions.
///
/// The palette is the subset of definitions currently offered for dragging.
/// Regenerating the palette never drops definitions, so placements always resolve.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    items: Vec<ItemDefinition>,
    palette: Vec<ItemId>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.items.get(id.0)
    }

    pub fn items(&self) -> &[ItemDefinition] {
        &self.items
    }

    /// Definitions currently offered in the palette, in generation order
    pub fn palette(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.palette.iter().map(|id| &self.items[id.0])
    }

    pub fn palette_ids(&self) -> &[ItemId] {
        &self.palette
    }

    /// Registers a new definition and appends it to the palette
    pub fn add_item(&mut self, name: impl Into<String>, width: f32, height: f32) -> Result<ItemId> {
        let id = ItemId(self.items.len());
        let item = ItemDefinition::new(id, name, width, height)?;
        self.items.push(item);
        self.palette.push(id);
        Ok(id)
    }

    /// Replaces the palette with `config.n_items` freshly generated definitions.
    /// Each is based on a uniformly drawn [`Archetype`], with its dimensions jittered.
    pub fn generate_palette(
        &mut self,
        config: &CatalogConfig,
        rng: &mut impl Rng,
    ) -> Result<&[ItemId]> {
        config.validate()?;
        self.palette.clear();
        for _ in 0..config.n_items {
            let archetype = &ARCHETYPES[rng.random_range(0..ARCHETYPES.len())];
            let mut jittered = |dim: f32| {
                let variation = rng.random_range(-config.jitter..=config.jitter);
                f32::max(config.min_dimension, dim + dim * variation)
            };
            let width = jittered(archetype.width);
            let height = jittered(archetype.height);
            self.add_item(archetype.name, width, height)?;
        }
        debug!(
            "[CAT] generated palette: [{}]",
            self.palette()
                .map(|i| format!("{} {:.1}x{:.1}", i.name, i.width, i.height))
                .join(", ")
        );
        Ok(&self.palette)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::prelude::SmallRng;

    #[test]
    fn generated_dimensions_respect_jitter_and_floor() {
        let config = CatalogConfig::default();
        let mut catalog = Catalog::new();
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..20 {
            catalog.generate_palette(&config, &mut rng).unwrap();
        }
        assert_eq!(catalog.items().len(), 200);
        for item in catalog.items() {
            let archetype = ARCHETYPES.iter().find(|a| a.name == item.name).unwrap();
            let lower = |d: f32| f32::max(config.min_dimension, d * (1.0 - config.jitter));
            let upper = |d: f32| f32::max(config.min_dimension, d * (1.0 + config.jitter));
            assert!(item.width >= lower(archetype.width) - 1e-5);
            assert!(item.width <= upper(archetype.width) + 1e-5);
            assert!(item.height >= lower(archetype.height) - 1e-5);
            assert!(item.height <= upper(archetype.height) + 1e-5);
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let config = CatalogConfig::default();
        let generate = || {
            let mut catalog = Catalog::new();
            catalog
                .generate_palette(&config, &mut SmallRng::seed_from_u64(42))
                .unwrap();
            catalog.items().to_vec()
        };
        assert_eq!(generate(), generate());
    }

    #[test]
    fn regeneration_keeps_old_definitions() {
        let config = CatalogConfig {
            n_items: 3,
            ..CatalogConfig::default()
        };
        let mut catalog = Catalog::new();
        let mut rng = SmallRng::seed_from_u64(7);
        let first = catalog.generate_palette(&config, &mut rng).unwrap().to_vec();
        catalog.generate_palette(&config, &mut rng).unwrap();

        assert_eq!(catalog.palette_ids().len(), 3);
        assert!(first.iter().all(|id| !catalog.palette_ids().contains(id)));
        assert!(first.iter().all(|id| catalog.item(*id).is_some()));
    }

    #[test]
    fn zero_jitter_reproduces_archetypes() {
        let config = CatalogConfig {
            n_items: 5,
            jitter: 0.0,
            min_dimension: 0.5,
        };
        let mut catalog = Catalog::new();
        catalog
            .generate_palette(&config, &mut SmallRng::seed_from_u64(3))
            .unwrap();
        for item in catalog.palette() {
            let archetype = ARCHETYPES.iter().find(|a| a.name == item.name).unwrap();
            assert_eq!((item.width, item.height), (archetype.width, archetype.height));
        }
    }
}
