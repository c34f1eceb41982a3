use anyhow::{Context, Result, bail};
use itertools::Itertools;
use log::{info, warn};
use rand::prelude::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use toolbox_rs::entities::{ContainerKey, ContainerKind, Session, Toolbox};
use toolbox_rs::error::PlacementError;
use toolbox_rs::geometry::primitives::Point;

use crate::config::PlannerConfig;
use crate::gesture::{DragGesture, DragSource, DropTarget, GestureOutcome};

/// Sequence of user interactions, replayed against a fresh session
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<Step>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    AddContainer {
        kind: ContainerKind,
    },
    /// Containers are referenced by their position in the stack, from the top
    RemoveContainer {
        index: usize,
    },
    Select {
        index: usize,
    },
    Deselect,
    ResizeToolbox {
        toolbox: Toolbox,
    },
    RegeneratePalette,
    /// Registers a custom item definition and appends it to the palette
    AddItem {
        name: String,
        width: f32,
        height: f32,
    },
    Drag {
        source: SourceRef,
        /// Pointer position relative to the top-left corner of the dragged item, in pixels
        #[serde(default)]
        grab_offset: Point,
        /// Intermediate pointer positions, in pixels
        #[serde(default)]
        path: Vec<Point>,
        drop: DropRef,
    },
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SourceRef {
    /// The n-th item of the current palette
    Palette(usize),
    /// The n-th placement of the selected container
    Placement(usize),
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DropRef {
    /// Over the selected container, pixels relative to its top-left corner
    Drawer(Point),
    Outside,
}

/// Result of a single step
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StepReport {
    pub index: usize,
    pub step: Step,
    /// False if the step could not be executed, or if it was rejected
    pub success: bool,
    pub message: String,
}

/// Everything written to the report of a run.
/// The final layout itself is only rendered, see [`toolbox_to_svg`](crate::io::svg_export::toolbox_to_svg).
#[derive(Serialize, Debug)]
pub struct RunReport<'a> {
    pub scenario: &'a Scenario,
    pub config: PlannerConfig,
    pub steps: Vec<StepReport>,
}

/// Replays scenarios against a [`Session`], owning the randomness used for palette generation.
pub struct ScenarioRunner {
    pub session: Session,
    pub config: PlannerConfig,
    rng: SmallRng,
}

impl ScenarioRunner {
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.prng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let mut runner = Self {
            session: Session::new(config.toolbox, config.placement)?,
            config,
            rng,
        };
        runner.regenerate_palette()?;
        Ok(runner)
    }

    /// Executes all steps in order.
    /// A failing step is reported and does not abort the run.
    pub fn run(&mut self, scenario: &Scenario) -> Vec<StepReport> {
        info!(
            "[RUN] replaying {} ({} steps)",
            scenario.name.as_deref().unwrap_or("unnamed scenario"),
            scenario.steps.len()
        );
        let reports = scenario
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let (success, message) = match self.execute(step) {
                    Ok((success, message)) => (success, message),
                    Err(err) => {
                        warn!("[RUN] step {index} failed: {err:#}");
                        (false, format!("{err:#}"))
                    }
                };
                info!("[RUN] step {index}: {message}");
                StepReport {
                    index,
                    step: step.clone(),
                    success,
                    message,
                }
            })
            .collect_vec();

        info!(
            "[RUN] finished, {}/{} steps succeeded",
            reports.iter().filter(|r| r.success).count(),
            reports.len()
        );
        reports
    }

    /// Executes a single step, returns whether it had its intended effect and a description of what happened.
    pub fn execute(&mut self, step: &Step) -> Result<(bool, String)> {
        match step {
            Step::AddContainer { kind } => {
                let key = self.session.add_container(*kind);
                let container = self.session.container(key)?;
                Ok((true, format!("added {} at offset {}", container.name, container.offset())))
            }
            Step::RemoveContainer { index } => {
                let key = self.container_at(*index)?;
                let removed = self.session.remove_container(key)?;
                Ok((
                    true,
                    format!(
                        "removed {} with {} placement(s)",
                        removed.name,
                        removed.placements().len()
                    ),
                ))
            }
            Step::Select { index } => {
                let key = self.container_at(*index)?;
                self.session.select_container(key)?;
                Ok((true, format!("selected {}", self.session.container(key)?.name)))
            }
            Step::Deselect => {
                self.session.deselect();
                Ok((true, "deselected".to_string()))
            }
            Step::ResizeToolbox { toolbox } => match self.session.resize_toolbox(*toolbox) {
                Ok(()) => Ok((
                    true,
                    format!(
                        "resized toolbox to {} x {} x {}",
                        toolbox.width, toolbox.height, toolbox.depth
                    ),
                )),
                Err(err) if err.downcast_ref::<PlacementError>().is_some() => {
                    Ok((false, format!("resize refused: {err:#}")))
                }
                Err(err) => Err(err),
            },
            Step::RegeneratePalette => {
                self.regenerate_palette()?;
                let names = self.session.catalog().palette().map(|i| &i.name).join(", ");
                let n_items = self.session.catalog().items().len();
                Ok((true, format!("regenerated palette: {names} ({n_items} items in catalog)")))
            }
            Step::AddItem {
                name,
                width,
                height,
            } => {
                let id = self.session.catalog_mut().add_item(name.as_str(), *width, *height)?;
                let slot = self.session.catalog().palette_ids().len() - 1;
                Ok((true, format!("added item {id} ({name}) to palette slot {slot}")))
            }
            Step::Drag {
                source,
                grab_offset,
                path,
                drop,
            } => {
                let source = self.resolve_source(*source)?;
                let mut gesture = DragGesture::begin(
                    &self.session,
                    source,
                    *grab_offset,
                    self.config.pointer_mapping(),
                )?;
                for pointer_px in path {
                    gesture.update(*pointer_px);
                }
                let drop = match drop {
                    DropRef::Drawer(pointer_px) => DropTarget::Drawer {
                        pointer_px: *pointer_px,
                    },
                    DropRef::Outside => DropTarget::Outside,
                };
                let outcome = gesture.end(&mut self.session, drop);
                let success = !matches!(outcome, GestureOutcome::Rejected(_));
                Ok((success, outcome.to_string()))
            }
        }
    }

    fn regenerate_palette(&mut self) -> Result<()> {
        self.session
            .catalog_mut()
            .generate_palette(&self.config.catalog, &mut self.rng)?;
        Ok(())
    }

    fn container_at(&self, index: usize) -> Result<ContainerKey> {
        self.session
            .containers()
            .nth(index)
            .map(|(key, _)| key)
            .with_context(|| {
                format!(
                    "no container at index {index}, the toolbox holds {}",
                    self.session.containers().count()
                )
            })
    }

    fn resolve_source(&self, source: SourceRef) -> Result<DragSource> {
        match source {
            SourceRef::Palette(slot) => {
                let palette = self.session.catalog().palette_ids();
                match palette.get(slot) {
                    Some(item_id) => Ok(DragSource::Palette(*item_id)),
                    None => bail!(
                        "no item in palette slot {slot}, the palette holds {}",
                        palette.len()
                    ),
                }
            }
            SourceRef::Placement(index) => {
                let (_, container) = self.session.selected_container()?;
                let placement = container.placements().get(index).with_context(|| {
                    format!("no placement at index {index} in {}", container.name)
                })?;
                Ok(DragSource::Container(placement.instance_id))
            }
        }
    }
}
