use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{info, warn};

use planner::config::PlannerConfig;
use planner::io;
use planner::io::cli::Cli;
use planner::io::svg_export::toolbox_to_svg;
use planner::scenario::{RunReport, Scenario, ScenarioRunner};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            PlannerConfig::default()
        }
        Some(config_file) => io::read_json(&config_file).context("incorrect config file format")?,
    };

    info!("Successfully parsed PlannerConfig: {config:?}");

    let scenario: Scenario = io::read_json(&args.scenario_file)?;
    let scenario_stem = args
        .scenario_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("scenario file has no valid name")?;

    if !args.output_folder.exists() {
        fs::create_dir_all(&args.output_folder).with_context(|| {
            format!("could not create output folder: {:?}", args.output_folder)
        })?;
    }

    let mut runner = ScenarioRunner::new(config)?;
    let steps = runner.run(&scenario);

    {
        let output = RunReport {
            scenario: &scenario,
            config,
            steps,
        };
        let report_path = args.output_folder.join(format!("run_{scenario_stem}.json"));
        io::write_json(&output, Path::new(&report_path))?;
    }

    {
        let svg_path = args.output_folder.join(format!("run_{scenario_stem}.svg"));
        let svg = toolbox_to_svg(&runner.session, config.svg_draw_options);
        io::write_svg(&svg, Path::new(&svg_path))?;
    }

    Ok(())
}
