//! hydronet command line interface
//!
//! Loads a flow network model and builds it against the plan engine.
//!
//! # Usage
//!
//! ```bash
//! hydronet check models/simple.json
//! hydronet plan models/reservoir.yaml
//! hydronet run models/simple.json --solver highs --output-h5 results.h5
//! ```

use clap::{ArgAction, Parser, Subcommand};
use hydronet_core::collection::Entity;
use hydronet_core::model::{run_model, GraphBuilder, ModelDefinition};
use hydronet_core::outputs::{FileOutput, Output};
use hydronet_core::{HydronetError, HydronetResult, LoadOptions, PlanEngine, Settings, Strictness};
use log::{debug, LevelFilter};
use std::path::{Path, PathBuf};

/// Name of the output added by `--output-h5`
const OVERRIDE_OUTPUT: &str = "cli-output";

/// Flow network model compiler
#[derive(Parser, Debug)]
#[command(name = "hydronet", version)]
#[command(about = "Load, check and build flow network models")]
struct Args {
    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ignore unknown keys in the model instead of failing
    #[arg(long, global = true)]
    permissive: bool,

    /// More logging; repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a model and run it
    Run {
        /// Model file (.json, .yaml or .yml)
        model: PathBuf,

        /// Solver to run with; defaults to the configured solver
        #[arg(long)]
        solver: Option<String>,

        /// Also write all recorders to this HDF5 file
        #[arg(long)]
        output_h5: Option<PathBuf>,
    },
    /// Load and validate a model without building it
    Check {
        /// Model file (.json, .yaml or .yml)
        model: PathBuf,
    },
    /// Print the engine calls a build would make
    Plan {
        /// Model file (.json, .yaml or .yml)
        model: PathBuf,

        /// Also write all recorders to this HDF5 file
        #[arg(long)]
        output_h5: Option<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_settings(args: &Args) -> HydronetResult<Settings> {
    let mut settings = match &args.config {
        Some(path) => {
            debug!("Reading settings from {}", path.display());
            Settings::from_path(path)?
        }
        None => Settings::default(),
    };
    if args.permissive {
        settings.strictness = Strictness::Permissive;
    }
    Ok(settings)
}

fn load_model(
    path: &Path,
    options: &LoadOptions,
    output_h5: Option<PathBuf>,
) -> HydronetResult<ModelDefinition> {
    let mut definition = ModelDefinition::from_path(path, options)?;
    if let Some(filename) = output_h5 {
        // Relative to the working directory, not the model file
        let filename = if filename.is_relative() {
            let cwd = std::env::current_dir().map_err(|source| HydronetError::Io {
                path: filename.clone(),
                source,
            })?;
            cwd.join(filename)
        } else {
            filename
        };
        definition.add_output(Output::Hdf5(FileOutput::new(OVERRIDE_OUTPUT, filename)))?;
    }
    Ok(definition)
}

fn execute(args: Args) -> HydronetResult<()> {
    let settings = load_settings(&args)?;
    let options = settings.load_options();

    match args.command {
        Command::Run {
            model,
            solver,
            output_h5,
        } => {
            let definition = load_model(&model, &options, output_h5)?;
            let solver = solver.unwrap_or_else(|| settings.default_solver.clone());
            let mut engine = PlanEngine::with_solvers(settings.solvers.clone());
            let report = run_model(&definition, &mut engine, &solver)?;
            println!(
                "Ran {} ({} node(s), {} parameter(s) in {} round(s)) over {} timestep(s) with {solver}",
                model.display(),
                report.nodes,
                report.parameters(),
                report.resolution.rounds,
                definition.timestepper.num_timesteps()
            );
        }
        Command::Check { model } => {
            let definition = load_model(&model, &options, None)?;
            println!("{} is valid", model.display());
            println!("  timesteps:  {}", definition.timestepper.num_timesteps());
            println!("  nodes:      {}", definition.nodes.len());
            println!("  edges:      {}", definition.edges.len());
            println!("  parameters: {}", definition.parameters.len());
            println!("  recorders:  {}", definition.recorders.len());
            println!("  tables:     {}", definition.tables.len());
            println!("  outputs:    {}", definition.outputs.len());
            for parameter in &definition.parameters {
                debug!("Parameter {} ({})", parameter.name(), parameter.type_name());
            }
        }
        Command::Plan { model, output_h5 } => {
            let definition = load_model(&model, &options, output_h5)?;
            let mut engine = PlanEngine::with_solvers(settings.solvers.clone());
            GraphBuilder::new(&definition).build(&mut engine)?;
            for call in engine.calls() {
                println!("{call}");
            }
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = execute(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
