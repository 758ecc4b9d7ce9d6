//! physexport CLI
//!
//! Command-line interface for exporting scene descriptions to physics documents.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use physexport_core::QuaternionOrder;
use physexport_export::issues::Tee;
use physexport_export::logging::{self, TracingConfig};
use physexport_export::{
    ExportIssue, ExportOptions, JsonWriteOptions, LinearDampingSource, PhysicsExporter,
    StaticPolicy, TracingSink,
};
use physexport_scene::Scene;

/// physexport - rigid body, constraint and bone attachment exporter
#[derive(Parser)]
#[command(name = "physexport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene description to a physics document
    Export(ExportArgs),

    /// Show the physics content of a scene description
    Inspect(InspectArgs),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    Legacy,
    Extended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StaticPolicyArg {
    Passive,
    PassiveOrDisabled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum QuaternionOrderArg {
    Wxyz,
    Xyzw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DampingSourceArg {
    Margin,
    Damping,
}

#[derive(Args)]
struct ExportArgs {
    /// Scene description to read
    #[arg(short, long)]
    scene: PathBuf,

    /// Physics document to write
    #[arg(short, long)]
    output: PathBuf,

    /// Record layout
    #[arg(long, value_enum, default_value = "extended")]
    layout: LayoutArg,

    /// Which bodies are marked static (defaults to the layout's policy)
    #[arg(long, value_enum)]
    static_policy: Option<StaticPolicyArg>,

    /// Quaternion component order
    #[arg(long, value_enum, default_value = "wxyz")]
    quaternion_order: QuaternionOrderArg,

    /// Body field exported as linear_damping
    #[arg(long, value_enum, default_value = "margin")]
    damping_source: DampingSourceArg,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Build records on all cores
    #[arg(long)]
    parallel: bool,

    /// Fail when any authoring issue was reported
    #[arg(long)]
    strict: bool,
}

#[derive(Args)]
struct InspectArgs {
    /// Scene description to read
    #[arg(short, long)]
    scene: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl ExportArgs {
    fn export_options(&self) -> ExportOptions {
        let mut options = match self.layout {
            LayoutArg::Legacy => ExportOptions::legacy(),
            LayoutArg::Extended => ExportOptions::extended(),
        };

        if let Some(policy) = self.static_policy {
            options.static_policy = match policy {
                StaticPolicyArg::Passive => StaticPolicy::PassiveOnly,
                StaticPolicyArg::PassiveOrDisabled => StaticPolicy::PassiveOrDisabled,
            };
        }
        options.quaternion_order = match self.quaternion_order {
            QuaternionOrderArg::Wxyz => QuaternionOrder::Wxyz,
            QuaternionOrderArg::Xyzw => QuaternionOrder::Xyzw,
        };
        options.linear_damping_source = match self.damping_source {
            DampingSourceArg::Margin => LinearDampingSource::CollisionMargin,
            DampingSourceArg::Damping => LinearDampingSource::LinearDamping,
        };
        options.parallel = self.parallel;
        options
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_with_config(TracingConfig::for_verbosity(cli.verbose));

    match cli.command {
        Commands::Export(args) => cmd_export(args),
        Commands::Inspect(args) => cmd_inspect(args),
    }
}

fn cmd_export(args: ExportArgs) -> Result<()> {
    info!("Loading scene: {:?}", args.scene);
    let scene = Scene::load(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;

    let exporter = PhysicsExporter::new(
        args.export_options(),
        JsonWriteOptions {
            pretty: !args.compact,
        },
    );

    let mut collected: Vec<ExportIssue> = Vec::new();
    let mut logged = TracingSink::new();
    let mut sink = Tee {
        first: &mut collected,
        second: &mut logged,
    };
    let summary = exporter
        .export_to_path(&scene, &args.output, &mut sink)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "Exported {} rigid bodies, {} constraints, {} bone constraints to {}",
        summary.rigid_bodies,
        summary.constraints,
        summary.bone_constraints,
        args.output.display()
    );

    if !collected.is_empty() {
        warn!("{} authoring issue(s) reported", collected.len());
        if args.strict {
            bail!("{} authoring issue(s) reported", collected.len());
        }
    }

    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> Result<()> {
    let scene = Scene::load(&args.scene)
        .with_context(|| format!("Failed to load scene {}", args.scene.display()))?;
    let summary = scene.summary();

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            println!("Scene: {:?}", args.scene);
            println!("  Nodes:              {}", summary.node_count);
            println!("  Rigid bodies:       {}", summary.rigid_body_count);
            println!("  Constraints:        {}", summary.constraint_count);
            println!("  Armatures:          {}", summary.armature_count);
            println!("  Bone constraints:   {}", summary.bone_constraint_count);

            if !summary.constraints_by_kind.is_empty() {
                println!("\nConstraint kinds:");
                for (kind, count) in &summary.constraints_by_kind {
                    println!("  {:<16} {}", kind, count);
                }
            }
        }
    }

    Ok(())
}
