//! capsync CLI - capsule collider conversion
//!
//! Converts single capsules from the command line and batch-converts
//! scene documents between System A and System B.

use anyhow::{Context, Result};
use capsync_convert::{
    convert_a_to_b, convert_b_to_a, half_length_clamped, Axis, CapsuleParams, CapsuleParamsA,
    CapsuleParamsB, ConvertOptions, Converter, System, Tolerance, Vec3, MIN_HALF_LENGTH,
};
use capsync_host::{BatchConverter, BatchOptions, EntryStatus, HostAdapter, Placement};
use capsync_math::parse_vec3;
use capsync_scene::Scene;
use clap::{Parser, Subcommand, ValueEnum};
use log::warn;
use std::path::{Path, PathBuf};

mod config;

#[derive(Parser)]
#[command(name = "capsync")]
#[command(about = "Convert capsule colliders between System A and System B", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./capsync.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Reject negative or non-finite inputs
    #[arg(long, global = true)]
    validate: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a System A capsule to System B
    AToB {
        #[command(flatten)]
        capsule: CapsuleAArgs,
    },
    /// Convert a System B capsule to System A
    BToA {
        /// Size as x,y,z (cap radius, cap radius, total length)
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        size: Vec3,
        /// Capsule direction (X, Y, Z)
        #[arg(long, default_value = "Y")]
        direction: Axis,
        /// Center offset as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,0,0")]
        center: Vec3,
        /// Whether the center is the volume centroid
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        aligned_on_center: bool,
        /// Whether the axis is flipped
        #[arg(long)]
        reverse_direction: bool,
    },
    /// Convert a System A capsule to B and back, reporting any drift
    Roundtrip {
        #[command(flatten)]
        capsule: CapsuleAArgs,
    },
    /// Convert every capsule collider in a scene file
    Batch {
        /// Input scene JSON
        input: PathBuf,
        /// System to convert into
        #[arg(long, value_enum)]
        to: TargetArg,
        /// Output scene JSON (omit for a dry run)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Replace source colliders or keep them alongside
        #[arg(long, value_enum)]
        placement: Option<PlacementArg>,
    },
    /// List the capsule colliders in a scene file
    Info {
        /// Scene JSON
        file: PathBuf,
    },
}

#[derive(clap::Args)]
struct CapsuleAArgs {
    /// Start cap radius
    #[arg(long, allow_hyphen_values = true)]
    start_radius: f64,
    /// End cap radius
    #[arg(long, allow_hyphen_values = true)]
    end_radius: f64,
    /// Half-length of the cylindrical section, caps excluded
    #[arg(long, allow_hyphen_values = true)]
    half_length: f64,
    /// Capsule axis (X, Y, Z)
    #[arg(long, default_value = "Y")]
    axis: Axis,
    /// Center offset as x,y,z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,0,0")]
    center: Vec3,
}

impl CapsuleAArgs {
    fn params(&self) -> CapsuleParamsA {
        CapsuleParamsA {
            start_radius: self.start_radius,
            end_radius: self.end_radius,
            half_length: self.half_length,
            axis: self.axis,
            center: self.center,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetArg {
    A,
    B,
}

impl From<TargetArg> for System {
    fn from(t: TargetArg) -> Self {
        match t {
            TargetArg::A => System::A,
            TargetArg::B => System::B,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PlacementArg {
    Replace,
    KeepSource,
}

impl From<PlacementArg> for Placement {
    fn from(p: PlacementArg) -> Self {
        match p {
            PlacementArg::Replace => Placement::Replace,
            PlacementArg::KeepSource => Placement::KeepSource,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref())?;
    if cli.validate {
        config.convert.validate = true;
    }
    let converter = Converter::new(config.convert);

    match cli.command {
        Commands::AToB { capsule } => {
            let out = converter.convert(&CapsuleParams::A(capsule.params()))?;
            print_json(&out)?;
        }
        Commands::BToA {
            size,
            direction,
            center,
            aligned_on_center,
            reverse_direction,
        } => {
            let b = CapsuleParamsB {
                size,
                direction,
                aligned_on_center,
                reverse_direction,
                center,
            };
            if half_length_clamped(&b) {
                warn!(
                    "size.z {} is shorter than the cap radii, half-length floored to {}",
                    b.size.z, MIN_HALF_LENGTH
                );
            }
            if !b.is_canonical() {
                warn!("direction flags are ignored, capsule treated as centered");
            }
            let out = converter.convert(&CapsuleParams::B(b))?;
            print_json(&out)?;
        }
        Commands::Roundtrip { capsule } => {
            roundtrip(&capsule.params(), config.convert)?;
        }
        Commands::Batch {
            input,
            to,
            output,
            placement,
        } => {
            let placement = placement.map(Placement::from).unwrap_or(config.batch.placement);
            let adapter = HostAdapter::new(
                config.schema.clone(),
                config.accessor.accessor(),
                converter,
            );
            run_batch(adapter, &input, to.into(), placement, output.as_deref())?;
        }
        Commands::Info { file } => {
            show_info(&file, &config)?;
        }
    }

    Ok(())
}

fn print_json(params: &CapsuleParams) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(params)?);
    Ok(())
}

fn read_scene(path: &Path) -> Result<Scene> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Scene::from_json(&json).with_context(|| format!("invalid scene {}", path.display()))
}

fn roundtrip(a: &CapsuleParamsA, options: ConvertOptions) -> Result<()> {
    Converter::new(options).convert(&CapsuleParams::A(*a))?;
    let b = convert_a_to_b(a);
    let back = convert_b_to_a(&b);
    let tol = Tolerance::DEFAULT;

    println!(
        "B: size=({}, {}, {}) center=({}, {}, {})",
        b.size.x, b.size.y, b.size.z, b.center.x, b.center.y, b.center.z
    );
    if half_length_clamped(&b) {
        println!("half-length clamped to {MIN_HALF_LENGTH}; round trip is lossy");
    }

    let drift = [
        ("start_radius", (back.start_radius - a.start_radius).abs()),
        ("end_radius", (back.end_radius - a.end_radius).abs()),
        ("half_length", (back.half_length - a.half_length).abs()),
        ("center", (back.center - a.center).norm()),
    ];
    let mut exact = true;
    for (field, d) in drift {
        if !tol.is_zero(d) {
            exact = false;
            println!("  {field} drifted by {d:e}");
        }
    }
    if exact {
        println!("round trip exact within {:e}", tol.linear);
    }
    Ok(())
}

fn run_batch<C: capsync_host::CenterAccessor>(
    adapter: HostAdapter<C>,
    input: &Path,
    target: System,
    placement: Placement,
    output: Option<&Path>,
) -> Result<()> {
    let mut scene = read_scene(input)?;
    let batch = BatchConverter::new(adapter, BatchOptions { target, placement });
    let report = batch.convert_scene(&mut scene);

    for entry in &report.entries {
        match &entry.status {
            EntryStatus::Converted { count } => println!("  {}: converted {count}", entry.object),
            EntryStatus::Skipped { reason } => println!("  {}: skipped ({reason})", entry.object),
            EntryStatus::Failed { error } => println!("  {}: FAILED {error}", entry.object),
        }
    }
    println!("{report}");

    match output {
        Some(path) => {
            std::fs::write(path, scene.to_json()?)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("Dry run, nothing written (use --output)"),
    }

    if !report.is_success() {
        anyhow::bail!("{} object(s) failed to convert", report.failed);
    }
    Ok(())
}

fn show_info(path: &Path, config: &config::Config) -> Result<()> {
    let scene = read_scene(path)?;
    let schema = &config.schema;

    println!("Scene: {}", path.display());
    println!("Objects: {}", scene.objects.len());
    for object in &scene.objects {
        let a = object.components_of(&schema.a_component).count();
        let b = object.components_of(&schema.b_component).count();
        if a == 0 && b == 0 {
            continue;
        }
        let note = if a > 0 && b > 0 { " (ambiguous)" } else { "" };
        println!("  {}: {a} System A, {b} System B{note}", object.name);
    }
    Ok(())
}
