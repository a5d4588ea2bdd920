use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use streamline_core::integrator::constants;
use streamline_core::{
    write_vtp_file, IntegrationConfig, StreamlineTracer, SyntheticField, TerminationReason, Vec3,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Analytic field to sample onto the unit cube
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FieldKind {
    /// Constant flow along +X
    Uniform,
    /// Solid-body rotation about the vertical axis (closed orbits)
    Rotation,
    /// Swirling updraft with radial inflow
    Tornado,
}

impl FieldKind {
    fn field(self) -> SyntheticField {
        match self {
            FieldKind::Uniform => SyntheticField::Uniform {
                velocity: Vec3::new(1.0, 0.0, 0.0),
            },
            FieldKind::Rotation => SyntheticField::Rotation { angular_speed: 1.0 },
            FieldKind::Tornado => SyntheticField::tornado(),
        }
    }
}

/// Streamline tracing demo on a synthetic vector field
#[derive(Parser, Debug)]
#[command(name = "streamline-demo")]
#[command(about = "Trace one streamline through a synthetic field and write it as VTK PolyData", long_about = None)]
struct Args {
    /// Vector field to trace through
    #[arg(short, long, value_enum, default_value_t = FieldKind::Tornado)]
    field: FieldKind,

    /// Grid nodes per axis over [0, 1]³
    #[arg(short, long, default_value_t = 33)]
    resolution: usize,

    /// Seed point as x,y,z
    #[arg(short, long, value_parser = parse_point, default_value = "0.7,0.5,0.1")]
    seed: Vec3,

    /// RK4 step length (default: a quarter of the grid spacing)
    #[arg(long)]
    step: Option<f64>,

    /// Maximum steps per direction
    #[arg(short, long, default_value_t = constants::DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Field magnitude below which a direction stalls (0 disables)
    #[arg(long, default_value_t = constants::DEFAULT_STALL_EPSILON)]
    stall_epsilon: f64,

    /// Output .vtp path
    #[arg(short, long, default_value = "streamline.vtp")]
    output: PathBuf,
}

/// Parse `x,y,z` into a point
fn parse_point(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{s}'"));
    }

    let mut coords = [0.0; 3];
    for (coord, part) in coords.iter_mut().zip(&parts) {
        *coord = part
            .parse()
            .map_err(|e| format!("invalid coordinate '{part}': {e}"))?;
    }
    Ok(Vec3::new(coords[0], coords[1], coords[2]))
}

fn describe(reason: TerminationReason) -> &'static str {
    match reason {
        TerminationReason::OutOfBounds => "left the grid",
        TerminationReason::Stalled => "stalled in a vanishing field",
        TerminationReason::MaxStepsReached => "hit the step limit",
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let grid = args.field.field().build_unit_cube(args.resolution)?;
    info!(
        "Sampled {:?} field onto {}³ grid (spacing {:.4})",
        args.field,
        args.resolution,
        grid.min_spacing()
    );

    let mut config = IntegrationConfig::for_grid(&grid)
        .with_max_steps(args.max_steps)
        .with_stall_epsilon(args.stall_epsilon);
    if let Some(step) = args.step {
        config = config.with_step_length(step);
    }

    let tracer = StreamlineTracer::new(&grid, config)?;
    let line = tracer.trace(&args.seed)?;

    println!("=== Streamline Demo ===\n");
    println!(
        "Seed: ({:.3}, {:.3}, {:.3}), step {:.4}, max {} steps per direction",
        args.seed.x, args.seed.y, args.seed.z, config.step_length, config.max_steps
    );
    println!(
        "Backward: {} steps, {}",
        line.backward().steps,
        describe(line.backward().reason)
    );
    println!(
        "Forward:  {} steps, {}",
        line.forward().steps,
        describe(line.forward().reason)
    );
    println!(
        "Points: {}, arc length {:.4}",
        line.len(),
        line.arc_length()
    );
    if line.is_degenerate() {
        println!("Streamline is the seed alone (no line cells written)");
    }

    write_vtp_file(&args.output, &line)?;
    println!("\nWrote {}", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Streamline demo failed: {e}");
            ExitCode::FAILURE
        }
    }
}
