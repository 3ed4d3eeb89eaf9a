use crate::reports;
use chargefield::api::simulate;
use chargefield::charge::Charge;
use chargefield::config::Config;
use chargefield::error::FieldResult;
use chargefield::loader::load_charges;
use chargefield::presets::KnownArrangement;
use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct SolveArgs {
    #[command(flatten)]
    pub config: Config,

    /// Charge file (.csv with x,y,q header, or .json)
    #[arg(short = 'f', long)]
    pub charges: Option<PathBuf>,

    #[arg(short, long)]
    pub preset: Option<KnownArrangement>,

    /// Extra charge as "x,y,q" (repeatable)
    #[arg(short = 'q', long = "charge", allow_hyphen_values = true)]
    pub charge: Vec<Charge>,

    #[arg(short, long, default_value = "field.svg")]
    pub output: PathBuf,

    /// Also write a JSON summary (report lines + base64 image)
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Print the base64-encoded image to stdout
    #[arg(long, default_value_t = false)]
    pub base64: bool,
}

/// File charges first, then the preset, then inline `--charge` values.
pub fn collect_charges(args: &SolveArgs) -> FieldResult<Vec<Charge>> {
    let mut charges = Vec::new();
    if let Some(path) = &args.charges {
        info!("📂 Loading charges: {}", path.display());
        charges.extend(load_charges(path)?);
    }
    if let Some(preset) = args.preset {
        info!("🧲 Using preset: {}", preset);
        charges.extend(preset.charges());
    }
    charges.extend(args.charge.iter().copied());

    if charges.is_empty() {
        warn!("⚠️  No charges supplied. The field is zero everywhere.");
    }
    Ok(charges)
}

pub fn run(args: &SolveArgs, config: &Config) -> FieldResult<()> {
    let charges = collect_charges(args)?;
    let sim = simulate(&charges, config)?;

    sim.image.write_to(&args.output)?;
    info!(
        "🖼️  Wrote {} ({} streamlines)",
        args.output.display(),
        sim.image.streamline_count
    );

    reports::print_grid_summary(&sim);
    reports::print_charge_table(&sim.reports);

    println!();
    for line in &sim.field_values {
        println!("{}", line);
    }

    if let Some(path) = &args.json {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &sim.summary())?;
        info!("📝 Wrote summary: {}", path.display());
    }

    if args.base64 {
        println!("{}", sim.image.to_base64());
    }

    Ok(())
}
