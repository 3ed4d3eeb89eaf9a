use crate::reports;
use chargefield::api::{simulate, SimulationSummary};
use chargefield::config::Config;
use chargefield::error::{FieldError, FieldResult};
use chargefield::loader::load_charges;
use clap::Args;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub config: Config,

    /// Charge files (.csv or .json)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(short, long, default_value = "out")]
    pub out_dir: PathBuf,
}

fn scenario_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scenario")
        .to_string()
}

/// Each scenario owns its charges and arrays for the whole run.
fn run_one(path: &Path, out_dir: &Path, config: &Config) -> FieldResult<SimulationSummary> {
    let name = scenario_name(path);
    let charges = load_charges(path)?;
    let sim = simulate(&charges, config)?;

    let image_path = out_dir.join(format!("{}.{}", name, sim.image.format.extension()));
    sim.image.write_to(&image_path)?;

    let summary = sim.summary();
    let writer = BufWriter::new(File::create(out_dir.join(format!("{}.json", name)))?);
    serde_json::to_writer_pretty(writer, &summary)?;
    Ok(summary)
}

pub fn run(args: &BatchArgs, config: &Config) -> FieldResult<()> {
    fs::create_dir_all(&args.out_dir)?;
    info!(
        "🔥 Solving {} scenarios on {} threads",
        args.inputs.len(),
        rayon::current_num_threads()
    );

    let results: Vec<(String, FieldResult<SimulationSummary>)> = args
        .inputs
        .par_iter()
        .map(|path| (scenario_name(path), run_one(path, &args.out_dir, config)))
        .collect();

    for (name, result) in &results {
        if let Err(e) = result {
            error!("❌ {}: {}", name, e);
        }
    }
    reports::print_batch_table(&results);

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    if failed > 0 {
        return Err(FieldError::InvalidInput(format!(
            "{} of {} scenarios failed",
            failed,
            results.len()
        )));
    }
    info!("✅ Results written to {}", args.out_dir.display());
    Ok(())
}
