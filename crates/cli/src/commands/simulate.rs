use std::path::Path;

use anyhow::{Context, Result};
use hgtcoal_sim::simulation::{RunResult, Simulation};
use serde_json::json;

use super::run_with_progress;
use crate::args::{SequenceFormat, SimulateArgs};
use crate::printing::{print_parameters, print_run_summary};

pub fn simulate(args: &SimulateArgs) -> Result<()> {
    println!("🧬 hgtcoal - Simulating Genealogies");
    println!("============================================");

    let config = args.model.resolve()?;
    print_parameters(&config);

    let mut sim = Simulation::new(config).context("Failed to set up simulation")?;
    let results = run_with_progress(&mut sim, args.progress)?;

    print_run_summary(&results);

    if let Some(dir) = &args.output {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
        for run in &results {
            write_replicate(dir, run, args.format, args.history)?;
        }
        println!("\n✓ Wrote {} replicate(s) to {}", results.len(), dir.display());
    }

    Ok(())
}

fn write_replicate(
    dir: &Path,
    run: &RunResult,
    format: SequenceFormat,
    history: bool,
) -> Result<()> {
    let (path, content) = match format {
        SequenceFormat::Fasta => {
            let mut content = String::new();
            for (i, seq) in run.sequences.iter().enumerate() {
                content.push_str(&format!(">r{}_s{}\n{}\n", run.replicate, i, seq));
            }
            (dir.join(format!("replicate_{}.fasta", run.replicate)), content)
        }
        SequenceFormat::Json => {
            let sequences: Vec<String> = run.sequences.iter().map(ToString::to_string).collect();
            let content = serde_json::to_string_pretty(&json!({
                "replicate": run.replicate,
                "seed": run.seed,
                "mutations": run.mutations,
                "sequences": sequences,
            }))?;
            (dir.join(format!("replicate_{}.json", run.replicate)), content)
        }
    };
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    if history {
        let path = dir.join(format!("replicate_{}.history.json", run.replicate));
        let content = serde_json::to_string_pretty(&run.history)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}
