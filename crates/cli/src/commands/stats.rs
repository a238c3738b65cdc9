use anyhow::{Context, Result};
use hgtcoal_analysis::{
    Covariances, Divergence, MismatchMatrix, expected_ks, nucleotide_diversity, tajimas_d,
    wattersons_theta,
};
use hgtcoal_sim::simulation::{PopulationParams, RunResult, Simulation};
use serde::Serialize;

use super::run_with_progress;
use crate::args::{ReportFormat, StatsArgs};
use crate::defaults;
use crate::printing::print_parameters;

/// Everything `stats` reports, pooled over all replicates.
#[derive(Debug, Serialize)]
struct StatsReport {
    parameters: PopulationParams,
    replicates: usize,
    pairs: usize,
    divergence: Divergence,
    expected_divergence: f64,
    mean_pi: f64,
    mean_theta_w: f64,
    mean_tajimas_d: f64,
    covariances: Covariances,
}

pub fn report_stats(args: &StatsArgs) -> Result<()> {
    let config = args.model.resolve()?;
    let pretty = args.format == ReportFormat::Pretty;
    if pretty {
        println!("🧬 hgtcoal - Divergence Statistics");
        println!("============================================");
        print_parameters(&config);
    }

    let mut sim = Simulation::new(config).context("Failed to set up simulation")?;
    let results = run_with_progress(&mut sim, args.progress)?;
    let report = build_report(sim.params(), &results, args.max_distance);

    match args.format {
        ReportFormat::Pretty => print_report(&report),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn build_report(
    params: &PopulationParams,
    results: &[RunResult],
    max_distance: usize,
) -> StatsReport {
    let mut matrix = MismatchMatrix::new(params.genome_length);
    let (mut pi, mut theta_w, mut d) = (0.0, 0.0, 0.0);
    for run in results {
        matrix.add_sample(&run.sequences);
        pi += nucleotide_diversity(&run.sequences);
        theta_w += wattersons_theta(&run.sequences);
        d += tajimas_d(&run.sequences);
    }
    let reps = results.len().max(1) as f64;

    StatsReport {
        parameters: params.clone(),
        replicates: results.len(),
        pairs: matrix.len(),
        divergence: matrix.divergence(),
        expected_divergence: expected_ks(
            params.population_size,
            params.mutation_rate,
            params.transfer_rate,
            params.fragment_length,
            defaults::ALPHABET_SIZE,
        ),
        mean_pi: pi / reps,
        mean_theta_w: theta_w / reps,
        mean_tajimas_d: d / reps,
        covariances: matrix.covariances(max_distance),
    }
}

fn print_report(report: &StatsReport) {
    println!("📊 Divergence ({} pairs over {} replicates)", report.pairs, report.replicates);
    println!("  • Mean divergence: {:.6}", report.divergence.mean);
    println!("  • Variance: {:.6e}", report.divergence.variance);
    println!("  • Expected divergence: {:.6}", report.expected_divergence);
    println!("  • Mean π: {:.6}", report.mean_pi);
    println!("  • Mean θ_W: {:.6}", report.mean_theta_w);
    println!("  • Mean Tajima's D: {:.4}", report.mean_tajimas_d);

    let cov = &report.covariances;
    if cov.structure.is_empty() {
        return;
    }
    println!("\n📈 Mismatch Covariance");
    println!(
        "  {:>6}  {:>12}  {:>12}  {:>12}",
        "l", "structure", "random", "joint"
    );
    for l in 0..cov.structure.len() {
        println!(
            "  {:>6}  {:>12.4e}  {:>12.4e}  {:>12.4e}",
            l, cov.structure[l], cov.random[l], cov.joint[l]
        );
    }
}
