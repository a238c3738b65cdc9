use anyhow::{Context, Result, ensure};
use hgtcoal_analysis::{expected_ks, nucleotide_diversity};
use hgtcoal_sim::simulation::{GenerationEvents, PopulationParams, WrightFisher};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::Serialize;

use super::progress_bar;
use crate::args::{ForwardArgs, ReportFormat};
use crate::defaults;
use crate::printing::print_parameters;

/// When to sample a forward run.
#[derive(Debug, Clone, Copy, Serialize)]
struct Schedule {
    burn_in: usize,
    generations: usize,
    sample_every: usize,
}

#[derive(Debug, Serialize)]
struct ForwardReplicate {
    replicate: usize,
    seed: u64,
    samples: usize,
    mean_divergence: f64,
    mutations: usize,
    transfers: usize,
}

#[derive(Debug, Serialize)]
struct ForwardReport {
    parameters: PopulationParams,
    schedule: Schedule,
    mean_divergence: f64,
    expected_divergence: f64,
    replicates: Vec<ForwardReplicate>,
}

pub fn run_forward(args: &ForwardArgs) -> Result<()> {
    ensure!(args.sample_every > 0, "--sample-every must be positive");
    ensure!(
        args.generations >= args.sample_every,
        "--generations ({}) must cover at least one sampling interval ({})",
        args.generations,
        args.sample_every
    );
    let config = args.model.resolve()?;
    let schedule = Schedule {
        burn_in: args.burn_in,
        generations: args.generations,
        sample_every: args.sample_every,
    };

    let pretty = args.format == ReportFormat::Pretty;
    if pretty {
        println!("🧬 hgtcoal - Forward Wright-Fisher Simulation");
        println!("============================================");
        print_parameters(&config);
    }

    let mut master = match config.seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_seed(rand::rng().random()),
    };
    let seeds: Vec<u64> = (0..config.replicates).map(|_| master.random()).collect();
    tracing::info!(
        replicates = seeds.len(),
        params = %config.population,
        "running forward replicates"
    );

    let pb = progress_bar(args.progress, seeds.len())?;
    let replicates = seeds
        .par_iter()
        .enumerate()
        .map(|(replicate, &seed)| {
            let run = evolve_replicate(&config.population, schedule, replicate, seed);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            run
        })
        .collect::<Result<Vec<_>>>()?;
    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    let report = build_report(&config.population, schedule, replicates);
    match args.format {
        ReportFormat::Pretty => print_report(&report),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Evolve one population through the burn-in, then sample it every
/// `sample_every` generations.
fn evolve_replicate(
    params: &PopulationParams,
    schedule: Schedule,
    replicate: usize,
    seed: u64,
) -> Result<ForwardReplicate> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut pop = WrightFisher::new(params.clone(), &mut rng)
        .with_context(|| format!("Failed to set up population for replicate {replicate}"))?;

    let mut events: GenerationEvents = pop.run(schedule.burn_in, &mut rng);
    let samples = schedule.generations / schedule.sample_every;
    let mut total = 0.0;
    for _ in 0..samples {
        events += pop.run(schedule.sample_every, &mut rng);
        total += nucleotide_diversity(&pop.sample(params.sample_size, &mut rng));
    }

    tracing::debug!(
        replicate,
        seed,
        generation = pop.generation(),
        mutations = events.mutations,
        transfers = events.transfers,
        "forward replicate finished"
    );
    Ok(ForwardReplicate {
        replicate,
        seed,
        samples,
        mean_divergence: total / samples.max(1) as f64,
        mutations: events.mutations,
        transfers: events.transfers,
    })
}

fn build_report(
    params: &PopulationParams,
    schedule: Schedule,
    replicates: Vec<ForwardReplicate>,
) -> ForwardReport {
    let reps = replicates.len().max(1) as f64;
    let mean_divergence = replicates.iter().map(|r| r.mean_divergence).sum::<f64>() / reps;
    ForwardReport {
        parameters: params.clone(),
        schedule,
        mean_divergence,
        expected_divergence: expected_ks(
            params.population_size,
            params.mutation_rate,
            params.transfer_rate,
            params.fragment_length,
            defaults::ALPHABET_SIZE,
        ),
        replicates,
    }
}

fn print_report(report: &ForwardReport) {
    let s = &report.schedule;
    println!(
        "📊 Forward Runs ({} burn-in + {} generations, sampled every {})",
        s.burn_in, s.generations, s.sample_every
    );
    println!(
        "  {:>5}  {:>20}  {:>8}  {:>10}  {:>10}  {:>12}",
        "rep", "seed", "samples", "mutations", "transfers", "divergence"
    );
    for run in &report.replicates {
        println!(
            "  {:>5}  {:>20}  {:>8}  {:>10}  {:>10}  {:>12.6}",
            run.replicate, run.seed, run.samples, run.mutations, run.transfers, run.mean_divergence
        );
    }
    println!("  • Mean divergence: {:.6}", report.mean_divergence);
    println!("  • Expected divergence: {:.6}", report.expected_divergence);
}
