use hgtcoal_sim::ancestry::EventKind;
use hgtcoal_sim::simulation::{RunResult, SimulationConfig};

pub fn print_parameters(config: &SimulationConfig) {
    let p = &config.population;
    println!("\n📋 Simulation Configuration");
    println!("  • Population Size: {} [-N, --population-size]", p.population_size);
    println!("  • Sample Size: {} [-n, --sample-size]", p.sample_size);
    println!("  • Genome Length: {} sites [-L, --genome-length]", p.genome_length);
    println!("  • Replicates: {} [-r, --replicates]", config.replicates);
    if let Some(seed) = config.seed {
        println!("  • Random Seed: {seed} [--seed]");
    } else {
        println!("  • Random Seed: Random [--seed]");
    }

    println!("\n⚡ Mutation Parameters");
    println!(
        "  • Mutation Rate: {:.2e} /site/gen [-u, --mutation-rate]",
        p.mutation_rate
    );
    println!("  • θ = 2Nμ: {:.4e} /site", p.theta());

    println!("\n🔀 Transfer Parameters");
    if p.transfer_rate > 0.0 {
        println!(
            "  • Transfer Rate: {:.2e} /site/gen [--transfer-rate]",
            p.transfer_rate
        );
        println!(
            "  • Fragment Length: {} sites [-f, --fragment-length]",
            p.fragment_length
        );
        println!(
            "  • Scaled Rate p = 2NτL: {:.4}",
            p.scaled_transfer_rate()
        );
    } else {
        println!("  • Transfer: Disabled");
    }
    println!();
}

pub fn print_run_summary(results: &[RunResult]) {
    println!("📊 Replicates");
    println!(
        "  {:>5}  {:>20}  {:>8}  {:>8}  {:>12}  {:>9}",
        "rep", "seed", "coal", "transfer", "tmrca (gen)", "mutations"
    );
    for run in results {
        println!(
            "  {:>5}  {:>20}  {:>8}  {:>8}  {:>12.1}  {:>9}",
            run.replicate,
            run.seed,
            run.history.count(EventKind::Coalescence),
            run.history.count(EventKind::Transfer),
            run.history.tmrca(),
            run.mutations
        );
    }

    if results.len() > 1 {
        let n = results.len() as f64;
        let mean_tmrca = results.iter().map(|r| r.history.tmrca()).sum::<f64>() / n;
        let mean_transfers = results
            .iter()
            .map(|r| r.history.count(EventKind::Transfer) as f64)
            .sum::<f64>()
            / n;
        println!("  • Mean TMRCA: {mean_tmrca:.1} generations");
        println!("  • Mean transfers per replicate: {mean_transfers:.2}");
    }
}
