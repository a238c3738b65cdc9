pub mod forward;
pub mod init;
pub mod simulate;
pub mod stats;

use hgtcoal_sim::simulation::{RunResult, Simulation};
use indicatif::{ProgressBar, ProgressStyle};

/// A replicate progress bar, or `None` when progress is not requested.
pub(crate) fn progress_bar(
    show_progress: bool,
    replicates: usize,
) -> anyhow::Result<Option<ProgressBar>> {
    if !show_progress {
        return Ok(None);
    }
    let pb = ProgressBar::new(replicates as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}",
            )?
            .progress_chars("#>-"),
    );
    Ok(Some(pb))
}

/// Run every replicate, optionally ticking a progress bar as each one
/// finishes.
pub(crate) fn run_with_progress(
    sim: &mut Simulation,
    show_progress: bool,
) -> anyhow::Result<Vec<RunResult>> {
    let pb = progress_bar(show_progress, sim.config().replicates)?;

    let results = sim.run_replicates_with(|_| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    })?;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }
    Ok(results)
}
