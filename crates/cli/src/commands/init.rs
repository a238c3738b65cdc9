use anyhow::{Context, Result};

use crate::args::InitArgs;
use crate::printing::print_parameters;

pub fn init_config(args: &InitArgs) -> Result<()> {
    println!("🧬 hgtcoal - Initializing Configuration");
    println!("============================================");

    let config = args.model.resolve()?;
    print_parameters(&config);

    let json = serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("✓ Configuration written to {}", args.output.display());
    Ok(())
}
