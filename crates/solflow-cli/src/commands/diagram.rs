//! Print the seed diagram.

use anyhow::{Context, Result};
use solflow_core::seed_diagram;

pub fn execute() -> Result<()> {
    let json = seed_diagram()
        .to_json_pretty()
        .context("Failed to serialize diagram")?;
    println!("{json}");
    Ok(())
}
