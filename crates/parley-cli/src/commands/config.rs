use anyhow::{Context, Result};
use colored::Colorize;
use parley_infrastructure::ConfigService;

pub fn path(service: &ConfigService) -> Result<()> {
    println!("{}", service.path().display());
    Ok(())
}

pub fn init(service: &ConfigService) -> Result<()> {
    let created = service
        .write_default_if_missing()
        .with_context(|| format!("Failed to write {}", service.path().display()))?;
    if created {
        println!(
            "{}",
            format!("Wrote default config to {}", service.path().display()).green()
        );
    } else {
        println!(
            "{}",
            format!("Config already exists at {}", service.path().display()).yellow()
        );
    }
    Ok(())
}
