use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::session::Session;

pub fn run(session: &Session, output: Option<&Path>) -> Result<()> {
    let calendar = session.calendar();

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            calendar.export_csv(file)?;
            eprintln!(
                "{}",
                format!("  Exported {} events to {}", calendar.len(), path.display()).green()
            );
        }
        None => calendar.export_csv(io::stdout().lock())?,
    }
    Ok(())
}
