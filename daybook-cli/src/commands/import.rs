use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::session::Session;

pub fn run(session: &mut Session, file: &Path) -> Result<()> {
    let reader =
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let summary = session.calendar_mut().import_csv(reader)?;

    println!(
        "{}",
        format!(
            "  Imported {} events into '{}'",
            summary.imported,
            session.calendar().title()
        )
        .green()
    );
    if summary.skipped > 0 {
        println!("{}", format!("  Skipped {} malformed rows", summary.skipped).yellow());
    }
    Ok(())
}
