use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use srl_lib::backup::{ExportBundle, ImportCounts, ImportMode};

use crate::app::App;
use crate::render::terminal::{heading, Color};

pub fn run(app: &App, file: &Path, mode: ImportMode, dry_run: bool) -> Result<()> {
    if !file.exists() {
        eprintln!("{}", app.paint(&format!("File {} not found", file.display()), Color::RED));
        return Ok(());
    }
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let Some(bundle) = app.check(ExportBundle::parse(&text))? else {
        return Ok(());
    };

    println!("{}", heading("Import Preview", app.use_color));
    println!("  Export Date: {}", bundle.exported_at);
    println!("  Export Type: {}", bundle.export_type);
    print_counts(&bundle.preview(), None);

    if dry_run {
        println!("{}", app.paint("Dry run complete - no changes made.", Color::YELLOW));
        return Ok(());
    }

    let Some(counts) = app.check(app.tracker.import(bundle, mode))? else {
        return Ok(());
    };

    let verb = match mode {
        ImportMode::Replace => "imported",
        ImportMode::Merge => "merged",
    };
    println!();
    println!("{} Import completed", app.paint("ok", Color::GREEN));
    if counts.is_empty() {
        println!("  No data was imported");
    } else {
        print_counts(&counts, Some(verb));
    }

    Ok(())
}

fn print_counts(counts: &ImportCounts, verb: Option<&str>) {
    let suffix = verb.map(|v| format!(" {}", v)).unwrap_or_default();
    if let Some(n) = counts.in_progress {
        println!("  - {} problems in progress{}", n, suffix);
    }
    if let Some(n) = counts.mastered {
        println!("  - {} mastered problems{}", n, suffix);
    }
    if let Some(n) = counts.next_up {
        println!("  - {} next-up problems{}", n, suffix);
    }
    if counts.config {
        println!("  - Configuration settings{}", suffix);
    }
    if let Some(n) = counts.audit_entries {
        println!("  - {} audit entries{}", n, suffix);
    }
}
