use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use srl_lib::backup::{ExportOptions, ExportType};

use crate::app::App;
use crate::render::terminal::Color;

pub fn run(app: &App, output: &Path, options: ExportOptions) -> Result<()> {
    if output.exists() {
        println!(
            "{}",
            app.paint(
                &format!("Warning: {} already exists and will be overwritten.", output.display()),
                Color::YELLOW
            )
        );
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let Some(bundle) = app.check(app.tracker.export(&options))? else {
        return Ok(());
    };
    fs::write(output, bundle.to_json()?)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let size = fs::metadata(output).map(|m| m.len()).unwrap_or(0);
    println!("{} Export completed", app.paint("ok", Color::GREEN));
    println!("  File: {}", output.display());
    println!("  Size: {} bytes", size);
    println!("  Type: {}", bundle.export_type);

    let counts = bundle.preview();
    if let Some(n) = counts.in_progress {
        println!("  - {} problems in progress", n);
    }
    if let Some(n) = counts.mastered {
        println!("  - {} mastered problems", n);
    }
    if let Some(n) = counts.next_up {
        println!("  - {} problems in next-up queue", n);
    }
    if bundle.data.config.is_some() {
        println!("  - Configuration settings");
    }
    if bundle.data.audit.is_some() {
        println!("  - Audit history");
    }

    println!();
    println!(
        "To import this data elsewhere, use: {}",
        app.paint(&format!("srl import -f {}", output.display()), Color::CYAN)
    );

    Ok(())
}

pub fn export_type(mastered_only: bool, progress_only: bool) -> ExportType {
    if mastered_only {
        ExportType::MasteredOnly
    } else if progress_only {
        ExportType::ProgressOnly
    } else {
        ExportType::Full
    }
}
