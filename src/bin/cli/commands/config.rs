use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{heading, Color};

pub fn run(app: &App, audit_probability: Option<f64>) -> Result<()> {
    if let Some(p) = audit_probability {
        if app.check(app.tracker.set_audit_probability(p))?.is_some() {
            println!("Audit probability set to {}", app.paint(&p.to_string(), Color::CYAN));
        }
        return Ok(());
    }

    let Some(config) = app.check(app.tracker.config())? else {
        return Ok(());
    };

    println!("{}", heading("Configuration", app.use_color));
    println!(
        "  audit_probability: {}",
        app.paint(&config.audit_probability().to_string(), Color::CYAN)
    );
    for (key, value) in config.iter().filter(|(key, _)| key.as_str() != "audit_probability") {
        println!("  {}: {}", key, value);
    }

    Ok(())
}
