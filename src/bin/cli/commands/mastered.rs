use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{heading, Color};
use crate::OutputFormat;

pub fn run(app: &App, count_only: bool, format: &OutputFormat) -> Result<()> {
    if count_only {
        if let Some(count) = app.check(app.tracker.mastered_count())? {
            println!("{} {}", app.paint("Mastered Count:", Color::GREEN), count);
        }
        return Ok(());
    }

    let Some(problems) = app.check(app.tracker.mastered())? else {
        return Ok(());
    };

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = problems
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "name": p.name,
                        "leetcodeId": p.external_id,
                        "attempts": p.attempts,
                        "masteredDate": p.mastered_on,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if problems.is_empty() {
                println!("{}", app.paint("No mastered problems yet.", Color::YELLOW));
                return Ok(());
            }

            let title = format!("Mastered Problems ({})", problems.len());
            println!("{}", heading(&title, app.use_color));

            let ids: Vec<String> = problems
                .iter()
                .map(|p| p.external_id.map(|id| format!("#{}", id)).unwrap_or_default())
                .collect();
            let id_width = ids.iter().map(|s| s.len()).max().unwrap_or(0).max(2);
            let name_width = problems.iter().map(|p| p.name.chars().count()).max().unwrap_or(0).max(7);

            println!(
                "{:id_width$}  {:name_width$}  {:>8}  {}",
                "ID", "Problem", "Attempts", "Mastered Date"
            );
            for (p, id) in problems.iter().zip(&ids) {
                println!(
                    "{}  {}  {:>8}  {}",
                    app.paint(&format!("{:id_width$}", id), Color::DIM),
                    app.paint(&format!("{:name_width$}", p.name), Color::CYAN),
                    p.attempts,
                    app.paint(&p.mastered_on.to_string(), Color::GREEN)
                );
            }
        }
    }

    Ok(())
}
