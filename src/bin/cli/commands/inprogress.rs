use anyhow::Result;

use crate::app::App;
use crate::commands::audit;
use crate::render::terminal::{external_id_prefix, heading, Color};
use crate::OutputFormat;

pub fn run(app: &mut App, format: &OutputFormat) -> Result<()> {
    let trigger = audit::maybe_trigger(app)?;

    let Some(problems) = app.check(app.tracker.in_progress())? else {
        return Ok(());
    };

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = problems
                .iter()
                .map(|(name, id)| serde_json::json!({ "name": name, "leetcodeId": id }))
                .collect();
            let output = serde_json::json!({
                "pendingAudit": trigger.problem(),
                "problems": output,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if audit::announce(app, &trigger) {
                return Ok(());
            }
            if problems.is_empty() {
                println!("{}", app.paint("No problems currently in progress.", Color::YELLOW));
                return Ok(());
            }
            let title = format!("Problems in Progress ({})", problems.len());
            println!("{}", heading(&title, app.use_color));
            for (i, (name, id)) in problems.iter().enumerate() {
                println!("{}. {}{}", i + 1, external_id_prefix(*id, app.use_color), name);
            }
        }
    }

    Ok(())
}
