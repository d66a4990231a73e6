use anyhow::Result;

use srl_lib::review::DueList;

use crate::app::App;
use crate::commands::audit;
use crate::render::terminal::{external_id_prefix, heading, overdue_legend, overdue_marker, Color};
use crate::OutputFormat;

pub fn run(app: &mut App, limit: Option<usize>, format: &OutputFormat) -> Result<()> {
    let trigger = audit::maybe_trigger(app)?;

    let Some(due) = app.check(app.tracker.get_due_problems(limit))? else {
        return Ok(());
    };

    if let OutputFormat::Json = format {
        let output = match &due {
            DueList::Scheduled(problems) => problems
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "name": p.name,
                        "leetcodeId": p.external_id,
                        "daysOverdue": p.days_overdue,
                        "lastRating": p.last_rating,
                        "masteryCandidate": p.is_mastery_candidate(),
                    })
                })
                .collect::<Vec<_>>(),
            DueList::NextUp(names) => names
                .iter()
                .map(|name| serde_json::json!({ "name": name, "nextUp": true }))
                .collect(),
        };
        let output = serde_json::json!({
            "pendingAudit": trigger.problem(),
            "problems": output,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if audit::announce(app, &trigger) {
        return Ok(());
    }

    if due.is_empty() {
        println!("{}", app.paint("No problems due today or in Next Up.", Color::GREEN));
        return Ok(());
    }

    let title = format!(
        "Problems to Practice [{}] ({})",
        app.tracker.today(),
        due.len()
    );
    println!("{}", heading(&title, app.use_color));

    match &due {
        DueList::Scheduled(problems) => {
            if problems.iter().any(|p| p.overdue_tier().is_some()) {
                println!("{}", overdue_legend(app.use_color));
            }
            for (i, p) in problems.iter().enumerate() {
                let mut line = format!(
                    "{}. {}{}",
                    i + 1,
                    external_id_prefix(p.external_id, app.use_color),
                    p.name
                );
                if p.is_mastery_candidate() {
                    line.push(' ');
                    line.push_str(&app.paint("*", Color::MAGENTA));
                }
                if let Some(tier) = p.overdue_tier() {
                    line.push(' ');
                    line.push_str(&overdue_marker(tier, app.use_color));
                }
                println!("{}", line);
            }
        }
        DueList::NextUp(names) => {
            for (i, name) in names.iter().enumerate() {
                println!("{}. {} {}", i + 1, name, app.paint("(next up)", Color::GRAY));
            }
        }
    }

    Ok(())
}
