use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{heading, Color};

pub fn run(app: &App, months: u32) -> Result<()> {
    let Some(summary) = app.check(app.tracker.activity(months))? else {
        return Ok(());
    };

    println!(
        "{}",
        heading(
            &format!("Activity {} to {}", summary.start, summary.end),
            app.use_color
        )
    );

    if summary.total == 0 {
        println!("{}", app.paint("No activity in this period", Color::DIM));
        return Ok(());
    }

    println!(
        "  - {} problems solved across {} active days",
        app.paint(&summary.total.to_string(), Color::GREEN),
        app.paint(&summary.active_days.to_string(), Color::YELLOW)
    );
    println!(
        "  - Average: {} problems per active day",
        app.paint(&format!("{:.1}", summary.average_per_active_day), Color::CYAN)
    );
    if summary.best_streak > 1 {
        println!(
            "  - Best streak: {} consecutive days",
            app.paint(&summary.best_streak.to_string(), Color::MAGENTA)
        );
    }
    if let Some((date, count)) = summary.most_active.filter(|(_, count)| *count > 1) {
        println!(
            "  - Most active day: {} with {} problems",
            app.paint(&date.format("%b %d").to_string(), Color::BLUE),
            app.paint(&count.to_string(), Color::GREEN)
        );
    }

    Ok(())
}
