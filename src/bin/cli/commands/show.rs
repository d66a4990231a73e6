use anyhow::Result;

use srl_lib::problems::PoolKind;
use srl_lib::tracker::{NextReview, ProblemView, Selector};

use crate::app::App;
use crate::render::terminal::{long_date, plural, stars, Color};

pub fn run(app: &App, selector: Selector, compact: bool) -> Result<()> {
    let Some(view) = app.check(app.tracker.find_problem(&selector))? else {
        return Ok(());
    };

    let mut header = format!("Problem: {}", view.name);
    if let Some(id) = view.record.external_id {
        header.push_str(&format!(" (#{})", id));
    }
    println!();
    println!("{}", app.paint(&header, Color::CYAN));

    let status_color = match view.status {
        PoolKind::Mastered => Color::GREEN,
        PoolKind::InProgress => Color::YELLOW,
    };
    println!("Status: {}", app.paint(&view.status.to_string(), status_color));

    if let (Some(next), Some(due)) = (view.next_review, view.due_date) {
        let text = match next {
            NextReview::InDays(days) => {
                app.paint(&format!("{} (in {})", due, plural(days, "day")), Color::CYAN)
            }
            NextReview::Today => app.paint("Today", Color::YELLOW),
            NextReview::OverdueBy(days) => {
                app.paint(&format!("Overdue by {}", plural(days, "day")), Color::RED)
            }
        };
        println!("Next Review: {}", text);
    }
    println!();

    if view.record.history.is_empty() {
        println!("{}", app.paint("No history available", Color::YELLOW));
        return Ok(());
    }

    if compact {
        print_compact(app, &view);
    } else {
        print_history(app, &view);
    }

    Ok(())
}

fn print_history(app: &App, view: &ProblemView) {
    println!(
        "{}",
        app.paint(&format!("History ({})", view.record.history.len()), Color::BOLD)
    );
    for (i, attempt) in view.record.history.iter().enumerate() {
        let mut line = format!("{:>3}. {}  {:<5}", i + 1, attempt.date, stars(attempt.rating));
        if let Some(minutes) = attempt.time_spent {
            line.push_str(&format!("  {}", app.paint(&format!("{}m", minutes), Color::MAGENTA)));
        }
        println!("{}", line);
        if let Some(note) = &attempt.note {
            println!("       note: {}", note);
        }
        if let Some(mistake) = &attempt.mistake {
            println!("       mistake: {}", app.paint(mistake, Color::RED));
        }
    }
}

fn print_compact(app: &App, view: &ProblemView) {
    println!("{}", app.paint("Showing attempts with notes/mistakes only", Color::DIM));
    println!();

    let noted = view.noted_attempts();
    if noted.is_empty() {
        println!("{}", app.paint("No attempts with notes or mistakes to show", Color::DIM));
        println!();
        return;
    }

    let mut last_date = None;
    for (index, attempt) in &noted {
        if last_date != Some(attempt.date) {
            if last_date.is_some() {
                println!();
            }
            println!("{}", app.paint(&long_date(attempt.date), Color::BLUE));
            last_date = Some(attempt.date);
        }

        let mut line = format!("  {} {}", app.paint(&format!("#{}", index), Color::DIM), stars(attempt.rating));
        if let Some(minutes) = attempt.time_spent {
            line.push_str(&format!(" {}", app.paint(&format!("{}m", minutes), Color::MAGENTA)));
        }
        println!("{}", line);
        if let Some(note) = &attempt.note {
            println!("    note: {}", note);
        }
        if let Some(mistake) = &attempt.mistake {
            println!("    mistake: {}", app.paint(mistake, Color::RED));
        }
    }

    println!();
    println!(
        "{}",
        app.paint(
            &format!(
                "Showing {}/{} attempts, average rating {:.1}",
                noted.len(),
                view.record.history.len(),
                view.record.average_rating().unwrap_or(0.0)
            ),
            Color::DIM
        )
    );
    println!();
}
