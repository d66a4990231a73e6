use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{heading, Color};

pub enum NextUpAction {
    Add(String),
    Remove(String),
    List,
    Clear,
}

pub fn run(app: &App, action: NextUpAction) -> Result<()> {
    match action {
        NextUpAction::Add(name) => match app.check(app.tracker.add_next_up(&name))? {
            Some(true) => println!("Added '{}' to Next Up", app.paint(&name, Color::CYAN)),
            Some(false) => println!("'{}' is already in Next Up", name),
            None => {}
        },
        NextUpAction::Remove(name) => {
            if let Some(removed) = app.check(app.tracker.remove_next_up(&name))? {
                println!("Removed '{}' from Next Up", app.paint(&removed, Color::CYAN));
            }
        }
        NextUpAction::List => {
            let Some(names) = app.check(app.tracker.next_up())? else {
                return Ok(());
            };
            if names.is_empty() {
                println!("{}", app.paint("Next Up is empty.", Color::YELLOW));
                return Ok(());
            }
            println!("{}", heading(&format!("Next Up ({})", names.len()), app.use_color));
            for (i, name) in names.iter().enumerate() {
                println!("{}. {}", i + 1, name);
            }
        }
        NextUpAction::Clear => {
            if let Some(count) = app.check(app.tracker.clear_next_up())? {
                println!("Cleared {} problem(s) from Next Up", count);
            }
        }
    }

    Ok(())
}
