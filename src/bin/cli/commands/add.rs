use anyhow::{bail, Result};

use srl_lib::tracker::{AttemptRequest, Recorded, Selector};

use crate::app::App;
use crate::render::terminal::{plural, Color};

pub struct AddOptions {
    /// `[NAME] RATING` as given on the command line
    pub args: Vec<String>,
    pub number: Option<usize>,
    pub leetcode_id: Option<i64>,
    pub id: Option<i64>,
    pub note: Option<String>,
    pub mistake: Option<String>,
    pub time: Option<u32>,
}

pub fn run(app: &App, options: AddOptions) -> Result<()> {
    let (name, rating) = match options.args.as_slice() {
        [rating] => (None, rating),
        [name, rating] => (Some(name.clone()), rating),
        _ => bail!("Expected a problem name and a rating"),
    };
    let rating: u8 = match rating.parse() {
        Ok(r) => r,
        Err(_) => bail!("Rating must be a number from 1 to 5, got '{}'", rating),
    };

    let selector = match (name, options.number, options.leetcode_id) {
        (Some(name), None, None) => Selector::ByName(name),
        (None, Some(number), None) => Selector::ByIndex(number),
        (None, None, Some(id)) => Selector::ByExternalId(id),
        (None, None, None) => bail!("Give a problem name, -n <number> or --leetcode-id <id>"),
        _ => bail!("Use only one of: problem name, -n <number>, --leetcode-id <id>"),
    };

    let request = AttemptRequest {
        selector,
        rating,
        note: options.note,
        mistake: options.mistake,
        time_spent: options.time,
        external_id: options.id,
    };

    let Some(recorded) = app.check(app.tracker.record_attempt(request))? else {
        return Ok(());
    };

    match recorded {
        Recorded::InProgress { name, due } => {
            let days = (due - app.tracker.today()).num_days();
            println!(
                "Added rating {} for '{}' (next review {}, in {})",
                app.paint(&rating.to_string(), Color::YELLOW),
                app.paint(&name, Color::CYAN),
                due,
                plural(days, "day")
            );
        }
        Recorded::Mastered { name } => {
            println!(
                "{} moved to {}!",
                app.paint(&name, Color::GREEN),
                app.paint("mastered", Color::CYAN)
            );
        }
    }

    Ok(())
}
