use anyhow::Result;

use srl_lib::tracker::AuditTrigger;

use crate::app::App;
use crate::render::terminal::Color;

pub enum AuditAction {
    Show,
    Pass,
    Fail,
}

pub fn run(app: &mut App, action: AuditAction) -> Result<()> {
    match action {
        AuditAction::Pass => {
            if let Some(problem) = app.check(app.tracker.pass_audit())? {
                println!("{} ({})", app.paint("Audit passed!", Color::GREEN), problem);
            }
        }
        AuditAction::Fail => {
            if let Some(problem) = app.check(app.tracker.fail_audit())? {
                println!(
                    "{} '{}' moved back to in-progress.",
                    app.paint("Audit failed.", Color::RED),
                    problem
                );
            }
        }
        AuditAction::Show => {
            let result = app.tracker.start_audit();
            let Some(trigger) = app.check(result)? else {
                return Ok(());
            };
            match trigger {
                AuditTrigger::Pending(problem) => print_pending(app, &problem),
                AuditTrigger::Started(problem) => {
                    println!("You are now being audited on: {}", app.paint(&problem, Color::CYAN));
                    println!("Run with --pass or --fail to complete the audit.");
                }
                AuditTrigger::NoMastered | AuditTrigger::NotDrawn => {
                    println!("{}", app.paint("No mastered problems available for audit.", Color::YELLOW));
                }
            }
        }
    }

    Ok(())
}

/// Run the random audit trigger before a listing.
///
/// Errors are reported and treated as no audit.
pub fn maybe_trigger(app: &mut App) -> Result<AuditTrigger> {
    let result = app.tracker.maybe_start_audit();
    Ok(app.check(result)?.unwrap_or(AuditTrigger::NotDrawn))
}

/// Print the banner for a listing's audit trigger.
///
/// Returns true if a new audit started and the listing should be skipped.
pub fn announce(app: &App, trigger: &AuditTrigger) -> bool {
    match trigger {
        AuditTrigger::Started(problem) => {
            println!("{}", app.paint("You have been randomly audited!", Color::RED));
            println!("Audit problem: {}", app.paint(problem, Color::CYAN));
            println!("Run `srl audit --pass` or `srl audit --fail` when done");
            true
        }
        AuditTrigger::Pending(problem) => {
            print_pending(app, problem);
            false
        }
        AuditTrigger::NotDrawn | AuditTrigger::NoMastered => false,
    }
}

/// Reminder shown while an audit is waiting for a result
fn print_pending(app: &App, problem: &str) {
    println!(
        "{} {}",
        app.paint("PENDING AUDIT:", Color::YELLOW),
        app.paint(problem, Color::CYAN)
    );
    println!("  Complete it, then run `srl audit --pass` if you solved it or `srl audit --fail` if you couldn't");
    println!();
}
