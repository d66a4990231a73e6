mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use srl_lib::backup::{ExportOptions, ImportMode};
use srl_lib::tracker::Selector;

use commands::add::AddOptions;
use commands::audit::AuditAction;
use commands::nextup::NextUpAction;

#[derive(Parser)]
#[command(name = "srl", about = "Spaced repetition tracker for practice problems", version)]
struct Cli {
    /// Directory holding the tracker's JSON files
    #[arg(long, global = true, env = "SRL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Record an attempt: `add "Two Sum" 4`, `add -n 2 5` or `add --leetcode-id 1 3`
    Add {
        /// Problem name followed by the rating (1-5), or only the rating
        #[arg(required = true, num_args = 1..=2)]
        args: Vec<String>,
        /// Problem number from `srl list`
        #[arg(short = 'n', long = "number")]
        number: Option<usize>,
        /// Select the problem by its LeetCode ID
        #[arg(long)]
        leetcode_id: Option<i64>,
        /// LeetCode ID to store on the problem (when adding by name)
        #[arg(long)]
        id: Option<i64>,
        /// Note about the solution or approach
        #[arg(long)]
        note: Option<String>,
        /// What went wrong or what to watch out for
        #[arg(long)]
        mistake: Option<String>,
        /// Time spent in minutes
        #[arg(long)]
        time: Option<u32>,
    },

    /// List problems due for review
    List {
        /// Maximum number of problems
        #[arg(short = 'n')]
        limit: Option<usize>,
    },

    /// Show a problem's history and notes
    Show {
        /// Problem name
        name: Option<String>,
        /// Problem number from `srl list`
        #[arg(short = 'n', long = "number", conflicts_with = "name")]
        number: Option<usize>,
        /// LeetCode problem ID
        #[arg(long, conflicts_with_all = ["name", "number"])]
        leetcode_id: Option<i64>,
        /// Only attempts with notes or mistakes
        #[arg(long)]
        compact: bool,
    },

    /// List problems in progress
    Inprogress,

    /// List mastered problems
    Mastered {
        /// Only print the number of mastered problems
        #[arg(short = 'c', long = "count")]
        count: bool,
    },

    /// Manage the next-up queue
    #[command(subcommand)]
    Nextup(NextUpCommand),

    /// Start, show or resolve a retention audit
    Audit {
        /// Pass the current audit
        #[arg(long = "pass", conflicts_with = "fail")]
        pass: bool,
        /// Fail the current audit
        #[arg(long = "fail")]
        fail: bool,
    },

    /// Export your progress to a JSON file
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
        /// Include configuration settings
        #[arg(long)]
        include_config: bool,
        /// Include audit history
        #[arg(long)]
        include_audit: bool,
        /// Export only mastered problems
        #[arg(long, conflicts_with = "progress_only")]
        mastered_only: bool,
        /// Export only problems in progress
        #[arg(long)]
        progress_only: bool,
    },

    /// Import progress from an export file
    Import {
        /// Import file path
        #[arg(short, long)]
        file: PathBuf,
        /// Merge with existing data instead of replacing it
        #[arg(long)]
        merge: bool,
        /// Show what would be imported without making changes
        #[arg(long)]
        dry_run: bool,
    },

    /// Summarise practice activity
    Activity {
        /// Number of months to cover
        #[arg(short, long, default_value_t = srl_lib::activity::DEFAULT_MONTHS)]
        months: u32,
    },

    /// Show or change configuration
    Config {
        /// Probability (0-1) of a random audit when listing problems
        #[arg(long)]
        audit_probability: Option<f64>,
    },
}

#[derive(Subcommand)]
enum NextUpCommand {
    /// Queue a problem
    Add { name: String },
    /// Remove a problem from the queue
    Remove { name: String },
    /// List the queue
    List,
    /// Empty the queue
    Clear,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let mut app = app::App::new(cli.data_dir, use_color)?;

    match cli.command {
        Command::Add { args, number, leetcode_id, id, note, mistake, time } => {
            let options = AddOptions { args, number, leetcode_id, id, note, mistake, time };
            commands::add::run(&app, options)?;
        }
        Command::List { limit } => {
            commands::list::run(&mut app, limit, &cli.format)?;
        }
        Command::Show { name, number, leetcode_id, compact } => {
            let selector = match (name, number, leetcode_id) {
                (_, Some(number), _) => Selector::ByIndex(number),
                (_, _, Some(id)) => Selector::ByExternalId(id),
                (Some(name), _, _) => Selector::ByName(name),
                (None, None, None) => {
                    anyhow::bail!("Give a problem name, -n <number> or --leetcode-id <id>")
                }
            };
            commands::show::run(&app, selector, compact)?;
        }
        Command::Inprogress => {
            commands::inprogress::run(&mut app, &cli.format)?;
        }
        Command::Mastered { count } => {
            commands::mastered::run(&app, count, &cli.format)?;
        }
        Command::Nextup(subcmd) => {
            let action = match subcmd {
                NextUpCommand::Add { name } => NextUpAction::Add(name),
                NextUpCommand::Remove { name } => NextUpAction::Remove(name),
                NextUpCommand::List => NextUpAction::List,
                NextUpCommand::Clear => NextUpAction::Clear,
            };
            commands::nextup::run(&app, action)?;
        }
        Command::Audit { pass, fail } => {
            let action = if pass {
                AuditAction::Pass
            } else if fail {
                AuditAction::Fail
            } else {
                AuditAction::Show
            };
            commands::audit::run(&mut app, action)?;
        }
        Command::Export { output, include_config, include_audit, mastered_only, progress_only } => {
            let options = ExportOptions {
                export_type: commands::export::export_type(mastered_only, progress_only),
                include_config,
                include_audit,
            };
            commands::export::run(&app, &output, options)?;
        }
        Command::Import { file, merge, dry_run } => {
            let mode = if merge { ImportMode::Merge } else { ImportMode::Replace };
            commands::import::run(&app, &file, mode, dry_run)?;
        }
        Command::Activity { months } => {
            commands::activity::run(&app, months)?;
        }
        Command::Config { audit_probability } => {
            commands::config::run(&app, audit_probability)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
