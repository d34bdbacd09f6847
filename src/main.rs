//! Command line front end: loads the workbook, delivers one edit or command
//! and saves the result.

use chrono::Local;
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use std::process;

mod columns;
mod completion;
mod config;
mod dispatch;
mod error;
mod formula;
mod generator;
mod history;
mod lifts;
mod percentages;
mod sheet;
mod workbook;

use config::ProgramConfig;
use dispatch::{Command, Dispatcher, EditEvent, Outcome};
use error::{ProgramError, Result};
use history::LiftHistory;
use percentages::Week;
use sheet::{CellAddress, CellValue, SheetStore};
use workbook::Workbook;

/// Generate 5/3/1 and accessory sets in a CSV workbook.
#[derive(Parser)]
#[command(name = "five-three-one", version, about)]
struct Cli {
    /// Workbook directory (defaults to the configured one, then ./workbook)
    #[arg(long, global = true)]
    workbook: Option<PathBuf>,

    /// Configuration file to use instead of the one in the config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a workbook with the program sheets
    Init {
        /// Replace an existing workbook
        #[arg(long)]
        force: bool,
    },
    /// Append the next main lift workout for the selected lift
    StartWorkout,
    /// Append accessory sets for the selected accessory lift
    Accessory,
    /// Set a cell and react to the edit
    Edit {
        sheet: String,
        /// Cell in A1 notation, e.g. G12
        cell: String,
        value: String,
    },
    /// Show or extend a lift dropdown
    Lifts {
        #[command(subcommand)]
        action: LiftsAction,
    },
    /// Print the sets of a week for a reference max
    Plan {
        #[arg(long)]
        max: f64,
        #[arg(long, default_value_t = 1)]
        week: u32,
    },
    /// Print the week the next session of a main lift will use
    NextWeek { lift: String },
}

#[derive(Subcommand)]
enum LiftsAction {
    List { sheet: String },
    Add { sheet: String, name: String },
}

fn load_config(path: Option<&Path>) -> Result<ProgramConfig> {
    match path {
        Some(p) => ProgramConfig::load_from(p),
        None => Ok(ProgramConfig::load()),
    }
}

fn lift_dropdown(config: &ProgramConfig, sheet: &str) -> Result<CellAddress> {
    config
        .lift_cell_for(sheet)
        .ok_or_else(|| ProgramError::MissingSheet(sheet.to_string()))
}

fn describe(outcome: &Outcome) -> Option<String> {
    match outcome {
        Outcome::SetsAppended {
            sheet,
            lift,
            week,
            rows,
        } => Some(format!(
            "Added {} {lift} set(s) for week {week} to \"{sheet}\" (rows {})",
            rows.len(),
            rows.iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )),
        Outcome::CellSynced {
            action,
            registered_lift,
        } => {
            let mut parts = Vec::new();
            if let Some(a) = action {
                parts.push(format!("{a:?}"));
            }
            if let Some(l) = registered_lift {
                parts.push(format!("added \"{l}\" to the lift list"));
            }
            (!parts.is_empty()).then(|| parts.join(", "))
        }
    }
}

/// Lines describing `week` for a reference max.
fn format_plan(reference_max: f64, week: Week) -> Vec<String> {
    let mut lines = vec![if week.is_deload() {
        format!("Week {week} (deload)")
    } else {
        format!("Week {week}")
    }];
    let today = Local::now().date_naive();
    let sets = generator::generate_531_sets("", reference_max, week, today);
    for (p, set) in percentages::lookup(week).iter().zip(&sets) {
        let plus = if p.note == Some("AMRAP") { "+" } else { "" };
        let mut line = format!(
            "  {:>3.0}% x {}{:<2} {:>6}  rest {} min",
            p.percent_of_max * 100.0,
            p.target_reps,
            plus,
            set.weight.value(),
            p.rest_minutes
        );
        if let Some(note) = p.note {
            line.push_str("  ");
            line.push_str(note);
        }
        lines.push(line);
    }
    lines
}

fn run_command(config: &ProgramConfig, dir: &Path, command: Command) -> Result<()> {
    let mut wb = Workbook::load_dir(dir)?;
    let outcome = Dispatcher::new(config, Local::now().date_naive()).execute(&mut wb, command)?;
    wb.save_dir(dir)?;
    if let Some(text) = describe(&outcome) {
        println!("{text}");
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let dir = cli.workbook.clone().unwrap_or_else(|| config.workbook_dir());
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Init { force } => {
            if dir.join(format!("{}.csv", config.main.name)).exists() && !force {
                return Err(ProgramError::Io(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    format!("{} already holds a workbook, use --force", dir.display()),
                )));
            }
            let wb = Workbook::template(&config);
            wb.save_dir(&dir)?;
            if cli.config.is_none() {
                if let Some(path) = ProgramConfig::path().filter(|p| !p.exists()) {
                    config.save_to(&path)?;
                    info!("Wrote default configuration to {}", path.display());
                }
            }
            println!(
                "Created {} with sheets: {}",
                dir.display(),
                wb.sheet_names().join(", ")
            );
        }
        Commands::StartWorkout => {
            let command = Command::StartMainLiftWorkout {
                sheet: config.main.name.clone(),
            };
            run_command(&config, &dir, command)?;
        }
        Commands::Accessory => {
            let command = Command::StartAccessoryWorkout {
                sheet: config.accessory.name.clone(),
            };
            run_command(&config, &dir, command)?;
        }
        Commands::Edit { sheet, cell, value } => {
            let mut wb = Workbook::load_dir(&dir)?;
            let cell = CellAddress::parse(&cell)?;
            let new_value = CellValue::parse(&value);
            let target = wb.sheet_mut(&sheet)?;
            let old_value = target.read_cell(cell);
            target.write_cell(cell, new_value.clone());
            // The edit itself stays even when reacting to it fails.
            wb.save_dir(&dir)?;
            let event = EditEvent {
                sheet,
                row: cell.row,
                col: cell.col,
                old_value,
                new_value,
            };
            let outcomes = Dispatcher::new(&config, today).on_edit(&mut wb, &event)?;
            wb.save_dir(&dir)?;
            for text in outcomes.iter().filter_map(describe) {
                println!("{text}");
            }
        }
        Commands::Lifts { action } => match action {
            LiftsAction::List { sheet } => {
                let wb = Workbook::load_dir(&dir)?;
                let cell = lift_dropdown(&config, &sheet)?;
                for lift in lifts::known_lifts(wb.sheet(&sheet)?, cell)? {
                    println!("{lift}");
                }
            }
            LiftsAction::Add { sheet, name } => {
                let mut wb = Workbook::load_dir(&dir)?;
                let cell = lift_dropdown(&config, &sheet)?;
                if lifts::register_lift(wb.sheet_mut(&sheet)?, cell, &name)? {
                    wb.save_dir(&dir)?;
                    println!("Added \"{}\"", name.trim());
                } else {
                    println!("\"{}\" is already listed", name.trim());
                }
            }
        },
        Commands::Plan { max, week } => {
            let week = Week::new(week)?;
            for line in format_plan(max, week) {
                println!("{line}");
            }
        }
        Commands::NextWeek { lift } => {
            let wb = Workbook::load_dir(&dir)?;
            let main = wb.sheet(&config.main.name)?;
            let history = LiftHistory::read(main, &lift)?;
            match (history.rows().first(), history.rows().last()) {
                (Some(first), Some(last)) => println!(
                    "{lift} last trained in rows {first}-{last} with {:?}, next week is {}",
                    history.last_weights(),
                    history.next_week()?
                ),
                _ => println!("{lift} has no sessions yet, next week is 1"),
            }
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        eprintln!("error: {e}");
        process::exit(if e.is_configuration() { 2 } else { 1 });
    }
}
