//! Turning edits into commands and running them against a workbook.

use crate::columns::{self, EXERCISE};
use crate::completion::{self, SyncAction};
use crate::config::ProgramConfig;
use crate::error::{ProgramError, Result};
use crate::generator::{self, generate_531_sets, generate_accessory_sets};
use crate::history::LiftHistory;
use crate::lifts;
use crate::percentages::Week;
use crate::sheet::{CellAddress, CellValue, SheetStore};
use crate::workbook::Workbook;
use chrono::NaiveDate;

/// A cell edit as delivered by the sheet host. The edit has already been
/// applied to the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct EditEvent {
    pub sheet: String,
    pub row: usize,
    pub col: usize,
    pub old_value: CellValue,
    pub new_value: CellValue,
}

impl EditEvent {
    pub fn cell(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    StartMainLiftWorkout {
        sheet: String,
    },
    StartAccessoryWorkout {
        sheet: String,
    },
    CellChanged {
        sheet: String,
        row: usize,
        col: usize,
        old_value: CellValue,
        new_value: CellValue,
    },
}

/// Cells whose edits start something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triggers {
    pub main_sheet: String,
    pub start_workout: CellAddress,
    pub accessory_sheet: String,
    pub create_sets: CellAddress,
}

impl Triggers {
    pub fn from_config(config: &ProgramConfig) -> Self {
        Self {
            main_sheet: config.main.name.clone(),
            start_workout: config.main.start_workout_cell,
            accessory_sheet: config.accessory.name.clone(),
            create_sets: config.accessory.create_sets_cell,
        }
    }
}

/// Commands for an edit, in execution order. The completion sync always
/// runs last.
pub fn route(event: &EditEvent, triggers: &Triggers) -> Vec<Command> {
    let mut commands = Vec::new();
    if event.sheet == triggers.main_sheet && event.cell() == triggers.start_workout {
        commands.push(Command::StartMainLiftWorkout {
            sheet: event.sheet.clone(),
        });
    } else if event.sheet == triggers.accessory_sheet && event.cell() == triggers.create_sets {
        commands.push(Command::StartAccessoryWorkout {
            sheet: event.sheet.clone(),
        });
    }
    commands.push(Command::CellChanged {
        sheet: event.sheet.clone(),
        row: event.row,
        col: event.col,
        old_value: event.old_value.clone(),
        new_value: event.new_value.clone(),
    });
    log::debug!("Edit {}!{} routed to {:?}", event.sheet, event.cell(), commands);
    commands
}

/// What a command did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    SetsAppended {
        sheet: String,
        lift: String,
        week: Week,
        rows: Vec<usize>,
    },
    CellSynced {
        action: Option<SyncAction>,
        registered_lift: Option<String>,
    },
}

pub struct Dispatcher<'a> {
    config: &'a ProgramConfig,
    today: NaiveDate,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a ProgramConfig, today: NaiveDate) -> Self {
        Self { config, today }
    }

    /// Handle one edit: route it and run every resulting command.
    pub fn on_edit(&self, workbook: &mut Workbook, event: &EditEvent) -> Result<Vec<Outcome>> {
        route(event, &Triggers::from_config(self.config))
            .into_iter()
            .map(|c| self.execute(workbook, c))
            .collect()
    }

    pub fn execute(&self, workbook: &mut Workbook, command: Command) -> Result<Outcome> {
        log::info!("Running {command:?}");
        match command {
            Command::StartMainLiftWorkout { sheet } => self.start_main_lift(workbook, &sheet),
            Command::StartAccessoryWorkout { sheet } => self.start_accessory(workbook, &sheet),
            Command::CellChanged {
                sheet,
                row,
                col,
                old_value,
                new_value,
            } => {
                log::debug!(
                    "{sheet}!{}: \"{}\" -> \"{}\"",
                    CellAddress::new(row, col),
                    old_value.as_text(),
                    new_value.as_text()
                );
                self.cell_changed(workbook, &sheet, row, col)
            }
        }
    }

    fn start_main_lift(&self, workbook: &mut Workbook, sheet_name: &str) -> Result<Outcome> {
        let main = &self.config.main;
        let sheet = workbook.sheet_mut(sheet_name)?;
        let listed = lifts::known_lifts(sheet, main.lift_cell)?;
        let lift = selected_lift(sheet, main.lift_cell)?;
        if !listed.contains(&lift) {
            return Err(ProgramError::UnknownLift {
                suggestion: lifts::closest_lift(&lift, listed.iter().map(String::as_str)),
                name: lift,
            });
        }

        let max_cell = self
            .config
            .one_rep_max_cell(&lift)
            .ok_or_else(|| ProgramError::UnknownLift {
                suggestion: lifts::closest_lift(
                    &lift,
                    main.one_rep_max_cells.keys().map(String::as_str),
                ),
                name: lift.clone(),
            })?;
        let reference_max = sheet
            .read_cell(max_cell)
            .as_f64()
            .filter(|m| m.is_finite() && *m > 0.0)
            .ok_or_else(|| ProgramError::InvalidCell {
                sheet: sheet_name.to_string(),
                cell: max_cell,
                reason: format!("one-rep max of \"{lift}\" must be a positive number"),
            })?;

        let week = LiftHistory::read(sheet, &lift)?.next_week()?;
        log::info!("Starting {lift} week {week} from a max of {reference_max}");
        let rows = generate_531_sets(&lift, reference_max, week, self.today);
        let rows = generator::append_rows(sheet, &rows);
        Ok(Outcome::SetsAppended {
            sheet: sheet_name.to_string(),
            lift,
            week,
            rows,
        })
    }

    /// Week of the main lift's latest session, which the accessory work
    /// belongs to.
    fn accessory_week(&self, workbook: &Workbook) -> Result<Week> {
        let main = workbook.sheet(&self.config.main.name)?;
        let lift = selected_lift(main, self.config.main.lift_cell)?;
        let history = LiftHistory::read(main, &lift)?;
        if history.is_empty() {
            return Ok(Week::FIRST);
        }
        Ok(history.next_week()?.previous())
    }

    fn start_accessory(&self, workbook: &mut Workbook, sheet_name: &str) -> Result<Outcome> {
        let acc = &self.config.accessory;
        let week = self.accessory_week(workbook)?;
        let sheet = workbook.sheet_mut(sheet_name)?;
        let lift = selected_lift(sheet, acc.lift_cell)?;
        lifts::register_lift(sheet, acc.lift_cell, &lift)?;

        let count = sheet.read_cell(acc.set_count_cell);
        let num_sets = match count.as_f64() {
            Some(n) if n >= 1.0 && n <= f64::from(acc.plan.max_sets) && n.fract() == 0.0 => {
                n as usize
            }
            _ => {
                return Err(ProgramError::InvalidCell {
                    sheet: sheet_name.to_string(),
                    cell: acc.set_count_cell,
                    reason: format!(
                        "set count must be a whole number from 1 to {}, got \"{}\"",
                        acc.plan.max_sets,
                        count.as_text()
                    ),
                });
            }
        };

        let prior = LiftHistory::read(sheet, &lift)?.last_weights();
        log::info!("Creating {num_sets} {lift} set(s) for week {week}");
        let rows = generate_accessory_sets(&lift, num_sets, week, &prior, self.today, &acc.plan)?;
        let rows = generator::append_rows(sheet, &rows);
        Ok(Outcome::SetsAppended {
            sheet: sheet_name.to_string(),
            lift,
            week,
            rows,
        })
    }

    fn cell_changed(
        &self,
        workbook: &mut Workbook,
        sheet_name: &str,
        row: usize,
        col: usize,
    ) -> Result<Outcome> {
        let acc = &self.config.accessory;
        let sheet = workbook.sheet_mut(sheet_name)?;

        let mut registered_lift = None;
        if sheet_name == acc.name && row > 1 {
            let edited = CellAddress::new(row, col);
            if edited == acc.lift_cell || col == columns::column_index(sheet, EXERCISE)? {
                let name = sheet.read_cell(edited).as_text();
                if lifts::register_lift(sheet, acc.lift_cell, &name)? {
                    registered_lift = Some(name);
                }
            }
        }

        let action = completion::sync_row(sheet, row, col)?;
        Ok(Outcome::CellSynced {
            action,
            registered_lift,
        })
    }
}

/// The lift chosen in the dropdown at `cell`.
fn selected_lift<S: SheetStore + ?Sized>(sheet: &S, cell: CellAddress) -> Result<String> {
    let lift = sheet.read_cell(cell).as_text();
    if lift.is_empty() {
        return Err(ProgramError::InvalidCell {
            sheet: sheet.name().to_string(),
            cell,
            reason: "no lift selected".into(),
        });
    }
    Ok(lift)
}
