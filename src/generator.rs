// Module for generating workout set rows
use crate::error::{ProgramError, Result};
use crate::formula::WeightFormula;
use crate::percentages::{self, Week};
use crate::sheet::{CellValue, SheetStore};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format of the Date column.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Weight of a set, either typed in or derived from the reference max.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Weight {
    Fixed(f64),
    Formula(WeightFormula),
}

impl Weight {
    pub fn value(&self) -> f64 {
        match self {
            Weight::Fixed(w) => *w,
            Weight::Formula(f) => f.evaluate(),
        }
    }

    fn to_cell(self) -> CellValue {
        match self {
            Weight::Fixed(w) => CellValue::Number(w),
            Weight::Formula(f) => CellValue::Formula(f.render()),
        }
    }
}

/// One generated set, written as a sheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRow {
    pub week: Week,
    pub date: NaiveDate,
    pub lift: String,
    pub weight: Weight,
    pub rest_minutes: u32,
    pub expected_reps: u32,
    pub completed_reps: u32,
    pub completed: bool,
    pub note: Option<String>,
}

impl WorkoutRow {
    /// Cells in the order of [`crate::columns::WORKOUT_HEADERS`].
    pub fn to_cells(&self) -> Vec<CellValue> {
        vec![
            self.week.number().into(),
            self.date.format(DATE_FORMAT).to_string().into(),
            self.lift.as_str().into(),
            self.weight.to_cell(),
            self.rest_minutes.into(),
            self.expected_reps.into(),
            self.completed_reps.into(),
            self.completed.into(),
            self.note.clone().map(CellValue::from).unwrap_or_default(),
        ]
    }
}

/// Main lift sets for `week`, weights rounded down to the plate step.
pub fn generate_531_sets(
    lift: &str,
    reference_max: f64,
    week: Week,
    date: NaiveDate,
) -> Vec<WorkoutRow> {
    percentages::lookup(week)
        .iter()
        .map(|p| WorkoutRow {
            week,
            date,
            lift: lift.to_string(),
            weight: Weight::Formula(WeightFormula::new(reference_max, p.percent_of_max)),
            rest_minutes: p.rest_minutes,
            expected_reps: p.target_reps,
            completed_reps: 0,
            completed: false,
            note: p.note.map(str::to_string),
        })
        .collect()
}

/// What to do when an accessory session asks for more sets than the last
/// one recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MissingWeightPolicy {
    /// Use [`AccessoryPlan::default_weight`].
    #[default]
    Default,
    /// Refuse to generate the session.
    Fail,
}

/// Fixed scheme used for accessory lifts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessoryPlan {
    pub expected_reps: u32,
    pub rest_minutes: u32,
    pub default_weight: f64,
    pub missing_weight: MissingWeightPolicy,
    /// Largest set count a session may ask for.
    pub max_sets: u32,
}

impl Default for AccessoryPlan {
    fn default() -> Self {
        Self {
            expected_reps: 8,
            rest_minutes: 1,
            default_weight: 0.0,
            missing_weight: MissingWeightPolicy::Default,
            max_sets: 20,
        }
    }
}

/// Accessory sets, set `i` reusing the weight of set `i` of the last session.
pub fn generate_accessory_sets(
    lift: &str,
    num_sets: usize,
    week: Week,
    prior_weights: &[f64],
    date: NaiveDate,
    plan: &AccessoryPlan,
) -> Result<Vec<WorkoutRow>> {
    if num_sets > prior_weights.len() {
        match plan.missing_weight {
            MissingWeightPolicy::Fail if !prior_weights.is_empty() => {
                return Err(ProgramError::IndexOutOfRange {
                    lift: lift.to_string(),
                    requested: num_sets,
                    recorded: prior_weights.len(),
                });
            }
            _ => log::warn!(
                "{lift}: {} of {num_sets} set(s) have no previous weight, using {}",
                num_sets - prior_weights.len(),
                plan.default_weight
            ),
        }
    }

    Ok((0..num_sets)
        .map(|i| WorkoutRow {
            week,
            date,
            lift: lift.to_string(),
            weight: Weight::Fixed(prior_weights.get(i).copied().unwrap_or(plan.default_weight)),
            rest_minutes: plan.rest_minutes,
            expected_reps: plan.expected_reps,
            completed_reps: 0,
            completed: false,
            note: None,
        })
        .collect())
}

/// Append `rows` to the sheet, returning the row numbers written.
pub fn append_rows<S: SheetStore + ?Sized>(sheet: &mut S, rows: &[WorkoutRow]) -> Vec<usize> {
    rows.iter()
        .map(|r| {
            let cells = r.to_cells();
            log::info!(
                "Appending set to \"{}\": {}",
                sheet.name(),
                cells
                    .iter()
                    .map(CellValue::to_raw)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            sheet.append_row(cells)
        })
        .collect()
}
