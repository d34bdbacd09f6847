use crate::error::{ProgramError, Result};
use crate::sheet::SheetStore;

pub const WEEK: &str = "Week";
pub const DATE: &str = "Date";
pub const EXERCISE: &str = "Exercise";
pub const WEIGHT: &str = "Weight";
pub const REST: &str = "Rest (min)";
pub const EXPECTED_REPS: &str = "Expected Reps";
pub const COMPLETED_REPS: &str = "Completed Reps";
pub const COMPLETED: &str = "Completed";
pub const NOTES: &str = "Notes";

/// Header row of a workout sheet, in the order generated rows are written.
pub const WORKOUT_HEADERS: [&str; 9] = [
    WEEK,
    DATE,
    EXERCISE,
    WEIGHT,
    REST,
    EXPECTED_REPS,
    COMPLETED_REPS,
    COMPLETED,
    NOTES,
];

/// 1-based position of the first header equal to `name`.
pub fn column_index<S: SheetStore + ?Sized>(sheet: &S, name: &str) -> Result<usize> {
    sheet
        .header_row()
        .iter()
        .position(|h| h == name)
        .map(|i| i + 1)
        .ok_or_else(|| ProgramError::MissingHeader {
            sheet: sheet.name().to_string(),
            header: name.to_string(),
        })
}

/// Columns the completion rule works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionColumns {
    pub expected_reps: usize,
    pub completed_reps: usize,
    pub completed: usize,
}

impl CompletionColumns {
    pub fn resolve<S: SheetStore + ?Sized>(sheet: &S) -> Result<Self> {
        Ok(Self {
            expected_reps: column_index(sheet, EXPECTED_REPS)?,
            completed_reps: column_index(sheet, COMPLETED_REPS)?,
            completed: column_index(sheet, COMPLETED)?,
        })
    }
}

/// Columns the history reader works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryColumns {
    pub exercise: usize,
    pub week: usize,
    pub weight: usize,
}

impl HistoryColumns {
    pub fn resolve<S: SheetStore + ?Sized>(sheet: &S) -> Result<Self> {
        Ok(Self {
            exercise: column_index(sheet, EXERCISE)?,
            week: column_index(sheet, WEEK)?,
            weight: column_index(sheet, WEIGHT)?,
        })
    }
}
