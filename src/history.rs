//! Reading back what was logged for a lift.
//!
//! Only the last contiguous block of rows for a lift counts as its history:
//! that block is the most recent session.

use crate::columns::HistoryColumns;
use crate::error::{ProgramError, Result};
use crate::percentages::Week;
use crate::sheet::{CellAddress, CellValue, SheetStore};

/// Positions in `exercises` of the last contiguous block equal to `lift`,
/// in chronological order.
pub fn recent_run_indices(exercises: &[CellValue], lift: &str) -> Vec<usize> {
    let mut run = Vec::new();
    for (i, value) in exercises.iter().enumerate().rev() {
        if value.as_text() == lift {
            run.push(i);
        } else if !run.is_empty() {
            break;
        }
    }
    run.reverse();
    run
}

/// The most recent session of one lift on a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct LiftHistory {
    rows: Vec<usize>,
    weeks: Vec<CellValue>,
    weights: Vec<CellValue>,
}

impl LiftHistory {
    pub fn read<S: SheetStore + ?Sized>(sheet: &S, lift: &str) -> Result<Self> {
        let cols = HistoryColumns::resolve(sheet)?;
        let data_rows = sheet.last_row().saturating_sub(1);
        let exercises = sheet.read_column(2, cols.exercise, data_rows);
        let rows: Vec<usize> = recent_run_indices(&exercises, lift)
            .into_iter()
            .map(|i| i + 2)
            .collect();
        let weeks = rows
            .iter()
            .map(|&r| sheet.read_cell(CellAddress::new(r, cols.week)))
            .collect();
        let weights = rows
            .iter()
            .map(|&r| sheet.read_cell(CellAddress::new(r, cols.weight)))
            .collect();
        log::debug!(
            "{} has {} row(s) in its last session on \"{}\"",
            lift,
            rows.len(),
            sheet.name()
        );
        Ok(Self {
            rows,
            weeks,
            weights,
        })
    }

    /// Sheet row numbers of the session, oldest first.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Week the session was logged in, `None` before the first session.
    pub fn last_week(&self) -> Result<Option<Week>> {
        let Some(first) = self.weeks.first() else {
            return Ok(None);
        };
        let week = first
            .as_f64()
            .ok_or_else(|| ProgramError::InvalidWeek(first.as_text()))?;
        Week::from_f64(week).map(Some)
    }

    /// Week of the next session; the cycle starts over after the deload
    /// whether or not it was completed.
    pub fn next_week(&self) -> Result<Week> {
        Ok(self.last_week()?.map_or(Week::FIRST, Week::next))
    }

    /// Weight of every set of the session, unreadable cells as 0.
    pub fn last_weights(&self) -> Vec<f64> {
        self.weights
            .iter()
            .map(|w| w.as_f64().unwrap_or(0.0))
            .collect()
    }
}
