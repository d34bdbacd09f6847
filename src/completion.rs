//! Keeps the Completed checkbox and the Completed Reps count of a set in
//! agreement after the user edits either of them.

use crate::columns::CompletionColumns;
use crate::error::Result;
use crate::sheet::{CellAddress, CellValue, SheetStore};

/// Which of the synchronized cells the user edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditedField {
    CompletedReps,
    Completed,
}

/// Current values of one set row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowState {
    pub expected_reps: f64,
    pub completed_reps: f64,
    pub completed: bool,
}

/// The single write a sync may perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncAction {
    MarkCompleted,
    MarkIncomplete,
    BackfillReps(f64),
}

impl SyncAction {
    pub fn apply(self, state: RowState) -> RowState {
        match self {
            SyncAction::MarkCompleted => RowState {
                completed: true,
                ..state
            },
            SyncAction::MarkIncomplete => RowState {
                completed: false,
                ..state
            },
            SyncAction::BackfillReps(reps) => RowState {
                completed_reps: reps,
                ..state
            },
        }
    }
}

pub fn decide(edited: EditedField, state: RowState) -> Option<SyncAction> {
    match edited {
        EditedField::CompletedReps if state.completed_reps >= state.expected_reps => {
            Some(SyncAction::MarkCompleted)
        }
        EditedField::CompletedReps if state.completed => Some(SyncAction::MarkIncomplete),
        EditedField::Completed if state.completed && state.completed_reps < state.expected_reps => {
            Some(SyncAction::BackfillReps(state.expected_reps))
        }
        _ => None,
    }
}

/// Apply the completion rule to `row` after an edit in column `col`.
///
/// Returns the action taken, if any. The header row, columns other than the
/// two synchronized ones and rows without a numeric Expected Reps are left
/// alone.
pub fn sync_row<S: SheetStore + ?Sized>(
    sheet: &mut S,
    row: usize,
    col: usize,
) -> Result<Option<SyncAction>> {
    if row <= 1 {
        return Ok(None);
    }
    let cols = CompletionColumns::resolve(sheet)?;
    let edited = if col == cols.completed_reps {
        EditedField::CompletedReps
    } else if col == cols.completed {
        EditedField::Completed
    } else {
        return Ok(None);
    };

    let Some(expected_reps) = sheet
        .read_cell(CellAddress::new(row, cols.expected_reps))
        .as_f64()
    else {
        log::debug!("Row {row} of \"{}\" is not a set, skipping sync", sheet.name());
        return Ok(None);
    };
    let state = RowState {
        expected_reps,
        completed_reps: sheet
            .read_cell(CellAddress::new(row, cols.completed_reps))
            .as_f64()
            .unwrap_or(0.0),
        completed: sheet
            .read_cell(CellAddress::new(row, cols.completed))
            .as_bool(),
    };

    let action = decide(edited, state);
    if let Some(a) = action {
        let next = a.apply(state);
        match a {
            SyncAction::MarkCompleted | SyncAction::MarkIncomplete => {
                sheet.write_cell(CellAddress::new(row, cols.completed), next.completed.into())
            }
            SyncAction::BackfillReps(_) => sheet.write_cell(
                CellAddress::new(row, cols.completed_reps),
                CellValue::Number(next.completed_reps),
            ),
        }
        log::debug!("Row {row} of \"{}\": {a:?}", sheet.name());
    }
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::WORKOUT_HEADERS;
    use crate::sheet::Sheet;

    const COMPLETED_REPS_COL: usize = 7;
    const COMPLETED_COL: usize = 8;

    fn state(expected_reps: f64, completed_reps: f64, completed: bool) -> RowState {
        RowState {
            expected_reps,
            completed_reps,
            completed,
        }
    }

    fn sheet_with_set(expected: u32, done: u32, completed: bool) -> Sheet {
        let header: Vec<CellValue> = WORKOUT_HEADERS.iter().map(|h| (*h).into()).collect();
        let set = vec![
            1u32.into(),
            "01/01/2024".into(),
            "Curl".into(),
            20.0.into(),
            1u32.into(),
            expected.into(),
            done.into(),
            completed.into(),
        ];
        Sheet::with_rows("Accessory Exercises", vec![header, set])
    }

    fn completed(sheet: &Sheet) -> bool {
        sheet.read_cell(CellAddress::new(2, COMPLETED_COL)).as_bool()
    }

    fn reps(sheet: &Sheet) -> Option<f64> {
        sheet.read_cell(CellAddress::new(2, COMPLETED_REPS_COL)).as_f64()
    }

    fn edit(sheet: &mut Sheet, col: usize, value: CellValue) -> Option<SyncAction> {
        sheet.write_cell(CellAddress::new(2, col), value);
        sync_row(sheet, 2, col).unwrap()
    }

    #[test]
    fn reaching_expected_reps_completes() {
        assert_eq!(
            decide(EditedField::CompletedReps, state(8.0, 8.0, false)),
            Some(SyncAction::MarkCompleted)
        );
        assert_eq!(
            decide(EditedField::CompletedReps, state(8.0, 10.0, false)),
            Some(SyncAction::MarkCompleted)
        );
    }

    #[test]
    fn dropping_below_expected_reps_reverts() {
        assert_eq!(
            decide(EditedField::CompletedReps, state(8.0, 6.0, true)),
            Some(SyncAction::MarkIncomplete)
        );
        assert_eq!(decide(EditedField::CompletedReps, state(8.0, 6.0, false)), None);
    }

    #[test]
    fn checking_completed_backfills_reps() {
        assert_eq!(
            decide(EditedField::Completed, state(8.0, 5.0, true)),
            Some(SyncAction::BackfillReps(8.0))
        );
        assert_eq!(decide(EditedField::Completed, state(8.0, 9.0, true)), None);
        assert_eq!(decide(EditedField::Completed, state(8.0, 5.0, false)), None);
    }

    #[test]
    fn decisions_are_idempotent() {
        let fields = [EditedField::CompletedReps, EditedField::Completed];
        for field in fields {
            for expected in [1.0, 5.0, 8.0] {
                for done in [0.0, 1.0, 5.0, 8.0, 12.0] {
                    for checked in [false, true] {
                        let start = state(expected, done, checked);
                        let once = decide(field, start).map_or(start, |a| a.apply(start));
                        let twice = decide(field, once).map_or(once, |a| a.apply(once));
                        assert_eq!(once, twice, "{field:?} {start:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn completed_implies_enough_reps_after_any_edit() {
        let fields = [EditedField::CompletedReps, EditedField::Completed];
        for field in fields {
            for done in 0..=12 {
                for checked in [false, true] {
                    let start = state(8.0, done as f64, checked);
                    let end = decide(field, start).map_or(start, |a| a.apply(start));
                    if end.completed {
                        assert!(end.completed_reps >= end.expected_reps, "{field:?} {start:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn edit_scenario_completes_then_reverts() {
        let mut sheet = sheet_with_set(8, 5, false);
        assert_eq!(
            edit(&mut sheet, COMPLETED_REPS_COL, 8u32.into()),
            Some(SyncAction::MarkCompleted)
        );
        assert!(completed(&sheet));
        assert_eq!(
            edit(&mut sheet, COMPLETED_REPS_COL, 6u32.into()),
            Some(SyncAction::MarkIncomplete)
        );
        assert!(!completed(&sheet));
        assert_eq!(reps(&sheet), Some(6.0));
    }

    #[test]
    fn checking_the_box_fills_in_reps() {
        let mut sheet = sheet_with_set(8, 5, false);
        assert_eq!(
            edit(&mut sheet, COMPLETED_COL, true.into()),
            Some(SyncAction::BackfillReps(8.0))
        );
        assert_eq!(reps(&sheet), Some(8.0));
        assert!(completed(&sheet));
        // Same edit again changes nothing.
        assert_eq!(edit(&mut sheet, COMPLETED_COL, true.into()), None);
        assert_eq!(reps(&sheet), Some(8.0));
    }

    #[test]
    fn header_row_and_other_columns_are_ignored() {
        let mut sheet = sheet_with_set(8, 5, false);
        assert_eq!(sync_row(&mut sheet, 1, COMPLETED_REPS_COL).unwrap(), None);
        assert_eq!(sync_row(&mut sheet, 2, 3).unwrap(), None);
        assert!(!completed(&sheet));
    }

    #[test]
    fn rows_without_expected_reps_are_skipped() {
        let mut sheet = sheet_with_set(8, 5, false);
        sheet.write_cell(CellAddress::new(9, COMPLETED_REPS_COL), 3u32.into());
        assert_eq!(sync_row(&mut sheet, 9, COMPLETED_REPS_COL).unwrap(), None);
        assert_eq!(sheet.read_cell(CellAddress::new(9, COMPLETED_COL)), CellValue::Empty);
    }

    #[test]
    fn sync_needs_headers() {
        let mut sheet = Sheet::with_rows("Notes", vec![vec!["Note".into()]]);
        assert!(sync_row(&mut sheet, 2, 1).is_err());
    }
}
