use crate::error::{ProgramError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One set of a program week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetPrescription {
    /// Fraction of the reference max.
    pub percent_of_max: f64,
    pub target_reps: u32,
    pub rest_minutes: u32,
    pub note: Option<&'static str>,
}

const fn set(
    percent_of_max: f64,
    target_reps: u32,
    rest_minutes: u32,
    note: Option<&'static str>,
) -> SetPrescription {
    SetPrescription {
        percent_of_max,
        target_reps,
        rest_minutes,
        note,
    }
}

const AMRAP: Option<&str> = Some("AMRAP");

static WEEKS: [[SetPrescription; 3]; 4] = [
    // 5s week
    [
        set(0.65, 5, 1, None),
        set(0.75, 5, 1, None),
        set(0.85, 5, 3, AMRAP),
    ],
    // 3s week
    [
        set(0.70, 3, 1, None),
        set(0.80, 3, 1, None),
        set(0.90, 3, 3, AMRAP),
    ],
    // 5/3/1 week
    [
        set(0.75, 5, 1, None),
        set(0.85, 3, 1, None),
        set(0.95, 1, 3, AMRAP),
    ],
    // Deload
    [
        set(0.40, 5, 1, None),
        set(0.50, 5, 1, None),
        set(0.60, 5, 1, None),
    ],
];

/// A week of the four week 5/3/1 cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Week(u32);

impl Week {
    pub const FIRST: Week = Week(1);
    pub const DELOAD: Week = Week(4);

    pub fn new(week: u32) -> Result<Self> {
        if (1..=4).contains(&week) {
            Ok(Week(week))
        } else {
            Err(ProgramError::InvalidWeek(week.to_string()))
        }
    }

    /// Read a week from a sheet value such as `3` or `3.0`.
    pub fn from_f64(value: f64) -> Result<Self> {
        if value.fract() == 0.0 && (1.0..=4.0).contains(&value) {
            Ok(Week(value as u32))
        } else {
            Err(ProgramError::InvalidWeek(value.to_string()))
        }
    }

    pub fn number(self) -> u32 {
        self.0
    }

    /// The week after this one; the deload wraps back to week 1.
    pub fn next(self) -> Week {
        Week(self.0 % 4 + 1)
    }

    pub fn previous(self) -> Week {
        Week((self.0 + 2) % 4 + 1)
    }

    pub fn is_deload(self) -> bool {
        self == Week::DELOAD
    }
}

impl TryFrom<u32> for Week {
    type Error = ProgramError;

    fn try_from(week: u32) -> Result<Self> {
        Week::new(week)
    }
}

impl From<Week> for u32 {
    fn from(w: Week) -> Self {
        w.0
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The prescribed sets for `week`.
pub fn lookup(week: Week) -> &'static [SetPrescription] {
    &WEEKS[(week.0 - 1) as usize]
}

/// Like [`lookup`] for an unvalidated week number.
#[cfg(test)]
pub fn lookup_number(week: u32) -> Result<&'static [SetPrescription]> {
    Week::new(week).map(lookup)
}
