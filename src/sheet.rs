//! In-memory sheet grid and the store interface the automation works against.
//!
//! Rows and columns are 1-based like in a spreadsheet; row 1 holds the
//! column headers.

use crate::error::{ProgramError, Result};
use crate::formula::WeightFormula;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

static A1_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$?([A-Za-z]{1,3})\$?([1-9][0-9]*)$").unwrap());

/// A cell position in A1 notation, e.g. `L8` is row 8, column 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellAddress {
    pub row: usize,
    pub col: usize,
}

impl CellAddress {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let caps = A1_RE
            .captures(text.trim())
            .ok_or_else(|| ProgramError::InvalidAddress(text.to_string()))?;
        let col = caps[1]
            .to_ascii_uppercase()
            .bytes()
            .fold(0usize, |acc, b| acc * 26 + (b - b'A' + 1) as usize);
        let row = caps[2]
            .parse()
            .map_err(|_| ProgramError::InvalidAddress(text.to_string()))?;
        Ok(Self { row, col })
    }
}

/// Spreadsheet column letters for a 1-based column index.
pub fn column_letters(mut col: usize) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        col -= 1;
        letters.push(b'A' + (col % 26) as u8);
        col /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row)
    }
}

impl FromStr for CellAddress {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CellAddress {
    type Error = ProgramError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<CellAddress> for String {
    fn from(a: CellAddress) -> Self {
        a.to_string()
    }
}

/// The value of a single cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    Formula(String),
}

impl CellValue {
    /// Interpret raw cell text the way a sheet would on entry.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else if trimmed.starts_with('=') {
            CellValue::Formula(trimmed.to_string())
        } else if trimmed.eq_ignore_ascii_case("true") {
            CellValue::Bool(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            CellValue::Bool(false)
        } else {
            match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => CellValue::Number(n),
                _ => CellValue::Text(raw.to_string()),
            }
        }
    }

    /// Text written back to storage; [`CellValue::parse`] reads it back
    /// unchanged.
    pub fn to_raw(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(true) => "TRUE".into(),
            CellValue::Bool(false) => "FALSE".into(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) | CellValue::Formula(s) => s.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric value, evaluating weight formulas.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse().ok().filter(|n: &f64| n.is_finite()),
            CellValue::Formula(f) => WeightFormula::parse(f)
                .map(|w| w.evaluate())
                .filter(|n| n.is_finite()),
            CellValue::Bool(_) | CellValue::Empty => None,
        }
    }

    /// Checkbox state; anything but a true value is unchecked.
    pub fn as_bool(&self) -> bool {
        match self {
            CellValue::Bool(b) => *b,
            CellValue::Text(s) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.trim().to_string(),
            other => other.to_raw(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::from(s.as_str())
    }
}

/// Operations the automation needs from a sheet.
pub trait SheetStore {
    fn name(&self) -> &str;

    fn read_cell(&self, addr: CellAddress) -> CellValue;

    fn read_row(&self, row: usize) -> Vec<CellValue>;

    /// `count` cells of column `col`, starting at `row_start`.
    fn read_column(&self, row_start: usize, col: usize, count: usize) -> Vec<CellValue>;

    /// Write `values` below the last non-empty row and return its row number.
    fn append_row(&mut self, values: Vec<CellValue>) -> usize;

    fn write_cell(&mut self, addr: CellAddress, value: CellValue);

    /// The last row holding any value, 0 for an empty sheet.
    fn last_row(&self) -> usize;

    fn allowed_values(&self, cell: CellAddress) -> Option<Vec<String>>;

    fn set_allowed_values(&mut self, cell: CellAddress, values: Vec<String>);

    fn header_row(&self) -> Vec<String> {
        self.read_row(1).iter().map(CellValue::as_text).collect()
    }
}

/// A named grid of cells with optional dropdowns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
    dropdowns: BTreeMap<CellAddress, Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            rows,
            ..Self::new(name)
        }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn dropdowns(&self) -> &BTreeMap<CellAddress, Vec<String>> {
        &self.dropdowns
    }
}

impl SheetStore for Sheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_cell(&self, addr: CellAddress) -> CellValue {
        if addr.row == 0 || addr.col == 0 {
            return CellValue::Empty;
        }
        self.rows
            .get(addr.row - 1)
            .and_then(|r| r.get(addr.col - 1))
            .cloned()
            .unwrap_or_default()
    }

    fn read_row(&self, row: usize) -> Vec<CellValue> {
        if row == 0 {
            return Vec::new();
        }
        self.rows.get(row - 1).cloned().unwrap_or_default()
    }

    fn read_column(&self, row_start: usize, col: usize, count: usize) -> Vec<CellValue> {
        (row_start..row_start + count)
            .map(|row| self.read_cell(CellAddress::new(row, col)))
            .collect()
    }

    fn append_row(&mut self, values: Vec<CellValue>) -> usize {
        let row = self.last_row() + 1;
        self.rows.truncate(row - 1);
        self.rows.resize_with(row - 1, Vec::new);
        self.rows.push(values);
        row
    }

    fn write_cell(&mut self, addr: CellAddress, value: CellValue) {
        if addr.row == 0 || addr.col == 0 {
            return;
        }
        if self.rows.len() < addr.row {
            self.rows.resize_with(addr.row, Vec::new);
        }
        let row = &mut self.rows[addr.row - 1];
        if row.len() < addr.col {
            row.resize_with(addr.col, CellValue::default);
        }
        row[addr.col - 1] = value;
    }

    fn last_row(&self) -> usize {
        self.rows
            .iter()
            .rposition(|r| r.iter().any(|c| !c.is_empty()))
            .map_or(0, |i| i + 1)
    }

    fn allowed_values(&self, cell: CellAddress) -> Option<Vec<String>> {
        self.dropdowns.get(&cell).cloned()
    }

    fn set_allowed_values(&mut self, cell: CellAddress, values: Vec<String>) {
        self.dropdowns.insert(cell, values);
    }
}
