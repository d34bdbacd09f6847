//! A workbook stored as a directory: one CSV file per sheet plus
//! `validations.json` holding the dropdowns.

use crate::columns::WORKOUT_HEADERS;
use crate::config::ProgramConfig;
use crate::error::{ProgramError, Result};
use crate::sheet::{CellAddress, CellValue, Sheet, SheetStore};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

const VALIDATIONS_FILE: &str = "validations.json";

type Validations = BTreeMap<String, BTreeMap<CellAddress, Vec<String>>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name()).collect()
    }

    pub fn sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| ProgramError::MissingSheet(name.to_string()))
    }

    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Sheet> {
        self.sheets
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| ProgramError::MissingSheet(name.to_string()))
    }

    /// A fresh workbook with both program sheets laid out for `config`.
    pub fn template(config: &ProgramConfig) -> Self {
        let mut main = workout_sheet(&config.main.name);
        let lifts = config.main_lifts();
        let selected = lifts.first().cloned().unwrap_or_default();
        main.write_cell(config.main.lift_cell, selected.into());
        main.set_allowed_values(config.main.lift_cell, lifts);
        main.write_cell(config.main.start_workout_cell, false.into());
        for (lift, cell) in &config.main.one_rep_max_cells {
            main.write_cell(*cell, 0u32.into());
            // Label above each one-rep-max cell unless that cell is taken.
            let label = CellAddress::new(cell.row.saturating_sub(1), cell.col);
            if label.row > 1 && main.read_cell(label).is_empty() {
                main.write_cell(label, lift.as_str().into());
            }
        }

        let acc = &config.accessory;
        let mut accessory = workout_sheet(&acc.name);
        accessory.set_allowed_values(acc.lift_cell, Vec::new());
        accessory.write_cell(acc.set_count_cell, 3u32.into());
        accessory.write_cell(acc.create_sets_cell, false.into());

        Self::new(vec![main, accessory])
    }

    /// Read every `*.csv` file in `dir` as a sheet named after the file.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        paths.sort();

        let validations_path = dir.join(VALIDATIONS_FILE);
        let mut validations: Validations = match std::fs::read_to_string(&validations_path) {
            Ok(data) => serde_json::from_str(&data)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Validations::new(),
            Err(e) => return Err(e.into()),
        };

        let mut sheets = Vec::new();
        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let mut sheet = read_sheet_csv(name, std::fs::File::open(&path)?)?;
            for (cell, values) in validations.remove(name).unwrap_or_default() {
                sheet.set_allowed_values(cell, values);
            }
            sheets.push(sheet);
        }
        log::info!("Loaded {} sheet(s) from {}", sheets.len(), dir.display());
        Ok(Self::new(sheets))
    }

    pub fn save_dir(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let mut validations = Validations::new();
        for sheet in &self.sheets {
            let path = dir.join(format!("{}.csv", sheet.name()));
            write_sheet_csv(sheet, std::fs::File::create(&path)?)?;
            if !sheet.dropdowns().is_empty() {
                validations.insert(sheet.name().to_string(), sheet.dropdowns().clone());
            }
        }
        std::fs::write(
            dir.join(VALIDATIONS_FILE),
            serde_json::to_string_pretty(&validations)?,
        )?;
        log::debug!("Saved {} sheet(s) to {}", self.sheets.len(), dir.display());
        Ok(())
    }
}

fn workout_sheet(name: &str) -> Sheet {
    Sheet::with_rows(
        name,
        vec![WORKOUT_HEADERS.iter().map(|h| CellValue::from(*h)).collect()],
    )
}

pub fn read_sheet_csv<R: Read>(name: &str, reader: R) -> Result<Sheet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(CellValue::parse).collect());
    }
    Ok(Sheet::with_rows(name, rows))
}

pub fn write_sheet_csv<W: Write>(sheet: &Sheet, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    for row in &sheet.rows()[..sheet.last_row()] {
        let end = row.iter().rposition(|c| !c.is_empty()).map_or(0, |i| i + 1);
        if end == 0 {
            // csv writes nothing for an empty record, keep the line.
            wtr.write_record([""])?;
        } else {
            wtr.write_record(row[..end].iter().map(CellValue::to_raw))?;
        }
    }
    wtr.flush()?;
    Ok(())
}
