//! Workbook layout and program settings.

use crate::error::Result;
use crate::generator::AccessoryPlan;
use crate::sheet::CellAddress;
use dirs_next as dirs;
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Where each main lift's one-rep max lives on the main sheet.
pub static DEFAULT_ONE_REP_MAX_CELLS: phf::Map<&'static str, &'static str> = phf_map! {
    "Barbell Bench Press" => "L3",
    "Overhead Press" => "M3",
    "Bulgarian Split Squat" => "N3",
    "Deadlift" => "O3",
    "Squat" => "P3",
};

fn cell(a1: &str) -> CellAddress {
    CellAddress::parse(a1).unwrap_or(CellAddress::new(1, 1))
}

/// Layout of the main lift sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainSheetConfig {
    pub name: String,
    /// Dropdown holding the lift to train.
    pub lift_cell: CellAddress,
    /// Checkbox that starts a workout.
    pub start_workout_cell: CellAddress,
    pub one_rep_max_cells: BTreeMap<String, CellAddress>,
}

impl Default for MainSheetConfig {
    fn default() -> Self {
        Self {
            name: "531 Exercises".into(),
            lift_cell: cell("L2"),
            start_workout_cell: cell("L8"),
            one_rep_max_cells: DEFAULT_ONE_REP_MAX_CELLS
                .entries()
                .map(|(lift, a1)| (lift.to_string(), cell(a1)))
                .collect(),
        }
    }
}

/// Layout of the accessory sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessorySheetConfig {
    pub name: String,
    pub lift_cell: CellAddress,
    /// Number of sets to create.
    pub set_count_cell: CellAddress,
    pub create_sets_cell: CellAddress,
    #[serde(flatten)]
    pub plan: AccessoryPlan,
}

impl Default for AccessorySheetConfig {
    fn default() -> Self {
        Self {
            name: "Accessory Exercises".into(),
            lift_cell: cell("L2"),
            set_count_cell: cell("M2"),
            create_sets_cell: cell("L8"),
            plan: AccessoryPlan::default(),
        }
    }
}

/// Everything the automation needs to know about the workbook, passed
/// explicitly to the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProgramConfig {
    pub main: MainSheetConfig,
    pub accessory: AccessorySheetConfig,
    pub workbook_dir: Option<PathBuf>,
}

impl ProgramConfig {
    const FILE: &'static str = "five_three_one.json";

    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    /// Load the configuration, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| Self::load_from(&p).ok())
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Directory of the workbook, `./workbook` unless configured.
    pub fn workbook_dir(&self) -> PathBuf {
        self.workbook_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("workbook"))
    }

    /// The lift dropdown of one of the program sheets.
    pub fn lift_cell_for(&self, sheet: &str) -> Option<CellAddress> {
        if sheet == self.main.name {
            Some(self.main.lift_cell)
        } else if sheet == self.accessory.name {
            Some(self.accessory.lift_cell)
        } else {
            None
        }
    }

    pub fn one_rep_max_cell(&self, lift: &str) -> Option<CellAddress> {
        self.main.one_rep_max_cells.get(lift).copied()
    }

    /// Main lifts with a one-rep-max cell, in sheet column order.
    pub fn main_lifts(&self) -> Vec<String> {
        let mut lifts: Vec<(&String, &CellAddress)> = self.main.one_rep_max_cells.iter().collect();
        lifts.sort_by_key(|(_, a)| (a.row, a.col));
        lifts.into_iter().map(|(l, _)| l.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MissingWeightPolicy;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_sheet_layout() {
        let cfg = ProgramConfig::default();
        assert_eq!(cfg.main.name, "531 Exercises");
        assert_eq!(cfg.accessory.name, "Accessory Exercises");
        assert_eq!(cfg.main.start_workout_cell, CellAddress::new(8, 12));
        assert_eq!(cfg.one_rep_max_cell("Squat"), Some(CellAddress::new(3, 16)));
        assert_eq!(cfg.one_rep_max_cell("Curl"), None);
        assert_eq!(
            cfg.main_lifts(),
            vec![
                "Barbell Bench Press",
                "Overhead Press",
                "Bulgarian Split Squat",
                "Deadlift",
                "Squat"
            ]
        );
        assert_eq!(cfg.accessory.plan.expected_reps, 8);
        assert_eq!(cfg.lift_cell_for("Accessory Exercises"), Some(CellAddress::new(2, 12)));
        assert_eq!(cfg.lift_cell_for("Notes"), None);
    }

    #[test]
    fn config_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut cfg = ProgramConfig::default();
        cfg.main.lift_cell = CellAddress::new(2, 14);
        cfg.accessory.plan.missing_weight = MissingWeightPolicy::Fail;
        cfg.workbook_dir = Some("/tmp/lifting".into());
        cfg.save_to(&path).unwrap();
        let loaded = ProgramConfig::load_from(&path).unwrap();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_fields_default() {
        let json = r#"{"main": {"lift_cell": "N2"}, "accessory": {"expected_reps": 12}}"#;
        let cfg: ProgramConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.main.lift_cell, CellAddress::new(2, 14));
        assert_eq!(cfg.main.name, "531 Exercises");
        assert_eq!(cfg.main.one_rep_max_cells.len(), 5);
        assert_eq!(cfg.accessory.plan.expected_reps, 12);
        assert_eq!(cfg.accessory.plan.rest_minutes, 1);
        assert_eq!(cfg.accessory.plan.max_sets, 20);
        assert_eq!(cfg.workbook_dir(), PathBuf::from("workbook"));
    }

    #[test]
    fn bad_cell_address_is_rejected() {
        let json = r#"{"main": {"lift_cell": "2N"}}"#;
        assert!(serde_json::from_str::<ProgramConfig>(json).is_err());
    }
}
