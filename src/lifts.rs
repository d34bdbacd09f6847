use crate::error::{ProgramError, Result};
use crate::sheet::{CellAddress, SheetStore};

/// Names in the lift dropdown at `cell`.
pub fn known_lifts<S: SheetStore + ?Sized>(sheet: &S, cell: CellAddress) -> Result<Vec<String>> {
    sheet
        .allowed_values(cell)
        .ok_or_else(|| ProgramError::MissingDropdown {
            sheet: sheet.name().to_string(),
            cell,
        })
}

/// Add `name` to the lift dropdown at `cell`.
///
/// Returns `false` when the name was already listed or is blank.
pub fn register_lift<S: SheetStore + ?Sized>(
    sheet: &mut S,
    cell: CellAddress,
    name: &str,
) -> Result<bool> {
    let name = name.trim();
    let mut lifts = known_lifts(sheet, cell)?;
    if name.is_empty() || lifts.iter().any(|l| l == name) {
        return Ok(false);
    }
    log::info!("Adding \"{name}\" to the lift dropdown of \"{}\"", sheet.name());
    lifts.push(name.to_string());
    sheet.set_allowed_values(cell, lifts);
    Ok(true)
}

/// The known name closest to `name`, if any is similar enough.
pub fn closest_lift<'a, I>(name: &str, known: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let target = name.to_lowercase();
    known
        .into_iter()
        .map(|k| (strsim::jaro_winkler(&target, &k.to_lowercase()), k))
        .filter(|(score, _)| *score >= 0.8)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, k)| k.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Sheet;

    fn dropdown() -> CellAddress {
        CellAddress::new(2, 12)
    }

    fn sheet() -> Sheet {
        let mut s = Sheet::new("Accessory Exercises");
        s.set_allowed_values(dropdown(), vec!["Curl".into(), "Face Pull".into()]);
        s
    }

    #[test]
    fn new_lifts_are_appended() {
        let mut s = sheet();
        assert!(register_lift(&mut s, dropdown(), " Dip ").unwrap());
        assert_eq!(
            known_lifts(&s, dropdown()).unwrap(),
            vec!["Curl", "Face Pull", "Dip"]
        );
    }

    #[test]
    fn existing_and_blank_names_are_ignored() {
        let mut s = sheet();
        assert!(!register_lift(&mut s, dropdown(), "Curl").unwrap());
        assert!(!register_lift(&mut s, dropdown(), "  ").unwrap());
        assert_eq!(known_lifts(&s, dropdown()).unwrap().len(), 2);
    }

    #[test]
    fn missing_dropdown_is_an_error() {
        let mut s = sheet();
        let elsewhere = CellAddress::new(2, 13);
        assert!(matches!(
            register_lift(&mut s, elsewhere, "Dip"),
            Err(ProgramError::MissingDropdown { .. })
        ));
    }

    #[test]
    fn suggests_close_names() {
        let known = ["Squat", "Deadlift", "Overhead Press"];
        assert_eq!(closest_lift("sqaut", known), Some("Squat".into()));
        assert_eq!(closest_lift("Dead lift", known), Some("Deadlift".into()));
        assert_eq!(closest_lift("Curl", known), None);
    }
}
