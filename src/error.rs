use crate::sheet::CellAddress;

pub type Result<T> = std::result::Result<T, ProgramError>;

/// Everything that can abort the processing of a single edit or command.
#[derive(Debug)]
pub enum ProgramError {
    MissingSheet(String),
    MissingHeader {
        sheet: String,
        header: String,
    },
    MissingDropdown {
        sheet: String,
        cell: CellAddress,
    },
    InvalidWeek(String),
    UnknownLift {
        name: String,
        suggestion: Option<String>,
    },
    InvalidCell {
        sheet: String,
        cell: CellAddress,
        reason: String,
    },
    InvalidAddress(String),
    IndexOutOfRange {
        lift: String,
        requested: usize,
        recorded: usize,
    },
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl ProgramError {
    /// Errors caused by the workbook layout or the program configuration
    /// rather than by the filesystem.
    pub fn is_configuration(&self) -> bool {
        !matches!(
            self,
            ProgramError::IndexOutOfRange { .. }
                | ProgramError::Io(_)
                | ProgramError::Csv(_)
                | ProgramError::Json(_)
        )
    }
}

impl std::fmt::Display for ProgramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgramError::MissingSheet(name) => write!(f, "Sheet \"{name}\" not found"),
            ProgramError::MissingHeader { sheet, header } => {
                write!(f, "Sheet \"{sheet}\" has no \"{header}\" column")
            }
            ProgramError::MissingDropdown { sheet, cell } => {
                write!(f, "Sheet \"{sheet}\" has no dropdown at {cell}")
            }
            ProgramError::InvalidWeek(week) => {
                write!(f, "Week must be between 1 and 4, got \"{week}\"")
            }
            ProgramError::UnknownLift { name, suggestion } => match suggestion {
                Some(s) => write!(
                    f,
                    "No one-rep-max cell configured for \"{name}\" (did you mean \"{s}\"?)"
                ),
                None => write!(f, "No one-rep-max cell configured for \"{name}\""),
            },
            ProgramError::InvalidCell {
                sheet,
                cell,
                reason,
            } => write!(f, "{sheet}!{cell}: {reason}"),
            ProgramError::InvalidAddress(a) => write!(f, "Invalid cell address \"{a}\""),
            ProgramError::IndexOutOfRange {
                lift,
                requested,
                recorded,
            } => write!(
                f,
                "{requested} sets requested for \"{lift}\" but the last session recorded {recorded}"
            ),
            ProgramError::Io(e) => write!(f, "{e}"),
            ProgramError::Csv(e) => write!(f, "{e}"),
            ProgramError::Json(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ProgramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProgramError::Io(e) => Some(e),
            ProgramError::Csv(e) => Some(e),
            ProgramError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProgramError {
    fn from(e: std::io::Error) -> Self {
        ProgramError::Io(e)
    }
}

impl From<csv::Error> for ProgramError {
    fn from(e: csv::Error) -> Self {
        ProgramError::Csv(e)
    }
}

impl From<serde_json::Error> for ProgramError {
    fn from(e: serde_json::Error) -> Self {
        ProgramError::Json(e)
    }
}
