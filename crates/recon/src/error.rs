use std::fmt;

/// Import failures that abort the merge outright. Cell-level problems never
/// land here: malformed values degrade through the normalizers and surface
/// as validation errors instead.
#[derive(Debug)]
pub enum ImportError {
    /// The table parsed but held no data rows.
    EmptyTable,
    /// The text was not readable as CSV at all.
    Csv(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTable => write!(f, "the CSV is empty or has no data rows"),
            Self::Csv(msg) => write!(f, "cannot read CSV: {msg}"),
        }
    }
}

impl std::error::Error for ImportError {}
