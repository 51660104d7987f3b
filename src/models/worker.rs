use rusqlite::Row;
use serde::Serialize;
use std::fmt;

/// Precinct values arrive as numeric or string cells. Numeric-looking values
/// are normalized to the same representation before comparison and storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Precinct {
    Number(i64),
    Text(String),
}

impl Precinct {
    /// Parse a cell value. Blank input means "unset".
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<i64>() {
            Ok(n) => Some(Precinct::Number(n)),
            Err(_) => Some(Precinct::Text(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Precinct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precinct::Number(n) => write!(f, "{}", n),
            Precinct::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One poll worker as stored in the registry.
#[derive(Debug, Clone, Serialize)]
pub struct Worker {
    pub id: i64,
    pub vr_id: Option<String>,
    pub last_name: String,
    pub first_name: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub experienced: bool,
    pub languages: Option<String>,
    pub location: Option<String>,
    pub precinct: Option<Precinct>,
    pub role: Option<String>,
    pub notes: Option<String>,
}

impl Worker {
    /// Whether the stored identifier can serve as a unique match key.
    pub fn has_usable_vr_id(&self) -> bool {
        self.vr_id
            .as_deref()
            .and_then(|v| v.chars().next())
            .is_some_and(|c| c.is_ascii_digit())
    }

    pub fn from_row(row: &Row) -> rusqlite::Result<Worker> {
        let precinct: Option<String> = row.get("precinct")?;
        Ok(Worker {
            id: row.get("id")?,
            vr_id: row.get("vr_id")?,
            last_name: row.get("last_name")?,
            first_name: row.get("first_name")?,
            city: row.get("city")?,
            phone: row.get("phone")?,
            email: row.get("email")?,
            experienced: row.get::<_, i64>("experienced")? != 0,
            languages: row.get("languages")?,
            location: row.get("location")?,
            precinct: precinct.as_deref().and_then(Precinct::parse),
            role: row.get("role")?,
            notes: row.get("notes")?,
        })
    }
}

/// Attribute set for a worker about to be inserted. The id is assigned by the
/// repository.
#[derive(Debug, Clone, Default)]
pub struct NewWorker {
    pub vr_id: Option<String>,
    pub last_name: String,
    pub first_name: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub experienced: bool,
    pub languages: Option<String>,
    pub location: Option<String>,
    pub precinct: Option<Precinct>,
    pub role: Option<String>,
    pub notes: Option<String>,
}

/// Partial update: only the present fields reach the SET clause.
#[derive(Debug, Clone, Default)]
pub struct WorkerPatch {
    pub vr_id: Option<String>,
    pub precinct: Option<Precinct>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl WorkerPatch {
    pub fn is_empty(&self) -> bool {
        self.vr_id.is_none()
            && self.precinct.is_none()
            && self.role.is_none()
            && self.email.is_none()
            && self.notes.is_none()
    }
}
