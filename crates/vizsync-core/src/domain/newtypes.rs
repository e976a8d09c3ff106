//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for domain identifiers and values.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// Integer-based ID types
// ============================================================================

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw backend identifier
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the raw backend identifier
            #[must_use]
            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|e| {
                        DomainError::InvalidId(format!("Invalid {}: {s:?} ({e})", stringify!($name)))
                    })
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

integer_id!(
    /// Identifier for a saved query
    QueryId
);

integer_id!(
    /// Identifier for a visualization of a query
    VisualizationId
);

integer_id!(
    /// Identifier for a spreadsheet destination
    DestinationId
);

// ============================================================================
// JobId
// ============================================================================

/// Opaque identifier of a server-side sync job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Creates a JobId, rejecting empty strings
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidId("Job ID cannot be empty".to_string()));
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CellRow
// ============================================================================

/// Highest anchor row accepted from the form
pub const MAX_ROW: u32 = 1000;

/// Spreadsheet row where the exported table starts (1-based, at most [`MAX_ROW`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CellRow(u32);

impl CellRow {
    /// Creates a CellRow in `1..=MAX_ROW`
    pub fn new(row: u32) -> Result<Self, DomainError> {
        if row == 0 {
            return Err(DomainError::InvalidRow("row must be at least 1".to_string()));
        }
        if row > MAX_ROW {
            return Err(DomainError::InvalidRow(format!(
                "row must be at most {MAX_ROW}"
            )));
        }
        Ok(Self(row))
    }

    /// Returns the 1-based row number
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl Default for CellRow {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u32> for CellRow {
    type Error = DomainError;

    fn try_from(row: u32) -> Result<Self, Self::Error> {
        Self::new(row)
    }
}

impl From<CellRow> for u32 {
    fn from(row: CellRow) -> Self {
        row.0
    }
}

impl FromStr for CellRow {
    type Err = DomainError;

    /// Parses user input; anything but a positive integer is rejected
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let row = trimmed
            .parse::<u32>()
            .map_err(|_| DomainError::InvalidRow(format!("{trimmed:?} is not a positive integer")))?;
        Self::new(row)
    }
}

impl Display for CellRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CellColumn
// ============================================================================

/// Maximum number of letters in a spreadsheet column name
const MAX_COLUMN_LETTERS: usize = 3;

/// Spreadsheet column where the exported table starts (e.g. `A`, `AB`, `XFD`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellColumn(String);

impl CellColumn {
    /// Creates a CellColumn from 1 to 3 ASCII letters
    pub fn new(column: impl Into<String>) -> Result<Self, DomainError> {
        let column = column.into();
        let trimmed = column.trim();

        if trimmed.is_empty()
            || trimmed.len() > MAX_COLUMN_LETTERS
            || !trimmed.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(DomainError::InvalidColumn(format!(
                "{trimmed:?} must be 1 to {MAX_COLUMN_LETTERS} letters"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the column name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CellColumn {
    fn default() -> Self {
        Self("A".to_string())
    }
}

impl TryFrom<String> for CellColumn {
    type Error = DomainError;

    fn try_from(column: String) -> Result<Self, Self::Error> {
        Self::new(column)
    }
}

impl From<CellColumn> for String {
    fn from(column: CellColumn) -> Self {
        column.0
    }
}

impl FromStr for CellColumn {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for CellColumn {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
