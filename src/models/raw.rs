use chrono::NaiveDate;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{ProcessingError, Result};
use crate::models::CanonicalObservation;
use crate::utils::constants::{CANONICAL_COLUMNS, COLUMN_COUNT};

/// A single cell as it was encoded in the source spreadsheet
#[derive(Debug, Clone)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl RawCell {
    pub fn text(value: impl Into<String>) -> Self {
        RawCell::Text(value.into())
    }

    /// Empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

// Floats compare by bit pattern so that value-for-value duplicates hash alike.
impl PartialEq for RawCell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RawCell::Empty, RawCell::Empty) => true,
            (RawCell::Text(a), RawCell::Text(b)) => a == b,
            (RawCell::Number(a), RawCell::Number(b)) => a.to_bits() == b.to_bits(),
            (RawCell::Date(a), RawCell::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for RawCell {}

impl Hash for RawCell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            RawCell::Empty => {}
            RawCell::Text(s) => s.hash(state),
            RawCell::Number(n) => n.to_bits().hash(state),
            RawCell::Date(d) => d.hash(state),
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Empty => Ok(()),
            RawCell::Text(s) => write!(f, "{}", s),
            RawCell::Number(n) => write!(f, "{}", n),
            RawCell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// One input row: five cells in fixed positional order
pub type RawObservation = [RawCell; COLUMN_COUNT];

/// The raw observation table exactly as loaded
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<RawObservation>,
}

impl RawTable {
    /// Build a table, enforcing the five-column layout on the header and every row
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawCell>>) -> Result<Self> {
        if headers.len() != COLUMN_COUNT {
            return Err(ProcessingError::ColumnCount {
                expected: COLUMN_COUNT,
                found: headers.len(),
            });
        }

        if rows.is_empty() {
            return Err(ProcessingError::EmptyInput);
        }

        let rows = rows
            .into_iter()
            .map(|row| {
                let found = row.len();
                RawObservation::try_from(row).map_err(|_| ProcessingError::ColumnCount {
                    expected: COLUMN_COUNT,
                    found,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { headers, rows })
    }

    /// Re-express a canonical table as raw input
    pub fn from_canonical(observations: &[CanonicalObservation]) -> Result<Self> {
        let headers = CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect();
        let rows = observations
            .iter()
            .map(|o| {
                vec![
                    RawCell::Date(o.date),
                    RawCell::Number(o.tmax),
                    RawCell::Number(o.tmin),
                    RawCell::Number(o.humidity),
                    RawCell::Number(o.precipitation),
                ]
            })
            .collect();

        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[RawObservation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn headers() -> Vec<String> {
        vec![
            "FECHA".to_string(),
            "TEMPERATURA MAXIMA (°C)".to_string(),
            "TEMPERATURA MINIMA (°C)".to_string(),
            "HUMEDAD RELATIVA (%)".to_string(),
            "PRECIPITACIÓN (mm/día)".to_string(),
        ]
    }

    #[test]
    fn test_rejects_wrong_header_width() {
        let result = RawTable::new(vec!["a".to_string(); 4], vec![vec![RawCell::Empty; 4]]);
        match result {
            Err(ProcessingError::ColumnCount { expected, found }) => {
                assert_eq!(expected, 5);
                assert_eq!(found, 4);
            }
            other => panic!("Expected ColumnCount error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_ragged_row() {
        let rows = vec![vec![RawCell::Empty; 5], vec![RawCell::Empty; 6]];
        let result = RawTable::new(headers(), rows);
        assert!(matches!(
            result,
            Err(ProcessingError::ColumnCount { found: 6, .. })
        ));
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(matches!(
            RawTable::new(headers(), vec![]),
            Err(ProcessingError::EmptyInput)
        ));
    }

    #[test]
    fn test_cell_equality_and_hash() {
        let mut seen = HashSet::new();
        assert!(seen.insert(RawCell::Number(30.5)));
        assert!(!seen.insert(RawCell::Number(30.5)));
        assert!(seen.insert(RawCell::text("30.5")));
        assert!(seen.insert(RawCell::Empty));
        assert!(!seen.insert(RawCell::Empty));
        assert_ne!(RawCell::text("S/D"), RawCell::text("s/d"));
    }

    #[test]
    fn test_blank_cells() {
        assert!(RawCell::Empty.is_blank());
        assert!(RawCell::text("   ").is_blank());
        assert!(!RawCell::text("-").is_blank());
        assert!(!RawCell::Number(0.0).is_blank());
    }
}
