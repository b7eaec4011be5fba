//! # Exercise Catalog
//!
//! The ordered list of addition problems the tutor walks through. Ships with
//! a built-in set of nine; users can point `catalog_file` at their own TOML.
//!
//! Every pair is validated at load time: operands in 0..=999 and
//! `num1 + num2 < 1000`, so the hundreds column never produces a carry.
//! A bad entry is skipped with a warning — one malformed exercise must not
//! take down the whole set.

use std::fmt;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::core::digits::digits;

/// An immutable addition problem. The expected result is always derived,
/// never stored — there is no second source of truth to drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub num1: u16,
    pub num2: u16,
}

impl Exercise {
    pub fn new(num1: u16, num2: u16) -> Self {
        Self { num1, num2 }
    }

    /// The sum, used only for display and final confirmation.
    pub fn result(&self) -> u16 {
        self.num1 + self.num2
    }

    /// Operands decomposable into three digits, and no carry out of the
    /// hundreds column.
    fn is_valid(&self) -> bool {
        digits(self.num1).is_ok() && digits(self.num2).is_ok() && self.num1 + self.num2 < 1000
    }
}

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// No valid exercises survived validation.
    Empty,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "catalog I/O error: {e}"),
            CatalogError::Parse(e) => write!(f, "catalog parse error: {e}"),
            CatalogError::Empty => write!(f, "catalog contains no valid exercises"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// On-disk shape of a user catalog:
///
/// ```toml
/// [[exercises]]
/// num1 = 123
/// num2 = 456
/// ```
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    exercises: Vec<Exercise>,
}

/// Ordered, validated exercise set.
#[derive(Debug, Clone)]
pub struct Catalog {
    exercises: Vec<Exercise>,
}

impl Default for Catalog {
    /// The reference set of nine exercises.
    fn default() -> Self {
        let pairs = [
            (544, 256),
            (624, 347),
            (564, 288),
            (545, 286),
            (654, 268),
            (458, 259),
            (532, 399),
            (445, 298),
            (546, 298),
        ];
        Catalog {
            exercises: pairs.iter().map(|&(a, b)| Exercise::new(a, b)).collect(),
        }
    }
}

impl Catalog {
    /// Builds a catalog from raw pairs, dropping invalid entries.
    /// Returns `Empty` if nothing survives.
    pub fn from_exercises(exercises: Vec<Exercise>) -> Result<Self, CatalogError> {
        let total = exercises.len();
        let valid: Vec<Exercise> = exercises
            .into_iter()
            .filter(|ex| {
                if ex.is_valid() {
                    true
                } else {
                    warn!(
                        "Skipping invalid exercise {} + {} (operands must be 0..=999 and sum below 1000)",
                        ex.num1, ex.num2
                    );
                    false
                }
            })
            .collect();
        if valid.is_empty() {
            return Err(CatalogError::Empty);
        }
        if valid.len() < total {
            info!("Catalog: kept {} of {} exercises", valid.len(), total);
        }
        Ok(Catalog { exercises: valid })
    }

    /// Loads a user-authored catalog from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(CatalogError::Io)?;
        let file: CatalogFile = toml::from_str(&contents).map_err(CatalogError::Parse)?;
        info!("Loaded catalog from {}", path.display());
        Catalog::from_exercises(file.exercises)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Panics if out of bounds; the engine clamps all indices first.
    pub fn get(&self, index: usize) -> Exercise {
        self.exercises[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_nine_valid_exercises() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 9);
        for ex in catalog.iter() {
            assert!(ex.is_valid());
        }
        assert_eq!(catalog.get(0), Exercise::new(544, 256));
        assert_eq!(catalog.get(8), Exercise::new(546, 298));
    }

    #[test]
    fn test_result_is_derived() {
        assert_eq!(Exercise::new(544, 256).result(), 800);
        assert_eq!(Exercise::new(445, 298).result(), 743);
    }

    #[test]
    fn test_invalid_entries_are_skipped_not_fatal() {
        let catalog = Catalog::from_exercises(vec![
            Exercise::new(544, 256),
            Exercise::new(1200, 1),  // operand out of range
            Exercise::new(600, 500), // sum would carry past hundreds
            Exercise::new(445, 298),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1), Exercise::new(445, 298));
    }

    #[test]
    fn test_all_invalid_is_empty_error() {
        let result = Catalog::from_exercises(vec![Exercise::new(999, 999)]);
        assert!(matches!(result, Err(CatalogError::Empty)));
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[[exercises]]
num1 = 123
num2 = 456

[[exercises]]
num1 = 900
num2 = 900
"#;
        let file: CatalogFile = toml::from_str(toml_str).unwrap();
        let catalog = Catalog::from_exercises(file.exercises).unwrap();
        // The carrying pair is dropped, the valid one kept.
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0), Exercise::new(123, 456));
    }

    #[test]
    fn test_empty_toml_is_empty_error() {
        let file: CatalogFile = toml::from_str("").unwrap();
        assert!(matches!(
            Catalog::from_exercises(file.exercises),
            Err(CatalogError::Empty)
        ));
    }
}
