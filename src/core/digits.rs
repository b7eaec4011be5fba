//! # Digit Model
//!
//! Decomposes a number below 1000 into its place-value digits. Pure and
//! stateless — the engine calls this every step rather than caching digits.
//!
//! Arrays throughout the crate are positional: index 0 is hundreds, 1 is
//! tens, 2 is units (the order the digits are written on paper). Resolution
//! order is the opposite — units first — and lives in [`Column`].

use std::fmt;

/// Highest operand the tutor handles. Columns past hundreds are out of scope.
pub const MAX_OPERAND: u16 = 999;

/// Errors from digit decomposition.
/// Catalog validation rejects out-of-range operands up front, so in normal
/// operation this never fires — but the contract is still checked.
#[derive(Debug, PartialEq, Eq)]
pub enum DigitError {
    /// Operand above [`MAX_OPERAND`]; would need a thousands column.
    OutOfRange(u16),
}

impl fmt::Display for DigitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigitError::OutOfRange(n) => write!(f, "operand {n} outside 0..=999"),
        }
    }
}

impl std::error::Error for DigitError {}

/// Splits `n` into `[hundreds, tens, units]`, zero-padded.
///
/// Invariant: `100*h + 10*t + u == n` with each digit in 0..=9.
pub fn digits(n: u16) -> Result<[u8; 3], DigitError> {
    if n > MAX_OPERAND {
        return Err(DigitError::OutOfRange(n));
    }
    Ok([(n / 100) as u8, (n % 100 / 10) as u8, (n % 10) as u8])
}

/// A place-value column. Declaration order is resolution order:
/// units before tens before hundreds (carries flow leftward).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Units,
    Tens,
    Hundreds,
}

impl Column {
    /// All columns in resolution order.
    pub const RESOLUTION_ORDER: [Column; 3] = [Column::Units, Column::Tens, Column::Hundreds];

    /// Slot in the positional `[hundreds, tens, units]` arrays.
    pub fn index(self) -> usize {
        match self {
            Column::Hundreds => 0,
            Column::Tens => 1,
            Column::Units => 2,
        }
    }

    /// Column that receives this column's carry. `None` for hundreds —
    /// a carry past the hundreds column is a catalog-validation bug.
    pub fn carry_target(self) -> Option<Column> {
        match self {
            Column::Units => Some(Column::Tens),
            Column::Tens => Some(Column::Hundreds),
            Column::Hundreds => None,
        }
    }

    /// Column resolved by the `n`-th engine step (0-based), if any.
    pub fn nth(n: usize) -> Option<Column> {
        Column::RESOLUTION_ORDER.get(n).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_boundaries() {
        assert_eq!(digits(0), Ok([0, 0, 0]));
        assert_eq!(digits(999), Ok([9, 9, 9]));
        assert_eq!(digits(1000), Err(DigitError::OutOfRange(1000)));
    }

    #[test]
    fn test_digits_zero_pads_leading_positions() {
        assert_eq!(digits(7), Ok([0, 0, 7]));
        assert_eq!(digits(42), Ok([0, 4, 2]));
        assert_eq!(digits(544), Ok([5, 4, 4]));
    }

    #[test]
    fn test_digits_round_trip() {
        for n in 0..=999u16 {
            let [h, t, u] = digits(n).unwrap();
            assert_eq!(100 * h as u16 + 10 * t as u16 + u as u16, n);
            assert!(h <= 9 && t <= 9 && u <= 9);
        }
    }

    #[test]
    fn test_resolution_order_walks_right_to_left() {
        assert_eq!(Column::nth(0), Some(Column::Units));
        assert_eq!(Column::nth(1), Some(Column::Tens));
        assert_eq!(Column::nth(2), Some(Column::Hundreds));
        assert_eq!(Column::nth(3), None);
    }

    #[test]
    fn test_carry_flows_left_and_stops_at_hundreds() {
        assert_eq!(Column::Units.carry_target(), Some(Column::Tens));
        assert_eq!(Column::Tens.carry_target(), Some(Column::Hundreds));
        assert_eq!(Column::Hundreds.carry_target(), None);
    }

    #[test]
    fn test_index_is_positional_not_resolution_order() {
        assert_eq!(Column::Hundreds.index(), 0);
        assert_eq!(Column::Tens.index(), 1);
        assert_eq!(Column::Units.index(), 2);
    }
}
