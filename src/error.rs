//! Error types for the chaosperm library.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChaosError>;

/// Errors produced by map validation, permutation generation and the ciphers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChaosError {
    /// Seed lies outside the map's open domain or on a known degenerate point.
    #[error("seed {seed} is outside the domain of the {map} map or is a degenerate point")]
    InvalidSeed { map: &'static str, seed: f64 },
    /// Requested length is zero.
    #[error("size must be >= 1, got {size}")]
    InvalidSize { size: usize },
    /// Map parameter outside its accepted range.
    #[error("invalid {map} parameter: {detail}")]
    InvalidMapParameter { map: &'static str, detail: String },
    /// Cipher input and permutation disagree in length.
    #[error("length mismatch: permutation covers {expected} positions, input has {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    /// Retained trajectory collapsed onto a fixed point or a short cycle.
    #[error("{map} trajectory is degenerate: value {index} repeats the one {period} step(s) earlier")]
    DegenerateSequence {
        map: &'static str,
        index: usize,
        period: usize,
    },
    /// Integer sequence is not a bijection of `0..len`.
    #[error("not a permutation: {detail}")]
    NotAPermutation { detail: String },
    /// Sample buffer does not match the declared image shape.
    #[error("image of {height}x{width}x{channels} needs {expected} samples, got {actual}")]
    ShapeMismatch {
        height: usize,
        width: usize,
        channels: usize,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_size() {
        let err = ChaosError::InvalidSize { size: 0 };
        assert_eq!(format!("{}", err), "size must be >= 1, got 0");
    }

    #[test]
    fn test_display_length_mismatch() {
        let err = ChaosError::LengthMismatch {
            expected: 3,
            actual: 4,
        };
        assert_eq!(
            format!("{}", err),
            "length mismatch: permutation covers 3 positions, input has 4"
        );
    }

    #[test]
    fn test_display_degenerate() {
        let err = ChaosError::DegenerateSequence {
            map: "tent",
            index: 1,
            period: 1,
        };
        assert_eq!(
            format!("{}", err),
            "tent trajectory is degenerate: value 1 repeats the one 1 step(s) earlier"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            ChaosError::InvalidSize { size: 0 },
            ChaosError::InvalidSize { size: 0 }
        );
        assert_ne!(
            ChaosError::InvalidSize { size: 0 },
            ChaosError::InvalidSeed {
                map: "logistic",
                seed: 0.0
            }
        );
    }
}
