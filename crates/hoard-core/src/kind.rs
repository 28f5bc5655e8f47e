//! Storage-kind tags and the caller-facing strategy selector.

use std::fmt;
use std::str::FromStr;

use crate::error::StorageError;

/// Which backing strategy produced a container.
///
/// Reported by every container for diagnostics. Automatic allocation may
/// return any of `Array`, `Extended` or `Virtual`; `Sparse` only comes from an
/// explicit [`StorageStrategy::Sparse`] request and `Ragged` only from the
/// ragged store constructors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageKind {
    /// One contiguous in-memory buffer.
    Array,
    /// In-memory buffer split into chunks.
    Extended,
    /// Backed by a file on secondary storage.
    Virtual,
    /// Default value plus a map of deviating slots.
    Sparse,
    /// Variable-length byte records behind an offset index.
    Ragged,
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Array => "array",
            Self::Extended => "extended",
            Self::Virtual => "virtual",
            Self::Sparse => "sparse",
            Self::Ragged => "ragged",
        };
        f.write_str(name)
    }
}

/// Caller-chosen storage tier for explicit allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageStrategy {
    /// In memory if at all possible: array, then extended, then virtual.
    Array,
    /// Sparse map over a default value.
    Sparse,
    /// File-backed.
    Virtual,
}

impl StorageStrategy {
    /// Every strategy, in selector-code order.
    pub const ALL: [StorageStrategy; 3] = [Self::Array, Self::Sparse, Self::Virtual];

    /// The storage kind a successful allocation normally reports.
    ///
    /// `Array` requests may still end up `Extended` or `Virtual` after
    /// fallback.
    pub fn preferred_kind(self) -> StorageKind {
        match self {
            Self::Array => StorageKind::Array,
            Self::Sparse => StorageKind::Sparse,
            Self::Virtual => StorageKind::Virtual,
        }
    }
}

impl fmt::Display for StorageStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.preferred_kind(), f)
    }
}

impl TryFrom<u8> for StorageStrategy {
    type Error = StorageError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| StorageError::invalid(format!("unknown storage strategy code {code}")))
    }
}

impl FromStr for StorageStrategy {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "array" => Ok(Self::Array),
            "sparse" => Ok(Self::Sparse),
            "virtual" => Ok(Self::Virtual),
            other => Err(StorageError::invalid(format!(
                "unknown storage strategy '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_codes_round_trip() {
        for (code, strategy) in StorageStrategy::ALL.iter().enumerate() {
            assert_eq!(StorageStrategy::try_from(code as u8).unwrap(), *strategy);
        }
    }

    #[test]
    fn unknown_strategy_code_is_invalid_argument() {
        assert!(matches!(
            StorageStrategy::try_from(3),
            Err(StorageError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Sparse".parse::<StorageStrategy>().unwrap(), StorageStrategy::Sparse);
        assert_eq!(" virtual ".parse::<StorageStrategy>().unwrap(), StorageStrategy::Virtual);
        assert!(matches!(
            "ragged".parse::<StorageStrategy>(),
            Err(StorageError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn display_mirrors_kind() {
        assert_eq!(StorageStrategy::Array.to_string(), "array");
        assert_eq!(StorageKind::Ragged.to_string(), "ragged");
    }
}
