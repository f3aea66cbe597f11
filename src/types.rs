// PinSearch Type Definitions
// Core types shared by the engine: acceptance logic and error values

use thiserror::Error;

/// Acceptance rule governing how a query must correspond to a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    /// The query must account for the whole candidate
    /// Example: "beijing" matches "北京", "beijin" does not
    Equal,

    /// The query must be a prefix of the candidate
    /// Example: "bj" matches "北京", "jing" does not
    Begin,

    /// The query may start anywhere inside the candidate
    /// Example: "jing" matches "北京" starting at the second character
    Contain,
}

impl std::fmt::Display for Logic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Logic::Equal => write!(f, "Equal"),
            Logic::Begin => write!(f, "Begin"),
            Logic::Contain => write!(f, "Contain"),
        }
    }
}

/// Dictionary loading errors
///
/// Malformed individual lines are skipped during parsing, not reported;
/// only failures that leave the dictionary unusable surface here.
#[derive(Debug, Error)]
pub enum DictError {
    #[error("failed to read dictionary: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logic_display() {
        assert_eq!(Logic::Equal.to_string(), "Equal");
        assert_eq!(Logic::Begin.to_string(), "Begin");
        assert_eq!(Logic::Contain.to_string(), "Contain");
    }

    #[test]
    fn test_dict_error_message() {
        let err = DictError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        assert!(err.to_string().contains("failed to read dictionary"));
    }
}
