//! Internal helpers for input validation.

use crate::{EngineError, ResultEngine};

/// Trim a required name, rejecting empty values.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidArgument(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Ensure a money movement amount is strictly positive.
pub(crate) fn require_positive_amount(amount_minor: i64) -> ResultEngine<()> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidArgument(
            "amount_minor must be > 0".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed() {
        assert_eq!(
            normalize_required_name("  Savings ", "account").unwrap(),
            "Savings"
        );
    }

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(
            normalize_required_name("   ", "account"),
            Err(EngineError::InvalidArgument(
                "account name must not be empty".to_string()
            ))
        );
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        assert!(require_positive_amount(1).is_ok());
        assert!(require_positive_amount(0).is_err());
        assert!(require_positive_amount(-5).is_err());
    }
}
