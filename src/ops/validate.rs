use unicode_segmentation::UnicodeSegmentation;

/// Maximum title length, counted in grapheme clusters as typed.
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum description length, counted the same way.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Error type for input validation. These are caught at the caller
/// boundary and never reach the repository.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("task title is too long (max 200 characters)")]
    TitleTooLong,
    #[error("task description is too long (max 500 characters)")]
    DescriptionTooLong,
}

/// Check a task title as typed, returning the trimmed title.
///
/// The emptiness gate applies after trimming; the length gate applies to
/// the raw input before it.
pub fn validate_title(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if raw.graphemes(true).count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(trimmed.to_string())
}

/// Check an optional description. Blank input reads as no description.
pub fn validate_description(raw: &str) -> Result<Option<String>, ValidationError> {
    if raw.graphemes(true).count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong);
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_title_is_trimmed() {
        assert_eq!(validate_title("  Buy milk  ").unwrap(), "Buy milk");
    }

    #[test]
    fn whitespace_only_title_is_empty() {
        assert_eq!(validate_title("   "), Err(ValidationError::EmptyTitle));
        assert_eq!(validate_title(""), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn title_length_gate_applies_before_trimming() {
        assert_eq!(
            validate_title(&"x".repeat(201)),
            Err(ValidationError::TitleTooLong)
        );
        assert!(validate_title(&"x".repeat(200)).is_ok());

        // 195 letters padded with 10 spaces: 205 characters as typed
        let padded = format!("     {}     ", "x".repeat(195));
        assert_eq!(validate_title(&padded), Err(ValidationError::TitleTooLong));
    }

    #[test]
    fn title_length_counts_graphemes_not_code_points() {
        // 150 family emoji are 150 user-perceived characters even though
        // each is several code points
        let families = "\u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F466}".repeat(150);
        assert!(validate_title(&families).is_ok());
    }

    #[test]
    fn blank_description_reads_as_none() {
        assert_eq!(validate_description("").unwrap(), None);
        assert_eq!(validate_description("   ").unwrap(), None);
        assert_eq!(
            validate_description(" details ").unwrap(),
            Some("details".to_string())
        );
    }

    #[test]
    fn description_has_its_own_length_gate() {
        assert_eq!(
            validate_description(&"d".repeat(501)),
            Err(ValidationError::DescriptionTooLong)
        );
        assert!(validate_description(&"d".repeat(500)).is_ok());
    }
}
