//! 输入校验：访问码与发音文本，路由层共用。
use crate::constants::{MAX_ACCESS_CODE_LEN, MAX_PRONOUNCE_TEXT_LEN};

/// Trim a pasted access code and reject obviously unusable input.
pub fn normalize_access_code(code: &str) -> Result<&str, &'static str> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err("Access code must not be empty");
    }
    if trimmed.chars().count() > MAX_ACCESS_CODE_LEN {
        return Err("Access code is too long");
    }
    if trimmed.chars().any(char::is_control) {
        return Err("Access code contains control characters");
    }
    Ok(trimmed)
}

pub fn validate_pronounce_text(text: &str) -> Result<&str, &'static str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("No text to pronounce");
    }
    if trimmed.chars().count() > MAX_PRONOUNCE_TEXT_LEN {
        return Err("Text is too long to pronounce");
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_code_is_trimmed() {
        assert_eq!(normalize_access_code("  PinyinPractice \n"), Ok("PinyinPractice"));
    }

    #[test]
    fn access_code_rejects_empty_and_oversized() {
        assert!(normalize_access_code("   ").is_err());
        assert!(normalize_access_code(&"x".repeat(MAX_ACCESS_CODE_LEN + 1)).is_err());
        assert!(normalize_access_code(&"x".repeat(MAX_ACCESS_CODE_LEN)).is_ok());
    }

    #[test]
    fn access_code_rejects_control_chars() {
        assert!(normalize_access_code("Pinyin\u{0}Practice").is_err());
    }

    #[test]
    fn pronounce_text_limits() {
        assert_eq!(validate_pronounce_text(" 爸爸 "), Ok("爸爸"));
        assert!(validate_pronounce_text("").is_err());
        assert!(validate_pronounce_text(&"a".repeat(MAX_PRONOUNCE_TEXT_LEN + 1)).is_err());
    }
}
