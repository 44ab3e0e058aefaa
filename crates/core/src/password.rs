//! Password policy for registration and password reset.
//!
//! The API enforces its own policy; these rules mirror it so the reset form
//! can show a live checklist and refuse to submit a password the API would
//! reject.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum password length, in UTF-16 code units as the API counts them.
pub const MIN_LENGTH: usize = 8;

static LOWERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[a-z]").expect("valid regex"));
static UPPERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[A-Z]").expect("valid regex"));
static SPECIAL_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^A-Za-z0-9]").expect("valid regex"));

/// One line of the password checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    Length,
    Lowercase,
    Uppercase,
    SpecialChar,
    Match,
}

impl PasswordRule {
    /// All rules in checklist order.
    pub const ALL: [Self; 5] = [
        Self::Length,
        Self::Lowercase,
        Self::Uppercase,
        Self::SpecialChar,
        Self::Match,
    ];

    /// Checklist label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Length => "At least 8 characters",
            Self::Lowercase => "One lowercase letter",
            Self::Uppercase => "One uppercase letter",
            Self::SpecialChar => "One special character",
            Self::Match => "Passwords match",
        }
    }
}

/// Result of checking a new password and its confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct PasswordCheck {
    pub length: bool,
    pub lowercase: bool,
    pub uppercase: bool,
    pub special_char: bool,
    pub matches: bool,
    pub all_fields_filled: bool,
}

impl PasswordCheck {
    /// Evaluate every rule against `password` and `confirm`.
    #[must_use]
    pub fn evaluate(password: &str, confirm: &str) -> Self {
        Self {
            length: password.encode_utf16().count() >= MIN_LENGTH,
            lowercase: LOWERCASE.is_match(password),
            uppercase: UPPERCASE.is_match(password),
            special_char: SPECIAL_CHAR.is_match(password),
            matches: !password.is_empty() && password == confirm,
            all_fields_filled: !password.trim().is_empty() && !confirm.trim().is_empty(),
        }
    }

    /// Whether a single rule passed.
    #[must_use]
    pub const fn passes(&self, rule: PasswordRule) -> bool {
        match rule {
            PasswordRule::Length => self.length,
            PasswordRule::Lowercase => self.lowercase,
            PasswordRule::Uppercase => self.uppercase,
            PasswordRule::SpecialChar => self.special_char,
            PasswordRule::Match => self.matches,
        }
    }

    /// Both fields filled and every rule passes.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.all_fields_filled
            && self.length
            && self.lowercase
            && self.uppercase
            && self.special_char
            && self.matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failures(password: &str, confirm: &str) -> Vec<PasswordRule> {
        let check = PasswordCheck::evaluate(password, confirm);
        PasswordRule::ALL
            .into_iter()
            .filter(|rule| !check.passes(*rule))
            .collect()
    }

    #[test]
    fn test_strong_matching_password_is_valid() {
        let check = PasswordCheck::evaluate("Crispy#Wings1", "Crispy#Wings1");
        assert!(check.is_valid());
        assert!(failures("Crispy#Wings1", "Crispy#Wings1").is_empty());
    }

    #[test]
    fn test_each_rule_can_fail_alone() {
        assert_eq!(
            failures("Ab#1", "Ab#1"),
            vec![PasswordRule::Length]
        );
        assert_eq!(
            failures("ABCDEFG#1", "ABCDEFG#1"),
            vec![PasswordRule::Lowercase]
        );
        assert_eq!(
            failures("abcdefg#1", "abcdefg#1"),
            vec![PasswordRule::Uppercase]
        );
        assert_eq!(
            failures("Abcdefgh1", "Abcdefgh1"),
            vec![PasswordRule::SpecialChar]
        );
        assert_eq!(
            failures("Abcdefg#1", "Abcdefg#2"),
            vec![PasswordRule::Match]
        );
    }

    #[test]
    fn test_length_counts_utf16_units() {
        // Each drumstick is one char but two UTF-16 units.
        let password = "Ab#\u{1F357}\u{1F357}\u{1F357}\u{1F357}";
        assert_eq!(password.chars().count(), 7);
        assert!(PasswordCheck::evaluate(password, password).is_valid());
        assert_eq!(failures("Ab#\u{1F357}", "Ab#\u{1F357}"), vec![PasswordRule::Length]);
    }

    #[test]
    fn test_space_counts_as_special_character() {
        assert!(PasswordCheck::evaluate("Chicken one", "Chicken one").is_valid());
    }

    #[test]
    fn test_whitespace_only_fields_are_not_filled() {
        let check = PasswordCheck::evaluate("        ", "        ");
        assert!(!check.all_fields_filled);
        assert!(!check.is_valid());
    }

    #[test]
    fn test_empty_passwords_do_not_match() {
        let check = PasswordCheck::evaluate("", "");
        assert!(!check.matches);
    }

    #[test]
    fn test_labels_follow_rule_order() {
        let labels: Vec<_> = PasswordRule::ALL.iter().map(|r| r.label()).collect();
        assert_eq!(labels.first(), Some(&"At least 8 characters"));
        assert_eq!(labels.last(), Some(&"Passwords match"));
    }
}
