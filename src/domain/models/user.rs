use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ValidationError;

/// Counted in UTF-16 code units, so a character outside the BMP counts as two.
const MIN_PASSWORD_LEN: usize = 8;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z\s]+$").expect("name pattern is a valid regex")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Id for the next appended record: last element's id plus one, or 1 for an empty collection.
    ///
    /// Deliberately not a max over the collection; callers only ever append.
    /// Returns `None` when the last id is already `i64::MAX`.
    pub fn next_after(users: &[User]) -> Option<Self> {
        match users.last() {
            Some(last) => last.id.0.checked_add(1).map(Self),
            None => Some(Self(1)),
        }
    }

    /// Lenient base-10 parse of a path token.
    ///
    /// Leading whitespace and a sign are accepted and only the leading digit run is read,
    /// so `"12abc"` is 12. Returns `None` when there are no leading digits or the value overflows.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let s = raw.trim_start();
        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits_len == 0 {
            return None;
        }
        let magnitude: i64 = rest[..digits_len].parse().ok()?;
        Some(Self(if negative { -magnitude } else { magnitude }))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registration submission that passed every validation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
    password: String,
}

impl NewUser {
    /// Validate a raw submission.
    ///
    /// Rules run in a fixed order and the first failure is returned:
    /// presence, name shape, email shape, password length.
    pub fn parse(
        name: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<Self, ValidationError> {
        let (Some(name), Some(email), Some(password)) = (
            name.filter(|s| !s.is_empty()),
            email.filter(|s| !s.is_empty()),
            password.filter(|s| !s.is_empty()),
        ) else {
            return Err(ValidationError::MissingField);
        };

        if !NAME_PATTERN.is_match(&name) {
            return Err(ValidationError::BadName);
        }
        if !EMAIL_PATTERN.is_match(&email) {
            return Err(ValidationError::BadEmail);
        }
        if password.encode_utf16().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::ShortPassword);
        }

        Ok(Self {
            name,
            email,
            password,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Attach an id, producing the record that gets persisted
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
        }
    }
}

/// Persisted registration record.
///
/// The password is stored and served verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    password: String,
}

impl User {
    pub fn id(&self) -> UserId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    #[cfg(test)]
    pub fn password(&self) -> &str {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    fn user(id: i64) -> User {
        NewUser::parse(some("Jane Doe"), some(&format!("u{id}@example.com")), some("secret123"))
            .unwrap()
            .into_user(UserId::new(id))
    }

    #[test]
    fn test_parse_valid_submission() {
        let new_user =
            NewUser::parse(some("Jane Doe"), some("jane@example.com"), some("secret123")).unwrap();
        let user = new_user.into_user(UserId::new(1));
        assert_eq!(user.id(), UserId::new(1));
        assert_eq!(user.name(), "Jane Doe");
        assert_eq!(user.email(), "jane@example.com");
        assert_eq!(user.password(), "secret123");
    }

    #[rstest]
    #[case(None, some("jane@example.com"), some("secret123"))]
    #[case(some(""), some("jane@example.com"), some("secret123"))]
    #[case(some("Jane"), None, some("secret123"))]
    #[case(some("Jane"), some("jane@example.com"), some(""))]
    #[case(None, None, None)]
    fn test_parse_missing_field(
        #[case] name: Option<String>,
        #[case] email: Option<String>,
        #[case] password: Option<String>,
    ) {
        assert_eq!(
            NewUser::parse(name, email, password),
            Err(ValidationError::MissingField)
        );
    }

    #[rstest]
    #[case("Jane2")]
    #[case("Jane-Doe")]
    #[case("O'Brien")]
    #[case("Zoë")]
    fn test_parse_bad_name(#[case] name: &str) {
        assert_eq!(
            NewUser::parse(some(name), some("jane@example.com"), some("secret123")),
            Err(ValidationError::BadName)
        );
    }

    #[rstest]
    #[case("jane.example.com")]
    #[case("jane@example")]
    #[case("jane @example.com")]
    #[case("jane@@example.com")]
    #[case("@example.com")]
    fn test_parse_bad_email(#[case] email: &str) {
        assert_eq!(
            NewUser::parse(some("Jane"), some(email), some("secret123")),
            Err(ValidationError::BadEmail)
        );
    }

    #[test]
    fn test_parse_short_password() {
        assert_eq!(
            NewUser::parse(some("Jane"), some("jane@example.com"), some("1234567")),
            Err(ValidationError::ShortPassword)
        );
        assert!(NewUser::parse(some("Jane"), some("jane@example.com"), some("12345678")).is_ok());
    }

    #[test]
    fn test_password_length_counts_utf16_units() {
        // four astral-plane emoji are eight UTF-16 units
        assert!(NewUser::parse(some("Jane"), some("jane@example.com"), some("😀😀😀😀")).is_ok());
        assert_eq!(
            NewUser::parse(some("Jane"), some("jane@example.com"), some("😀😀😀")),
            Err(ValidationError::ShortPassword)
        );
        assert_eq!(
            NewUser::parse(some("Jane"), some("jane@example.com"), some("ééééééé")),
            Err(ValidationError::ShortPassword)
        );
    }

    #[test]
    fn test_parse_first_failure_wins() {
        // bad name, bad email and short password together report the name
        assert_eq!(
            NewUser::parse(some("J4ne"), some("nope"), some("short")),
            Err(ValidationError::BadName)
        );
        assert_eq!(
            NewUser::parse(some("Jane"), some("nope"), some("short")),
            Err(ValidationError::BadEmail)
        );
    }

    #[test]
    fn test_next_id_follows_last_element() {
        assert_eq!(UserId::next_after(&[]), Some(UserId::new(1)));
        assert_eq!(UserId::next_after(&[user(1), user(2)]), Some(UserId::new(3)));
        // not max-based
        assert_eq!(UserId::next_after(&[user(7), user(3)]), Some(UserId::new(4)));
    }

    #[test]
    fn test_next_id_exhausted() {
        assert_eq!(UserId::next_after(&[user(1), user(i64::MAX)]), None);
    }

    #[rstest]
    #[case("1", Some(1))]
    #[case("42abc", Some(42))]
    #[case("  7", Some(7))]
    #[case("3.9", Some(3))]
    #[case("-2", Some(-2))]
    #[case("abc", None)]
    #[case("", None)]
    #[case("99999999999999999999999", None)]
    fn test_parse_lenient(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(UserId::parse_lenient(raw), expected.map(UserId::new));
    }

    #[test]
    fn test_user_json_shape() {
        let json = serde_json::to_value(user(1)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "name": "Jane Doe",
                "email": "u1@example.com",
                "password": "secret123",
            })
        );
    }
}
