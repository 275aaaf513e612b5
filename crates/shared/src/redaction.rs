//! Secret detection for log fields.
//!
//! Formatters that opt into redaction replace the value of any field whose
//! key looks like a credential with [`REDACTED`].

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

/// Checks if a field name likely refers to a secret.
///
/// Case-insensitive substring match on common credential naming. Matching is
/// not word-aware, so innocuous keys containing a pattern (`author`,
/// `monkey`) are redacted too.
///
/// # Examples
///
/// ```
/// use metalog_shared::is_secret_key;
///
/// assert!(is_secret_key("apiKey"));
/// assert!(is_secret_key("password"));
/// assert!(!is_secret_key("request_id"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    key.contains("KEY")
        || key.contains("TOKEN")
        || key.contains("SECRET")
        || key.contains("PASSWORD")
        || key.contains("CREDENTIAL")
        || key.contains("AUTH")
}
