//! SSML `<speak>` root handling for output speech.
//!
//! Every SSML payload sent back to the voice platform must be enclosed in a
//! single `<speak>` root. Callers frequently pass text that is already
//! wrapped, so wrapping strips any existing root pairs first and never nests
//! them.

/// Opening tag of the SSML root element.
pub const SPEAK_OPEN: &str = "<speak>";

/// Closing tag of the SSML root element.
pub const SPEAK_CLOSE: &str = "</speak>";

/// Remove every enclosing `<speak>...</speak>` pair from `speech`.
///
/// Surrounding whitespace is trimmed before each check, so the result is
/// always trimmed and never starts with `<speak>` while also ending with
/// `</speak>`.
///
/// # Examples
///
/// ```
/// use askit_utils_ssml::strip_speak_root;
///
/// assert_eq!(strip_speak_root("  Hello  "), "Hello");
/// assert_eq!(strip_speak_root("<speak>Hello</speak>"), "Hello");
/// assert_eq!(strip_speak_root("<speak> <speak>Hi</speak> </speak>"), "Hi");
/// ```
pub fn strip_speak_root(speech: &str) -> &str {
    let mut current = speech.trim();
    while let Some(inner) = current
        .strip_prefix(SPEAK_OPEN)
        .and_then(|rest| rest.strip_suffix(SPEAK_CLOSE))
    {
        current = inner.trim();
    }
    current
}

/// Wrap `speech` in exactly one `<speak>` root.
///
/// Idempotent: `wrap_speech(&wrap_speech(s)) == wrap_speech(s)`.
///
/// # Examples
///
/// ```
/// use askit_utils_ssml::wrap_speech;
///
/// assert_eq!(wrap_speech("Hi"), "<speak>Hi</speak>");
/// assert_eq!(wrap_speech("<speak>Hi</speak>"), "<speak>Hi</speak>");
/// ```
pub fn wrap_speech(speech: &str) -> String {
    format!("{SPEAK_OPEN}{}{SPEAK_CLOSE}", strip_speak_root(speech))
}
