//! File name validation for recordings written to the user's documents.
//!
//! Recording names are derived from ISO-8601 timestamps, which contain `:`.
//! That character is rejected by several file systems, so names pass through
//! [`sanitize_filename`] before the file is created.

use chrono::{DateTime, TimeZone};

/// Errors that can occur during file name validation
#[derive(Debug, Clone, PartialEq)]
pub enum FilenameError {
    /// Contains a forbidden or control character
    InvalidCharacters,
    /// Longer than [`MAX_FILENAME_LENGTH`] bytes
    FilenameTooLong,
    /// Uses a reserved device name
    ReservedName,
    /// Empty name
    Empty,
}

impl std::fmt::Display for FilenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilenameError::InvalidCharacters => write!(f, "Filename contains invalid characters"),
            FilenameError::FilenameTooLong => write!(f, "Filename is too long"),
            FilenameError::ReservedName => write!(f, "Filename uses reserved name"),
            FilenameError::Empty => write!(f, "Filename is empty"),
        }
    }
}

impl std::error::Error for FilenameError {}

/// Maximum allowed filename length (255 bytes on most filesystems)
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Reserved filenames that should not be used (Windows compatibility)
pub const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Characters that are not allowed in filenames (control characters are checked separately)
pub const FORBIDDEN_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '/', '\\'];

fn is_forbidden(c: char) -> bool {
    FORBIDDEN_FILENAME_CHARS.contains(&c) || c.is_control()
}

/// Validate a single path component.
///
/// # Examples
///
/// ```rust
/// use experience_capture::filenames::validate_filename;
///
/// assert!(validate_filename("2020-03-13T10_00_00-07_00.wav").is_ok());
/// assert!(validate_filename("2020-03-13T10:00:00-07:00.wav").is_err());
/// assert!(validate_filename("con.wav").is_err());
/// ```
pub fn validate_filename(filename: &str) -> Result<(), FilenameError> {
    if filename.is_empty() {
        return Err(FilenameError::Empty);
    }

    if filename.len() > MAX_FILENAME_LENGTH {
        return Err(FilenameError::FilenameTooLong);
    }

    let upper = filename.to_uppercase();
    let stem = upper.split('.').next().unwrap_or("");
    if RESERVED_NAMES.contains(&stem) {
        return Err(FilenameError::ReservedName);
    }

    if filename.chars().any(is_forbidden) {
        return Err(FilenameError::InvalidCharacters);
    }

    Ok(())
}

/// Replace forbidden characters with underscores and enforce the length limit.
///
/// ```rust
/// use experience_capture::filenames::sanitize_filename;
///
/// assert_eq!(sanitize_filename("10:42:07"), "10_42_07");
/// assert_eq!(sanitize_filename("  ..  "), "unnamed_file");
/// ```
pub fn sanitize_filename(filename: &str) -> String {
    let replaced: String = filename
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();

    // Leading/trailing dots and spaces are trouble on Windows
    let mut sanitized = replaced.trim().trim_matches('.').trim().to_string();
    if sanitized.is_empty() {
        sanitized = "unnamed_file".to_string();
    }

    if sanitized.len() > MAX_FILENAME_LENGTH {
        let (name, ext) = match sanitized.rfind('.') {
            Some(dot) => sanitized.split_at(dot),
            None => (sanitized.as_str(), ""),
        };
        let budget = MAX_FILENAME_LENGTH.saturating_sub(ext.len());
        let name = truncate_at_char_boundary(name, budget);
        sanitized = format!("{}{}", name, ext);
    }

    sanitized
}

fn truncate_at_char_boundary(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Builds a file name from an ISO-8601 timestamp with seconds precision and UTC offset.
///
/// ```rust
/// use chrono::{FixedOffset, TimeZone};
/// use experience_capture::filenames::timestamped_filename;
///
/// let offset = FixedOffset::west_opt(7 * 3600).unwrap();
/// let at = offset.with_ymd_and_hms(2020, 3, 13, 10, 0, 0).unwrap();
/// assert_eq!(timestamped_filename(&at, "wav"), "2020-03-13T10_00_00-07_00.wav");
/// ```
pub fn timestamped_filename<Tz>(at: &DateTime<Tz>, extension: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let stamp = at.format("%Y-%m-%dT%H:%M:%S%:z").to_string();
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        sanitize_filename(&stamp)
    } else {
        sanitize_filename(&format!("{}.{}", stamp, extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_validate_filename() {
        assert!(validate_filename("clip.wav").is_ok());
        assert_eq!(validate_filename(""), Err(FilenameError::Empty));
        assert_eq!(
            validate_filename("a/b.wav"),
            Err(FilenameError::InvalidCharacters)
        );
        assert_eq!(
            validate_filename("bell\u{7}.wav"),
            Err(FilenameError::InvalidCharacters)
        );
        assert_eq!(
            validate_filename("LPT1.txt"),
            Err(FilenameError::ReservedName)
        );
        assert_eq!(
            validate_filename(&"a".repeat(300)),
            Err(FilenameError::FilenameTooLong)
        );
    }

    #[test]
    fn test_sanitize_replaces_forbidden_characters() {
        assert_eq!(sanitize_filename("a<b>c?.wav"), "a_b_c_.wav");
        assert_eq!(sanitize_filename("..hidden.."), "hidden");
    }

    #[test]
    fn test_sanitize_preserves_extension_when_truncating() {
        let long = format!("{}.wav", "é".repeat(200));
        let sanitized = sanitize_filename(&long);
        assert!(sanitized.len() <= MAX_FILENAME_LENGTH);
        assert!(sanitized.ends_with(".wav"));
        assert!(validate_filename(&sanitized).is_ok());
    }

    #[test]
    fn test_timestamped_filename_is_valid() {
        let name = timestamped_filename(&Utc::now(), ".wav");
        assert!(name.ends_with(".wav"));
        assert!(validate_filename(&name).is_ok());
        assert!(!name.contains(':'));
    }
}
