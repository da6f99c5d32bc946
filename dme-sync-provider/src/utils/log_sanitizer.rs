//! Log sanitization utilities
//!
//! Keeps credentials and long TXT payloads (DKIM keys, SPF records) out of
//! debug/error logs and `Debug` output.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of trailing characters a masked secret keeps.
const MASK_VISIBLE_SUFFIX: usize = 4;

/// Secrets shorter than this are masked completely.
const MASK_MIN_LEN: usize = 12;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit,
/// otherwise returns the first `TRUNCATE_LIMIT` characters with a suffix
/// indicating the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a credential for `Debug` output.
///
/// Long secrets keep their last few characters so two keys can still be told
/// apart; short ones are hidden entirely.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        String::new()
    } else if count < MASK_MIN_LEN {
        "***".to_string()
    } else {
        let suffix: String = secret.chars().skip(count - MASK_VISIBLE_SUFFIX).collect();
        format!("***{suffix}")
    }
}
