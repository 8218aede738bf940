//! Entity-key normalization.
//!
//! Reference files carry vendor-decorated symbols like `AAPL-US` or
//! ` brk.b-ca `; database and API rows carry bare symbols. Both sides go
//! through the same normalization so lookups line up.

/// Normalize a raw ticker: trim whitespace, strip trailing
/// hyphen-plus-letters exchange suffixes, uppercase.
///
/// Suffixes are stripped to a fixpoint so the result is idempotent
/// (`"ABC-GR-US"` ends at `"ABC"`, never a half-stripped form). `"AB-"`
/// keeps its hyphen (no letters follow it), and an empty or
/// whitespace-only input comes back empty.
pub fn normalize_ticker(raw: &str) -> String {
    let mut stem = raw.trim();
    loop {
        let stripped = strip_exchange_suffix(stem);
        if stripped == stem {
            break;
        }
        stem = stripped;
    }
    stem.to_ascii_uppercase()
}

/// Drop a trailing `-XX` where `XX` is one or more ASCII letters.
fn strip_exchange_suffix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut i = bytes.len();
    while i > 0 && bytes[i - 1].is_ascii_alphabetic() {
        i -= 1;
    }
    // Need at least one letter after the hyphen, and the hyphen must not
    // be the first byte (a key like "-US" is not a suffix on nothing).
    if i < bytes.len() && i > 1 && bytes[i - 1] == b'-' {
        &s[..i - 1]
    } else {
        s
    }
}
