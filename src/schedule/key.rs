//! Canonical part-key extraction from decorated vendor labels.

/// Result of normalizing one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedKey<'a> {
    pub key: &'a str,
    /// `false` when the label had no leading token and was kept verbatim.
    pub matched: bool,
}

/// Word characters (Unicode letters/digits, `_`) and hyphens.
fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Take the leading run of token characters as the key.
///
/// Labels like `"AB-12(note)"` or `"AB-12 *"` become `"AB-12"`. A label that
/// does not start with a token character is returned unchanged, so a bad label
/// degrades to an unmatched key instead of failing the run.
pub fn normalize_key(label: &str) -> NormalizedKey<'_> {
    let end = label
        .char_indices()
        .find(|(_, c)| !is_token_char(*c))
        .map(|(idx, _)| idx)
        .unwrap_or(label.len());

    if end == 0 {
        NormalizedKey {
            key: label,
            matched: false,
        }
    } else {
        NormalizedKey {
            key: &label[..end],
            matched: true,
        }
    }
}
