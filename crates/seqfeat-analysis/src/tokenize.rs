//! Sequence tokenization for feature scanning
//!
//! An empty separator yields one token per character. A non-empty separator
//! splits the sequence on it; empty tokens produced by leading, trailing or
//! repeated separators are dropped.

/// Splits `sequence` into tokens according to `separator`.
///
/// Tokens borrow from `sequence`, so joining a contiguous run of tokens with
/// the same separator reproduces the matched text.
///
/// # Examples
///
/// ```
/// use seqfeat_analysis::tokenize::tokenize;
///
/// assert_eq!(tokenize("héllo", ""), ["h", "é", "l", "l", "o"]);
/// assert_eq!(tokenize("a b  c ", " "), ["a", "b", "c"]);
/// ```
#[must_use]
pub fn tokenize<'s>(sequence: &'s str, separator: &str) -> Vec<&'s str> {
    if separator.is_empty() {
        sequence
            .char_indices()
            .map(|(idx, ch)| &sequence[idx..idx + ch.len_utf8()])
            .collect()
    } else {
        sequence
            .split(separator)
            .filter(|token| !token.is_empty())
            .collect()
    }
}
