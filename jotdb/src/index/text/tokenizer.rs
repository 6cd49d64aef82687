use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

/// Tokens of one text value. Most field values yield only a few words.
pub type TokenVec = SmallVec<[String; 8]>;

// a word starts with a letter and continues with letters or digits
static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}[\p{L}\p{N}]*").expect("word pattern is valid"));

/// Splits text into lowercase word tokens.
///
/// A token is a Unicode letter followed by any number of letters or digits.
/// Punctuation, whitespace and leading digits separate tokens. Duplicates are
/// removed, keeping the first occurrence.
///
/// # Examples
///
/// ```rust
/// use jotdb::index::text::tokenize;
///
/// let tokens = tokenize("Hello, hello World 42x café");
/// assert_eq!(tokens.as_slice(), ["hello", "world", "x", "café"]);
/// ```
pub fn tokenize(text: &str) -> TokenVec {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .unique()
        .collect()
}
