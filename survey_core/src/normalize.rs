// Canonical forms of the free-text names found in the surveys.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// The labels used in the survey to say that there is nothing to report.
const NO_DATA_MARKERS: [&str; 2] = ["ninguno", "ninguna"];

/// Canonical form of a course or teacher name, for equality comparisons.
///
/// The text is lowercased, accents are removed, everything that is neither a
/// word character nor a space is dropped and runs of spaces are collapsed.
/// Applying it twice gives the same result as applying it once.
///
/// ```
/// use survey_core::normalize;
/// assert_eq!(normalize("  Administración  de Redes!"), "administracion de redes");
/// ```
pub fn normalize(text: &str) -> String {
    let stripped: String = strip_marks(&text.to_lowercase())
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect();
    collapse_whitespace(&stripped)
}

/// Display form of a software name: accents removed, spaces collapsed.
///
/// Unlike `normalize`, punctuation and case are kept ("C++", "Node.js").
pub fn normalize_software_name(text: &str) -> String {
    collapse_whitespace(&strip_marks(text))
}

/// The key under which mentions of a software are counted together.
pub fn software_key(text: &str) -> String {
    normalize_software_name(text).to_lowercase()
}

/// True if the field carries no information: empty, or one of the "none" labels
/// in any case.
pub fn is_no_data_marker(field: &str) -> bool {
    let n = normalize(field);
    n.is_empty() || NO_DATA_MARKERS.contains(&n.as_str())
}

/// Alphabetical ordering for display names that ignores case and accents.
///
/// Names that only differ by case or accents are ordered by their raw text so
/// that the ordering stays total.
pub fn collate(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

fn fold(text: &str) -> String {
    strip_marks(&text.to_lowercase())
}

fn strip_marks(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}
