// 🏷️ Name Canonicalizer - Raw company name → deduplication key
//
// Problem solved:
// - "Acme Pte. Ltd.", "ACME", "Acme\u{200B}" → all the same key "acme"
// - Scraped snippets carry zero-width and bidi marks that are invisible on
//   screen but break string equality
// - Legal suffixes and a leading "The" are noise for identity

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

// ============================================================================
// LEGAL SUFFIXES
// ============================================================================

/// Trailing legal-entity suffixes, in precedence order.
///
/// Each entry is (label, pattern body). Only the first entry that matches is
/// removed in a single pass, so "pte ltd" must stay ahead of "ltd" and
/// "corp" ahead of "co".
pub const LEGAL_SUFFIXES: &[(&str, &str)] = &[
    ("pte ltd", r"pte\.?\s*ltd"),
    ("ltd", r"ltd"),
    ("inc", r"inc"),
    ("llc", r"llc"),
    ("corp", r"corp"),
    ("corporation", r"corporation"),
    ("company", r"company"),
    ("co", r"co"),
    ("pvt ltd", r"pvt\.?\s*ltd"),
    ("private limited", r"private\s+limited"),
    ("limited", r"limited"),
    ("singapore", r"singapore"),
    ("sg", r"sg"),
];

/// Compiled suffix patterns: case-insensitive, anchored at the end, optional
/// period, and either preceded by whitespace or spanning the whole name.
static SUFFIX_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    LEGAL_SUFFIXES
        .iter()
        .map(|(label, body)| {
            let pattern = format!(r"(?i)(?:^|\s+){}\.?\s*$", body);
            let regex = Regex::new(&pattern).expect("legal suffix pattern must compile");
            (*label, regex)
        })
        .collect()
});

// ============================================================================
// INVISIBLE CHARACTERS
// ============================================================================

/// Zero-width, bidi-control, and other invisible code points that show up in
/// scraped mail text.
pub fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{00AD}'
            | '\u{034F}'
            | '\u{2800}'
            | '\u{3164}'
            | '\u{FFA0}'
            | '\u{115F}'
            | '\u{1160}'
            | '\u{180E}'
    )
}

// ============================================================================
// CANONICALIZATION
// ============================================================================

/// Remove one trailing legal suffix.
///
/// Returns the remaining text and the label of the suffix that matched.
///
/// # Examples:
/// ```
/// use application_tracker::canonical::strip_suffix;
///
/// assert_eq!(strip_suffix("Acme Pte. Ltd."), ("Acme".to_string(), Some("pte ltd")));
/// assert_eq!(strip_suffix("Costco"), ("Costco".to_string(), None));
/// ```
pub fn strip_suffix(name: &str) -> (String, Option<&'static str>) {
    for (label, regex) in SUFFIX_PATTERNS.iter() {
        if let Some(m) = regex.find(name) {
            return (name[..m.start()].to_string(), Some(*label));
        }
    }

    (name.to_string(), None)
}

/// One canonicalization pass: NFC → strip invisibles → strip suffix →
/// collapse whitespace → trim + lowercase → strip leading "the ".
fn canonical_pass(name: &str) -> String {
    let composed: String = name.nfc().collect();
    let visible: String = composed.chars().filter(|c| !is_invisible(*c)).collect();
    let (without_suffix, _) = strip_suffix(&visible);

    // split_whitespace also trims both ends
    let collapsed = without_suffix.split_whitespace().collect::<Vec<_>>().join(" ");
    let lowered = collapsed.to_lowercase();

    match lowered.strip_prefix("the ") {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}

/// Clean and normalize a company name for deduplication.
///
/// Returns an empty string when nothing canonical is left ("", "   ",
/// "Ltd."); callers must skip empty keys.
///
/// A single pass removes at most one suffix and one leading "the ". Passes
/// repeat until the output is stable, so the result is idempotent:
/// "Acme Co Ltd" → "acme co" → "acme", "The The Widget" → "the widget" →
/// "widget".
///
/// # Examples:
/// ```
/// use application_tracker::canonical::clean_company_name;
///
/// assert_eq!(clean_company_name("Acme Corp."), "acme");
/// assert_eq!(clean_company_name("The Widget Co"), "widget");
/// assert_eq!(clean_company_name("Ltd."), "");
/// ```
pub fn clean_company_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let mut current = canonical_pass(name);
    loop {
        // After the first pass every step only removes characters, so this
        // converges.
        let next = canonical_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

// ============================================================================
// TESTS
// ============================================================================
