//! Singular/plural keyword expansion.
//!
//! The index store matches whole tokens only, so a query for `cat` would never
//! find a photo labelled `cats`. Instead of stemming, every keyword is widened
//! with its most likely alternate grammatical number using a small, ordered
//! suffix table. The rules are deliberately approximate: a wrong variant only
//! widens recall of a disjunctive query.

use std::collections::BTreeSet;

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// A suffix rewrite: `<stem><suffix>` becomes `<stem><replacement>` when the
/// stem passes `guard`.
struct SuffixRule {
    suffix: &'static str,
    replacement: &'static str,
    guard: fn(&str) -> bool,
}

impl SuffixRule {
    const fn new(suffix: &'static str, replacement: &'static str) -> Self {
        Self {
            suffix,
            replacement,
            guard: any_stem,
        }
    }

    const fn guarded(
        suffix: &'static str,
        replacement: &'static str,
        guard: fn(&str) -> bool,
    ) -> Self {
        Self {
            suffix,
            replacement,
            guard,
        }
    }

    fn apply(&self, keyword: &str) -> Option<String> {
        let stem = keyword.strip_suffix(self.suffix)?;
        if !(self.guard)(stem) {
            return None;
        }
        Some(format!("{}{}", stem, self.replacement))
    }
}

fn any_stem(_stem: &str) -> bool {
    true
}

/// `y` only pluralises to `ies` after a consonant (`butterfly`, not `boy`).
/// A bare `y` has no preceding character and never matches. Non-letters
/// (`4x4y`) are never consonants.
fn ends_in_consonant(stem: &str) -> bool {
    stem.chars()
        .next_back()
        .is_some_and(|c| c.is_alphabetic() && !VOWELS.contains(&c.to_ascii_lowercase()))
}

/// Plural to singular, tried in order after the naive `s` strip.
const SINGULAR_RULES: &[SuffixRule] = &[
    SuffixRule::new("ies", "y"),
    SuffixRule::new("es", ""),
];

/// Singular to plural, tried in order after the naive `s` append.
const PLURAL_RULES: &[SuffixRule] = &[
    SuffixRule::guarded("y", "ies", ends_in_consonant),
    SuffixRule::new("sh", "shes"),
    SuffixRule::new("ch", "ches"),
    SuffixRule::new("x", "xes"),
    SuffixRule::new("z", "zes"),
    SuffixRule::new("f", "ves"),
    SuffixRule::new("fe", "ves"),
];

/// Returns the keyword itself, its naive alternate number and at most one
/// irregular variant from the first matching rule.
pub fn variants(keyword: &str) -> Vec<String> {
    let (naive, rules) = match keyword.strip_suffix('s') {
        Some(stem) => (stem.to_string(), SINGULAR_RULES),
        None => (format!("{}s", keyword), PLURAL_RULES),
    };

    let extra = rules.iter().find_map(|rule| rule.apply(keyword));

    // "s" or "es" strip down to nothing; an empty variant matches no label.
    std::iter::once(keyword.to_string())
        .chain(Some(naive).into_iter().chain(extra).filter(|v| !v.is_empty()))
        .collect()
}

/// Expands every keyword with its plausible singular/plural forms.
///
/// The result always contains every input keyword.
pub fn expand<I, S>(keywords: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keywords
        .into_iter()
        .flat_map(|keyword| variants(keyword.as_ref()))
        .collect()
}
