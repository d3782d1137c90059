use std::collections::BTreeSet;

/// Trims and lower-cases every raw label, drops the ones left empty and
/// deduplicates the rest.
pub fn normalize<I, S>(raw_labels: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw_labels
        .into_iter()
        .map(|label| label.as_ref().trim().to_lowercase())
        .filter(|label| !label.is_empty())
        .collect()
}

/// Splits a comma-separated metadata value (`"Dog, Park"`) into raw labels.
pub fn split_csv(csv: &str) -> impl Iterator<Item = &str> {
    csv.split(',')
}
