//! Output formatting for the CLI.

use myopie::diff::PatchStats;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Non-zero mutation counts of a patch, labelled for people.
pub fn mutation_counts(stats: &PatchStats) -> Vec<(&'static str, usize)> {
    [
        ("inserted", stats.inserted),
        ("moved", stats.moved),
        ("removed", stats.removed),
        ("text updates", stats.text_updates),
        ("attributes set", stats.attrs_set),
        ("attributes removed", stats.attrs_removed),
        ("cleared", stats.cleared),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .collect()
}

/// One `label  count` line per entry, labels padded to a common width and
/// counts right-aligned. An empty slice reads "no changes".
pub fn mutation_summary(counts: &[(&str, usize)]) -> String {
    if counts.is_empty() {
        return "no changes".to_string();
    }
    let label_width = counts.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let count_width = counts
        .iter()
        .map(|(_, count)| count.to_string().len())
        .max()
        .unwrap_or(0);
    counts
        .iter()
        .map(|(label, count)| format!("{label:<label_width$}  {count:>count_width$}"))
        .collect::<Vec<_>>()
        .join("\n")
}
