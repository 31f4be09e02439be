//! Ticker extraction from free tweet text.

use std::collections::HashSet;

/// Extract valid ticker symbols from tweet text.
///
/// A whitespace-separated word is a candidate only if it contains a `$`
/// marker. The marker and all ASCII punctuation are stripped, the remainder
/// is uppercased, and the symbol is kept only if present in `reference`.
/// Duplicates collapse; empty input yields an empty set.
pub fn extract_tickers(text: &str, reference: &HashSet<String>) -> HashSet<String> {
    let mut tickers = HashSet::new();

    for word in text.split_whitespace() {
        if !word.contains('$') {
            continue;
        }

        let symbol: String = word
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect::<String>()
            .to_uppercase();

        if reference.contains(&symbol) {
            tickers.insert(symbol);
        }
    }

    tickers
}
