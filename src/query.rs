//! Raw query normalization and tokenization.

/// A single chat input, immutable once built.
///
/// `normalized` is the lowercased, whitespace-collapsed text with currency
/// symbols removed; `tokens` are the whitespace-split words with edge
/// punctuation additionally stripped. Empty input simply produces no tokens.
#[derive(Debug, Clone)]
pub struct Query {
    pub raw: String,
    pub normalized: String,
    pub tokens: Vec<String>,
}

// Stripped from anywhere in the text.
const CURRENCY_SYMBOLS: &[char] = &['$', '%'];
// Stripped only from token edges so decimals like "0.5" survive.
const EDGE_PUNCTUATION: &[char] = &[',', '.', '!', '?', ';', ':', '"', '\''];

impl Query {
    pub fn new(raw: &str) -> Self {
        let normalized = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !CURRENCY_SYMBOLS.contains(c))
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let tokens = normalized
            .split_whitespace()
            .map(clean_token)
            .filter(|t| !t.is_empty())
            .collect();

        Query {
            raw: raw.to_string(),
            normalized,
            tokens,
        }
    }

    /// The raw text with currency symbols dropped but case, spacing and
    /// every operator character intact. This is what the arithmetic
    /// evaluator re-parses.
    pub fn expression_text(&self) -> String {
        self.raw
            .chars()
            .filter(|c| !CURRENCY_SYMBOLS.contains(c))
            .collect::<String>()
            .trim()
            .to_string()
    }
}

fn clean_token(word: &str) -> String {
    word.trim_matches(|c| EDGE_PUNCTUATION.contains(&c))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_collapse() {
        let q = Query::new("  Price   OF  Bitcoin ");
        assert_eq!(q.normalized, "price of bitcoin");
        assert_eq!(q.tokens, vec!["price", "of", "bitcoin"]);
    }

    #[test]
    fn test_strips_currency_symbols_and_punctuation() {
        let q = Query::new("$100 to ETH?");
        assert_eq!(q.tokens, vec!["100", "to", "eth"]);

        let q = Query::new("price of bitcoin!");
        assert_eq!(q.tokens, vec!["price", "of", "bitcoin"]);
    }

    #[test]
    fn test_normalized_is_desymboled() {
        let q = Query::new("$100");
        assert_eq!(q.normalized, "100");
        assert_eq!(q.expression_text(), "100");

        let q = Query::new(" $20 + $5 ");
        assert_eq!(q.normalized, "20 + 5");
        assert_eq!(q.expression_text(), "20 + 5");
    }

    #[test]
    fn test_interior_decimal_point_survives() {
        let q = Query::new("0.5 BTC to ETH.");
        assert_eq!(q.tokens, vec!["0.5", "btc", "to", "eth"]);
    }

    #[test]
    fn test_empty_input() {
        let q = Query::new("   ");
        assert!(q.tokens.is_empty());
        assert!(q.normalized.is_empty());
    }

    #[test]
    fn test_raw_is_preserved() {
        let q = Query::new("  (20 - 5) / 3 ");
        assert_eq!(q.raw, "  (20 - 5) / 3 ");
    }
}
