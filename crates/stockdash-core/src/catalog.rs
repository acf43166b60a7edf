//! Static category catalog: category key → ordered symbols with display names

/// A browsable category of stocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Lookup key, e.g. `"tech"`
    pub key: &'static str,
    /// Human-readable title
    pub title: &'static str,
    /// Symbols in display order, each with its display name
    pub members: &'static [(&'static str, &'static str)],
}

impl Category {
    /// Symbols in display order
    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.members.iter().map(|(symbol, _)| *symbol)
    }
}

pub static CATEGORIES: &[Category] = &[
    Category {
        key: "tech",
        title: "Technology",
        members: &[
            ("AAPL", "Apple Inc."),
            ("MSFT", "Microsoft Corporation"),
            ("GOOGL", "Alphabet Inc."),
            ("AMZN", "Amazon.com Inc."),
            ("META", "Meta Platforms Inc."),
            ("NVDA", "NVIDIA Corporation"),
        ],
    },
    Category {
        key: "finance",
        title: "Finance",
        members: &[
            ("JPM", "JPMorgan Chase & Co."),
            ("BAC", "Bank of America Corp."),
            ("WFC", "Wells Fargo & Company"),
            ("GS", "Goldman Sachs Group Inc."),
            ("MS", "Morgan Stanley"),
            ("V", "Visa Inc."),
        ],
    },
    Category {
        key: "healthcare",
        title: "Healthcare",
        members: &[
            ("JNJ", "Johnson & Johnson"),
            ("UNH", "UnitedHealth Group Inc."),
            ("PFE", "Pfizer Inc."),
            ("ABBV", "AbbVie Inc."),
            ("MRK", "Merck & Co. Inc."),
            ("LLY", "Eli Lilly and Company"),
        ],
    },
    Category {
        key: "energy",
        title: "Energy",
        members: &[
            ("XOM", "Exxon Mobil Corporation"),
            ("CVX", "Chevron Corporation"),
            ("COP", "ConocoPhillips"),
            ("SLB", "Schlumberger Limited"),
            ("EOG", "EOG Resources Inc."),
            ("OXY", "Occidental Petroleum Corp."),
        ],
    },
    Category {
        key: "consumer",
        title: "Consumer",
        members: &[
            ("WMT", "Walmart Inc."),
            ("PG", "Procter & Gamble Co."),
            ("KO", "The Coca-Cola Company"),
            ("PEP", "PepsiCo Inc."),
            ("COST", "Costco Wholesale Corp."),
            ("NKE", "Nike Inc."),
        ],
    },
    Category {
        key: "auto",
        title: "Automotive",
        members: &[
            ("TSLA", "Tesla Inc."),
            ("F", "Ford Motor Company"),
            ("GM", "General Motors Company"),
            ("TM", "Toyota Motor Corporation"),
            ("RIVN", "Rivian Automotive Inc."),
            ("STLA", "Stellantis N.V."),
        ],
    },
];

/// Find a category by key (case-insensitive)
pub fn find(key: &str) -> Option<&'static Category> {
    let key = key.trim();
    CATEGORIES.iter().find(|c| c.key.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_find_category() {
        let tech = find("TECH").unwrap();
        assert_eq!(tech.title, "Technology");
        assert_eq!(tech.symbols().next(), Some("AAPL"));
        assert!(find("crypto").is_none());
    }

    #[test]
    fn test_keys_and_symbols_unique() {
        let keys: HashSet<_> = CATEGORIES.iter().map(|c| c.key).collect();
        assert_eq!(keys.len(), CATEGORIES.len());

        for category in CATEGORIES {
            let symbols: HashSet<_> = category.symbols().collect();
            assert_eq!(symbols.len(), category.members.len(), "{}", category.key);
        }
    }
}
