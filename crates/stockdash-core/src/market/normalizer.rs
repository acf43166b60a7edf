//! Quote normalization: raw provider records → canonical [`Stock`] values

use crate::api::RawQuote;
use crate::catalog::Category;
use crate::model::Stock;
use std::collections::HashMap;

/// Build a `Stock` for one catalog entry from an optional provider quote
///
/// The display name always comes from the catalog. A quote without a usable
/// price yields a zero-valued entry.
pub fn normalize(symbol: &str, display_name: &str, quote: Option<&RawQuote>) -> Stock {
    let Some(quote) = quote else {
        return Stock::unquoted(symbol, display_name);
    };
    let Some(price) = quote.price.or(quote.close) else {
        return Stock::unquoted(symbol, display_name);
    };

    let change = quote
        .change
        .or_else(|| Some(quote.close? - quote.open?))
        .unwrap_or(0.0);

    let change_percent = quote.change_percent.unwrap_or_else(|| {
        let previous = price - change;
        if previous == 0.0 {
            0.0
        } else {
            change / previous * 100.0
        }
    });

    Stock::new(symbol, display_name, price, change, change_percent)
}

/// Reconcile a provider batch against a category, preserving catalog order
///
/// Symbols missing from `quotes` are kept as zero-valued entries, and
/// quotes for symbols outside the category are ignored.
pub fn normalize_category(category: &Category, quotes: &[RawQuote]) -> Vec<Stock> {
    let mut by_symbol: HashMap<String, &RawQuote> = HashMap::with_capacity(quotes.len());
    for quote in quotes {
        by_symbol
            .entry(quote.symbol.trim().to_ascii_uppercase())
            .or_insert(quote);
    }

    category
        .members
        .iter()
        .map(|(symbol, name)| normalize(symbol, name, by_symbol.get(*symbol).copied()))
        .collect()
}
