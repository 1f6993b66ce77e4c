//! Reply formatting

use crate::api::{CompanyProfile, Quote};

/// Glyphs substituted into "stonk" replies
pub static STONK_GLYPHS: [(char, &str); 14] = [
    ('0', "0\u{fe0f}\u{20e3}"),
    ('1', "1\u{fe0f}\u{20e3}"),
    ('2', "2\u{fe0f}\u{20e3}"),
    ('3', "3\u{fe0f}\u{20e3}"),
    ('4', "4\u{fe0f}\u{20e3}"),
    ('5', "5\u{fe0f}\u{20e3}"),
    ('6', "6\u{fe0f}\u{20e3}"),
    ('7', "7\u{fe0f}\u{20e3}"),
    ('8', "8\u{fe0f}\u{20e3}"),
    ('9', "9\u{fe0f}\u{20e3}"),
    ('-', "\u{2796}"),
    ('+', "\u{2795}"),
    ('.', "\u{23fa}\u{fe0f}"),
    ('$', "\u{1f4b2}"),
];

/// Crypto pair missing from the exchange's symbol table
pub const CRYPTO_NOT_FOUND: &str = "ticker or conversion not found on that exchange";

/// Exchange symbol table could not be fetched
pub const SYMBOLS_FAILED: &str = "failed to look up exchange symbols";

/// Candle lookup came back empty
pub const NO_RESULTS: &str = "no results";

const STONKS: &str = "is STONKS \u{2197}\u{fe0f}";
const NOT_STONKS: &str = "is NOT STONKS \u{2198}\u{fe0f}";

/// Glyph for a single character, if it has one
pub fn stonk_glyph(c: char) -> Option<&'static str> {
    STONK_GLYPHS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, glyph)| *glyph)
}

/// Replace every character that has a stonk glyph
pub fn stonkify(input: &str) -> String {
    let mut output = String::with_capacity(input.len() * 4);
    for c in input.chars() {
        match stonk_glyph(c) {
            Some(glyph) => output.push_str(glyph),
            None => output.push(c),
        }
    }
    output
}

/// Name shown for a quoted company
///
/// Uses the provider's ticker when it resolved one and falls back to the
/// query otherwise.
pub fn display_name(query: &str, profile: &CompanyProfile) -> String {
    let ticker = if profile.ticker.is_empty() {
        query
    } else {
        profile.ticker.as_str()
    };

    if profile.name.is_empty() {
        ticker.to_string()
    } else {
        format!("{} ({ticker})", profile.name)
    }
}

/// `Apple Inc (AAPL) - Open: $150.00, Current: $153.00 (+2.00%)`
pub fn stock_reply(company: &str, quote: &Quote) -> String {
    // Rounded first so a change below half a basis point reads +0.00; adding
    // 0.0 turns -0.0 into 0.0
    let percent = (quote.percent_change() * 100.0).round() / 100.0 + 0.0;
    format!(
        "{company} - Open: ${:.2}, Current: ${:.2} ({percent:+.2}%)",
        quote.open, quote.current,
    )
}

/// Same data, in glyphs
pub fn stonk_reply(company: &str, quote: &Quote) -> String {
    let (phrase, sign) = if quote.is_up() {
        (STONKS, '+')
    } else {
        (NOT_STONKS, '-')
    };

    let current = stonkify(&format!("${:.2}", quote.current));
    let change = stonkify(&format!("{sign}{:.2}", quote.abs_change()));

    format!("{company} {phrase}. {current} ({change})")
}

pub fn not_found_reply(query: &str) -> String {
    format!("Unable to find {query}.")
}

pub fn lookup_failed_reply(query: &str) -> String {
    format!("Unable to look up {query} right now.")
}

/// `BTC/USD - Current: $42010.25 on Coinbase`
pub fn crypto_reply(query: &str, price: f64, exchange: &str) -> String {
    format!(
        "{query} - Current: ${price:.2} on {}",
        title_case(exchange)
    )
}

pub fn exchanges_reply(mut exchanges: Vec<String>) -> String {
    exchanges.sort();
    format!("Supported Exchanges: {}", exchanges.join(", "))
}

pub fn symbols_reply(exchange: &str, mut symbols: Vec<String>) -> String {
    symbols.sort();
    format!(
        "Supported Symbols on {}: {}",
        title_case(exchange),
        symbols.join(", ")
    )
}

pub fn no_symbols_reply(exchange: &str) -> String {
    format!("No symbols found on {}.", title_case(exchange))
}

/// `COINBASE` -> `Coinbase`, `gate io` -> `Gate Io`
pub fn title_case(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
