//! Command table and parsing
//!
//! Maps hub command events onto the typed [`Command`] enum and provides the
//! help metadata registered with the hub.

use crate::error::{Result, StockError};
use plugin_core::{CommandEvent, CommandMetadata};

/// Reply flavour for stock quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// Open, current and percent change
    Plain,
    /// Glyph-decorated current price and absolute change
    Stonk,
}

/// Parsed command from a hub event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Stock quote for a ticker
    Stock { query: String, style: QuoteStyle },
    /// Crypto price for `[EXCHANGE:]TICKER[/CURRENCY]`
    Crypto { query: String },
    /// List supported crypto exchanges
    Exchanges,
    /// List crypto pairs of an exchange
    Symbols { exchange: String },
}

/// `(name, short help, full help)` for every registered command
const COMMANDS: &[(&str, &str, &str)] = &[
    ("stock", "<ticker>", "Returns current stock price for given ticker"),
    ("stocks", "<ticker>", "Returns current stock price for given ticker"),
    ("stonk", "<ticker>", "Returns current stonk price for given ticker"),
    ("stonks", "<ticker>", "Returns current stonk price for given ticker"),
    (
        "crypto",
        "[<exchange>:]<symbol>[/<conversion>]",
        "Returns current crypto price for given symbol",
    ),
    ("exchange", "", "Returns supported crypto exchanges"),
    (
        "symbols",
        "<exchange>",
        "Returns supported crypto symbols for a given exchange",
    ),
];

impl Command {
    /// Parse a hub event; `None` for commands this plugin does not handle
    pub fn from_event(event: &CommandEvent) -> Option<Self> {
        Self::parse(&event.command, &event.arg)
    }

    /// Parse a command name and its raw argument
    pub fn parse(name: &str, arg: &str) -> Option<Self> {
        let command = match name {
            "stock" | "stocks" => Command::Stock {
                query: normalize(arg),
                style: QuoteStyle::Plain,
            },
            "stonk" | "stonks" => Command::Stock {
                query: normalize(arg),
                style: QuoteStyle::Stonk,
            },
            "crypto" => Command::Crypto {
                query: arg.trim().to_string(),
            },
            "exchange" => Command::Exchanges,
            "symbols" => Command::Symbols {
                exchange: normalize(arg),
            },
            _ => return None,
        };
        Some(command)
    }

    /// Metadata registered with the hub
    pub fn registrations() -> Vec<CommandMetadata> {
        COMMANDS
            .iter()
            .map(|(name, short, full)| CommandMetadata::new(*name, *short, *full))
            .collect()
    }

    /// `Usage: stock <ticker>`
    pub fn usage(name: &str) -> String {
        let short = COMMANDS
            .iter()
            .find(|(registered, _, _)| *registered == name)
            .map_or("", |(_, short, _)| *short);
        format!("Usage: {name} {short}").trim_end().to_string()
    }

    /// Name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Stock {
                style: QuoteStyle::Plain,
                ..
            } => "stock",
            Command::Stock {
                style: QuoteStyle::Stonk,
                ..
            } => "stonk",
            Command::Crypto { .. } => "crypto",
            Command::Exchanges => "exchange",
            Command::Symbols { .. } => "symbols",
        }
    }
}

/// Crypto lookup target parsed from `[EXCHANGE:]TICKER[/CURRENCY]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoQuery {
    pub exchange: String,
    pub ticker: String,
    pub currency: String,
}

impl CryptoQuery {
    /// Parse a crypto argument, filling in the defaults for missing parts
    pub fn parse(input: &str, default_exchange: &str, default_currency: &str) -> Result<Self> {
        let upper = normalize(input);

        let (exchange, rest) = match upper.split_once(':') {
            Some((exchange, rest)) => (exchange, rest),
            None => (default_exchange, upper.as_str()),
        };
        let (ticker, currency) = rest.split_once('/').unwrap_or((rest, default_currency));

        if exchange.is_empty() || ticker.is_empty() || currency.is_empty() {
            return Err(StockError::InvalidSymbol(input.trim().to_string()));
        }

        Ok(Self {
            exchange: exchange.to_string(),
            ticker: ticker.to_string(),
            currency: currency.to_string(),
        })
    }

    /// Pair as listed in the exchange symbol table, e.g. `BTC/USD`
    pub fn display_symbol(&self) -> String {
        format!("{}/{}", self.ticker, self.currency)
    }
}

/// Trim and uppercase a ticker argument
pub fn normalize(arg: &str) -> String {
    arg.trim().to_uppercase()
}
