//! Static currency catalog: codes, symbols and descriptions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Uah,
    Usd,
    Eur,
    Gbp,
    Pln,
    Chf,
}

impl Currency {
    pub const ALL: [Currency; 6] = [
        Currency::Uah,
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Pln,
        Currency::Chf,
    ];

    /// ISO 4217 code, the unique key used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Uah => "UAH",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Pln => "PLN",
            Currency::Chf => "CHF",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Uah => "₴",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Pln => "zł",
            Currency::Chf => "₣",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Currency::Uah => "Ukrainian hryvnia",
            Currency::Usd => "United States dollar",
            Currency::Eur => "Euro",
            Currency::Gbp => "British pound sterling",
            Currency::Pln => "Polish złoty",
            Currency::Chf => "Swiss franc",
        }
    }

    /// Case-insensitive lookup by ISO code.
    pub fn from_code(code: &str) -> Option<Currency> {
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.code().eq_ignore_ascii_case(code.trim()))
    }

    /// The catalog restricted to the runtime-configured subset, in
    /// catalog order.
    pub fn available(subset: &[Currency]) -> Vec<Currency> {
        Currency::ALL
            .iter()
            .copied()
            .filter(|c| subset.contains(c))
            .collect()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s).ok_or_else(|| format!("unknown currency code: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_code_is_case_insensitive() {
        assert_eq!(Currency::from_code("eur"), Some(Currency::Eur));
        assert_eq!(Currency::from_code("USD"), Some(Currency::Usd));
        assert_eq!(Currency::from_code(" chf "), Some(Currency::Chf));
        assert_eq!(Currency::from_code("BTC"), None);
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<_> = Currency::ALL.iter().map(|c| c.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), Currency::ALL.len());
    }

    #[test]
    fn test_available_preserves_catalog_order() {
        let subset = [Currency::Chf, Currency::Uah, Currency::Eur];
        assert_eq!(
            Currency::available(&subset),
            vec![Currency::Uah, Currency::Eur, Currency::Chf]
        );
    }

    #[test]
    fn test_serde_uses_upper_case_codes() {
        let json = serde_json::to_string(&Currency::Pln).unwrap();
        assert_eq!(json, "\"PLN\"");
        let back: Currency = serde_json::from_str("\"GBP\"").unwrap();
        assert_eq!(back, Currency::Gbp);
    }
}
