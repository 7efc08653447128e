//! Price arithmetic and storefront formatting.
//!
//! Prices come from the provider as exact decimals. Anything derived from them
//! (currently the monthly equivalent of an annual plan) is computed with
//! `rust_decimal` and formatted with the product's [`PriceFormat`].
//!
//! # Rounding
//!
//! Derived prices are rounded half away from zero to the currency's number of
//! fraction digits: `$99.00 / 12 = $8.25`, `$59.99 / 12 = $4.99916… → $5.00`,
//! `¥6000 / 12 = ¥500`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of months used to spread an annual price.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Where the currency symbol goes relative to the amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    /// `$9.99`
    #[default]
    Prefix,
    /// `9,99 €`
    Suffix,
}

/// Locale conventions used to render a price string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFormat {
    /// ISO 4217 code, e.g. `"USD"`.
    pub currency_code: String,
    /// Symbol printed with the amount, e.g. `"$"`.
    pub symbol: String,
    /// Placement of the symbol.
    #[serde(default)]
    pub symbol_position: SymbolPosition,
    /// Whether a space separates symbol and amount.
    #[serde(default)]
    pub symbol_spacing: bool,
    /// Separator between integer and fraction.
    pub decimal_separator: char,
    /// Thousands separator, if the locale uses one.
    pub grouping_separator: Option<char>,
    /// Number of fraction digits for this currency.
    pub fraction_digits: u32,
}

impl PriceFormat {
    /// US dollars, `en_US`.
    pub fn en_us() -> Self {
        Self {
            currency_code: "USD".to_string(),
            symbol: "$".to_string(),
            symbol_position: SymbolPosition::Prefix,
            symbol_spacing: false,
            decimal_separator: '.',
            grouping_separator: Some(','),
            fraction_digits: 2,
        }
    }

    /// Pounds sterling, `en_GB`.
    pub fn en_gb() -> Self {
        Self {
            currency_code: "GBP".to_string(),
            symbol: "£".to_string(),
            ..Self::en_us()
        }
    }

    /// Euros, `de_DE`.
    pub fn de_de() -> Self {
        Self {
            currency_code: "EUR".to_string(),
            symbol: "€".to_string(),
            symbol_position: SymbolPosition::Suffix,
            symbol_spacing: true,
            decimal_separator: ',',
            grouping_separator: Some('.'),
            fraction_digits: 2,
        }
    }

    /// Japanese yen, `ja_JP`.
    pub fn ja_jp() -> Self {
        Self {
            currency_code: "JPY".to_string(),
            symbol: "¥".to_string(),
            symbol_position: SymbolPosition::Prefix,
            symbol_spacing: false,
            decimal_separator: '.',
            grouping_separator: Some(','),
            fraction_digits: 0,
        }
    }

    /// Round an amount to this currency's precision.
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.fraction_digits, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Render an amount, rounding it first.
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = self.round(amount);
        let plain = format!(
            "{:.prec$}",
            rounded.abs(),
            prec = self.fraction_digits as usize
        );
        let (integer, fraction) = match plain.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (plain.as_str(), None),
        };

        let mut number = self.group(integer);
        if let Some(fraction) = fraction {
            number.push(self.decimal_separator);
            number.push_str(fraction);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let space = if self.symbol_spacing { " " } else { "" };
        match self.symbol_position {
            SymbolPosition::Prefix => format!("{sign}{}{space}{number}", self.symbol),
            SymbolPosition::Suffix => format!("{sign}{number}{space}{}", self.symbol),
        }
    }

    fn group(&self, digits: &str) -> String {
        let Some(separator) = self.grouping_separator else {
            return digits.to_string();
        };

        let len = digits.len();
        let mut out = String::with_capacity(len + len / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(separator);
            }
            out.push(ch);
        }
        out
    }
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self::en_us()
    }
}

/// Monthly equivalent of an annual price, rounded to `fraction_digits`.
pub fn monthly_amount(annual: Decimal, fraction_digits: u32) -> Decimal {
    (annual / Decimal::from(MONTHS_PER_YEAR))
        .round_dp_with_strategy(fraction_digits, RoundingStrategy::MidpointAwayFromZero)
}

/// Monthly equivalent of an annual price, formatted for display.
pub fn monthly_price(annual: Decimal, format: &PriceFormat) -> String {
    format.format(monthly_amount(annual, format.fraction_digits))
}
