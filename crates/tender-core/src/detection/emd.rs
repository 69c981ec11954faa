use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::window_after;
use crate::model::EmdAmount;

static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bEMD\b|\bEarnest\s+Money\s+Deposit\b").expect("EMD label pattern")
});

static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9][0-9,]*(?:\.[0-9]+)?").expect("amount pattern"));

static CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)₹|\bRs\b\.?|\bINR\b").expect("currency pattern"));

/// Find the EMD amount: the first number within `window` characters after an
/// "EMD" / "Earnest Money Deposit" label.
///
/// Labels are tried in text order and the first one whose window holds a
/// number wins. Thousands separators are stripped ("50,000/-" -> 50000).
pub fn detect_emd(text: &str, window: usize) -> Option<EmdAmount> {
    LABEL.find_iter(text).find_map(|label| {
        let win = window_after(text, label.end(), window);
        let number = AMOUNT.find(win)?;
        let value = parse_amount(number.as_str())?;
        let currency = CURRENCY
            .find(&win[..number.start()])
            .map(|_| "INR".to_string());
        Some(EmdAmount { value, currency })
    })
}

/// Parse a numeric token, dropping thousands separators.
fn parse_amount(token: &str) -> Option<Decimal> {
    let digits: String = token.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&digits).ok()
}
