/// Coin purse arithmetic - breakdown, conversion, parsing and formatting
use log::warn;

use super::errors::LedgerError;
use super::types::Denomination;

// ============================================================================
// Conversion
// ============================================================================

/// Split a copper total into coins, highest denomination first.
///
/// Denominations are emitted (zero counts included) until the remainder
/// reaches zero; the rest are omitted. A total of 0 therefore yields a
/// single `(Platinum, 0)` entry.
pub fn balance_breakdown(total_copper: u64) -> Vec<(Denomination, u64)> {
    let mut breakdown = Vec::with_capacity(Denomination::ALL.len());
    let mut remainder = total_copper;
    for denomination in Denomination::ALL {
        let value = denomination.value();
        let count = remainder / value;
        breakdown.push((denomination, count));
        remainder -= count * value;
        if remainder == 0 {
            break;
        }
    }
    breakdown
}

/// Whole coins of `denomination` the total is worth; 0 when unrecognized.
pub fn balance_in(total_copper: u64, denomination: &str) -> u64 {
    match Denomination::lookup(denomination) {
        Some(d) => total_copper / d.value(),
        None => 0,
    }
}

/// Accumulate `(denomination, count)` increments onto a copper total.
///
/// Unknown denominations are skipped with a warning; the rest of the batch
/// still applies.
pub fn add_currency<S: AsRef<str>>(current_copper: u64, increments: &[(S, u64)]) -> u64 {
    increments
        .iter()
        .fold(current_copper, |total, (name, count)| {
            match Denomination::lookup(name.as_ref()) {
                Some(d) => total.saturating_add(d.value().saturating_mul(*count)),
                None => {
                    warn!(
                        "ignoring unknown denomination '{}' (x{})",
                        name.as_ref(),
                        count
                    );
                    total
                }
            }
        })
}

/// Total copper value of already-parsed coins.
pub fn total_copper(coins: &[(Denomination, u64)]) -> u64 {
    coins
        .iter()
        .fold(0u64, |acc, (d, n)| acc.saturating_add(d.value().saturating_mul(*n)))
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse a coin amount typed by a user.
///
/// Accepted forms: a bare copper count (`537`), symbol suffixes (`5g 3s 7c`,
/// `5g3s`) and spelled out pairs (`5 gold 3 silver`, `1 platinum`).
pub fn parse_currency(input: &str) -> Result<Vec<(Denomination, u64)>, LedgerError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(LedgerError::InvalidCurrency("empty amount".to_string()));
    }

    if let Ok(copper) = input.parse::<u64>() {
        return Ok(vec![(Denomination::Copper, copper)]);
    }

    let mut coins = Vec::new();
    let mut pending: Option<u64> = None;
    for token in tokenize(input) {
        match (token, pending.take()) {
            (Token::Number(n), None) => pending = Some(n),
            (Token::Number(_), Some(prev)) => {
                return Err(LedgerError::InvalidCurrency(format!(
                    "missing denomination after {}",
                    prev
                )))
            }
            (Token::Word(word), Some(amount)) => {
                let denomination = Denomination::lookup(&word).ok_or_else(|| {
                    LedgerError::InvalidCurrency(format!("unknown denomination '{}'", word))
                })?;
                coins.push((denomination, amount));
            }
            (Token::Word(word), None) => {
                return Err(LedgerError::InvalidCurrency(format!(
                    "expected a number before '{}'",
                    word
                )))
            }
        }
    }

    if let Some(amount) = pending {
        return Err(LedgerError::InvalidCurrency(format!(
            "missing denomination after {}",
            amount
        )));
    }
    Ok(coins)
}

#[derive(Debug, PartialEq)]
enum Token {
    Number(u64),
    Word(String),
}

/// Split `5g 3 silver` into number and word tokens regardless of spacing.
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() || c == ',' {
            chars.next();
        } else if c.is_ascii_digit() {
            let mut digits = String::new();
            while let Some(&d) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                digits.push(d);
                chars.next();
            }
            // Saturate absurd inputs rather than rejecting them
            tokens.push(Token::Number(digits.parse().unwrap_or(u64::MAX)));
        } else {
            let mut word = String::new();
            while let Some(&w) = chars.peek() {
                if w.is_whitespace() || w.is_ascii_digit() || w == ',' {
                    break;
                }
                word.push(w);
                chars.next();
            }
            tokens.push(Token::Word(word));
        }
    }
    tokens
}

// ============================================================================
// Display formatting
// ============================================================================

/// Format a breakdown as `platinum: 1, gold: 2, silver: 0`.
pub fn format_breakdown(breakdown: &[(Denomination, u64)]) -> String {
    breakdown
        .iter()
        .map(|(d, n)| format!("{}: {}", d, n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compact purse display such as `5g 3s 7c`; zero counts are skipped.
pub fn format_coins(total_copper: u64) -> String {
    let parts: Vec<String> = balance_breakdown(total_copper)
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .map(|(d, n)| format!("{}{}", n, d.symbol()))
        .collect();
    if parts.is_empty() {
        "0 copper".to_string()
    } else {
        parts.join(" ")
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
