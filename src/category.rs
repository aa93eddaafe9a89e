//! Parsing of the flat `Name:Amount, Name:Amount` category encoding stored on
//! each summary row.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

const PAIR_SEPARATOR: char = ',';
const AMOUNT_SEPARATOR: char = ':';

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FormatReason {
    EmptyToken,
    MissingSeparator,
    EmptyName,
    InvalidAmount,
}

impl FormatReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyToken => "empty entry",
            Self::MissingSeparator => "missing ':' between name and amount",
            Self::EmptyName => "empty category name",
            Self::InvalidAmount => "amount is not a finite number",
        }
    }
}

impl fmt::Display for FormatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `categories` value that does not follow the `name:amount` encoding.
/// `position` is 1-based over the comma separated entries.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("invalid categories at entry {position} ({token:?}): {reason}")]
pub struct FormatError {
    pub position: usize,
    pub token: String,
    pub reason: FormatReason,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryAmount {
    pub name: String,
    pub amount: f64,
}

/// One pie slice. `percent` is `None` when the aggregate total is not positive.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategorySlice {
    pub name: String,
    pub amount: f64,
    pub percent: Option<f64>,
}

/// Category name to summed amount, kept in first-appearance order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategoryAggregate {
    entries: Vec<CategoryAmount>,
}

impl CategoryAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, amount: f64) {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.amount += amount,
            None => self.entries.push(CategoryAmount {
                name: name.to_string(),
                amount,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.amount)
    }

    pub fn entries(&self) -> &[CategoryAmount] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.amount).sum()
    }

    pub fn slices(&self) -> Vec<CategorySlice> {
        let total = self.total();
        self.entries
            .iter()
            .map(|entry| CategorySlice {
                name: entry.name.clone(),
                amount: entry.amount,
                percent: (total > 0.0).then(|| entry.amount / total * 100.0),
            })
            .collect()
    }
}

impl<'a> FromIterator<(&'a str, f64)> for CategoryAggregate {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut aggregate = CategoryAggregate::new();
        for (name, amount) in iter {
            aggregate.add(name, amount);
        }
        aggregate
    }
}

pub fn parse_categories(raw: &str) -> Result<CategoryAggregate, FormatError> {
    let mut aggregate = CategoryAggregate::new();
    if raw.trim().is_empty() {
        return Ok(aggregate);
    }

    for (idx, token) in raw.split(PAIR_SEPARATOR).enumerate() {
        let (name, amount) = parse_token(token).map_err(|reason| FormatError {
            position: idx + 1,
            token: token.to_string(),
            reason,
        })?;
        aggregate.add(name, amount);
    }
    Ok(aggregate)
}

fn parse_token(token: &str) -> Result<(&str, f64), FormatReason> {
    if token.trim().is_empty() {
        return Err(FormatReason::EmptyToken);
    }
    let (name, amount) = token
        .split_once(AMOUNT_SEPARATOR)
        .ok_or(FormatReason::MissingSeparator)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(FormatReason::EmptyName);
    }
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| FormatReason::InvalidAmount)?;
    if !amount.is_finite() {
        return Err(FormatReason::InvalidAmount);
    }
    Ok((name, amount))
}
