// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_CATEGORY: &str = "Other";
pub const DEFAULT_TAG_COLOR: &str = "#cccccc";

/// A stored profit/loss record. `id` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub category: String,
    pub subject: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub currency: String,
    pub profit_loss: Decimal,
    pub note: Option<String>,
}

impl LedgerEntry {
    pub fn from_draft(id: i64, draft: EntryDraft) -> Self {
        LedgerEntry {
            id,
            date: draft.date,
            category: draft.category,
            subject: draft.subject,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            currency: draft.currency,
            profit_loss: draft.profit_loss,
            note: draft.note,
        }
    }

    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            date: self.date,
            category: self.category.clone(),
            subject: self.subject.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            currency: self.currency.clone(),
            profit_loss: self.profit_loss,
            note: self.note.clone(),
        }
    }
}

/// An entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub date: NaiveDate,
    pub category: String,
    pub subject: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub currency: String,
    pub profit_loss: Decimal,
    pub note: Option<String>,
}

impl EntryDraft {
    /// Zero quantity/price/profit, default category, given currency.
    pub fn new(date: NaiveDate, subject: impl Into<String>, currency: impl Into<String>) -> Self {
        EntryDraft {
            date,
            category: DEFAULT_CATEGORY.to_string(),
            subject: subject.into(),
            quantity: Decimal::ZERO,
            unit_price: Decimal::ZERO,
            currency: currency.into(),
            profit_loss: Decimal::ZERO,
            note: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_trade(mut self, quantity: Decimal, unit_price: Decimal) -> Self {
        self.quantity = quantity;
        self.unit_price = unit_price;
        self
    }

    pub fn with_profit_loss(mut self, profit_loss: Decimal) -> Self {
        self.profit_loss = profit_loss;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub description: String,
}

/// Partial tag edit; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

impl TagPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none() && self.description.is_none()
    }
}

/// Columns that may appear in filters and sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    Category,
    Subject,
    Quantity,
    UnitPrice,
    Currency,
    ProfitLoss,
    Note,
}

impl Field {
    pub fn column(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Category => "category",
            Field::Subject => "subject",
            Field::Quantity => "quantity",
            Field::UnitPrice => "unit_price",
            Field::Currency => "currency",
            Field::ProfitLoss => "profit_loss",
            Field::Note => "note",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Field::Quantity | Field::UnitPrice | Field::ProfitLoss)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "date" => Ok(Field::Date),
            "category" => Ok(Field::Category),
            "subject" => Ok(Field::Subject),
            "quantity" | "qty" => Ok(Field::Quantity),
            "unit_price" | "price" => Ok(Field::UnitPrice),
            "currency" | "ccy" => Ok(Field::Currency),
            "profit_loss" | "pnl" => Ok(Field::ProfitLoss),
            "note" => Ok(Field::Note),
            other => Err(format!("Unknown field '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
    /// Case-insensitive substring match.
    Contains,
}

impl FilterOp {
    pub fn sql(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
            FilterOp::Contains => "LIKE",
        }
    }
}

impl FromStr for FilterOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "=" | "==" | "eq" => Ok(FilterOp::Eq),
            ">=" | "gte" => Ok(FilterOp::Gte),
            "<=" | "lte" => Ok(FilterOp::Lte),
            "~" | "like" | "contains" => Ok(FilterOp::Contains),
            other => Err(format!("Unknown operator '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterValue {
    Text(String),
    Number(Decimal),
    Date(NaiveDate),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<Decimal> for FilterValue {
    fn from(d: Decimal) -> Self {
        FilterValue::Number(d)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(d: NaiveDate) -> Self {
        FilterValue::Date(d)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(s) => f.write_str(s),
            FilterValue::Number(d) => write!(f, "{}", d),
            FilterValue::Date(d) => write!(f, "{}", d),
        }
    }
}

/// One `(field, operator, value)` condition; a filter list is a conjunction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: Field,
    pub op: FilterOp,
    pub value: FilterValue,
}

impl Filter {
    pub fn new(field: Field, op: FilterOp, value: impl Into<FilterValue>) -> Self {
        Filter {
            field,
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: Field, value: impl Into<FilterValue>) -> Self {
        Filter::new(field, FilterOp::Eq, value)
    }

    pub fn gte(field: Field, value: impl Into<FilterValue>) -> Self {
        Filter::new(field, FilterOp::Gte, value)
    }

    pub fn lte(field: Field, value: impl Into<FilterValue>) -> Self {
        Filter::new(field, FilterOp::Lte, value)
    }

    pub fn contains(field: Field, value: impl Into<FilterValue>) -> Self {
        Filter::new(field, FilterOp::Contains, value)
    }
}

/// Parses `field<op>value`, e.g. `date>=2024-01-01`, `subject~aaa`.
impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // leftmost operator wins; at the same offset ">=" beats "="
        let (pos, token) = [">=", "<=", "==", "=", "~"]
            .into_iter()
            .filter_map(|t| s.find(t).map(|p| (p, t)))
            .min_by_key(|(p, t)| (*p, Reverse(t.len())))
            .ok_or_else(|| format!("Invalid filter '{}', expected FIELD<op>VALUE", s))?;
        let field: Field = s[..pos].parse()?;
        let op: FilterOp = token.parse()?;
        let value = s[pos + token.len()..].trim().to_string();
        Ok(Filter::new(field, op, value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: Field,
    pub descending: bool,
}

impl SortOrder {
    pub fn asc(field: Field) -> Self {
        SortOrder {
            field,
            descending: false,
        }
    }

    pub fn desc(field: Field) -> Self {
        SortOrder {
            field,
            descending: true,
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::desc(Field::Date)
    }
}

/// Inclusive date bounds; `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        DateRange::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn filters(&self) -> Vec<Filter> {
        let mut out = Vec::new();
        if let Some(start) = self.start {
            out.push(Filter::gte(Field::Date, start));
        }
        if let Some(end) = self.end {
            out.push(Filter::lte(Field::Date, end));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filter_expressions() {
        let f: Filter = "date>=2024-01-01".parse().unwrap();
        assert_eq!(f.field, Field::Date);
        assert_eq!(f.op, FilterOp::Gte);
        assert_eq!(f.value, FilterValue::Text("2024-01-01".into()));

        let f: Filter = "pnl<=-5".parse().unwrap();
        assert_eq!(f.field, Field::ProfitLoss);
        assert_eq!(f.op, FilterOp::Lte);
        assert_eq!(f.value, FilterValue::Text("-5".into()));

        let f: Filter = "subject~aaa".parse().unwrap();
        assert_eq!(f.op, FilterOp::Contains);

        let f: Filter = "currency=USD".parse().unwrap();
        assert_eq!(f.op, FilterOp::Eq);

        let f: Filter = "note~a=b".parse().unwrap();
        assert_eq!(f.field, Field::Note);
        assert_eq!(f.value, FilterValue::Text("a=b".into()));
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!("password=1".parse::<Filter>().is_err());
        assert!("subject".parse::<Filter>().is_err());
    }
}
