//! Field rules for purchase transactions.
//!
//! Every rule is checked independently and each failure yields one
//! [`Violation`]; callers always get the complete set back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::transaction::PurchaseTransaction;

/// Longest accepted description, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 50;

/// Record field a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Description,
    TransactionDate,
    PurchaseAmount,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Description => "description",
            Field::TransactionDate => "transaction_date",
            Field::PurchaseAmount => "purchase_amount",
        }
    }
}

/// The rule that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    DescriptionRequired,
    DescriptionTooLong,
    TransactionDateRequired,
    TransactionDateInFuture,
    PurchaseAmountRequired,
    PurchaseAmountNotPositive,
    PurchaseAmountMalformed,
}

impl Rule {
    pub fn field(&self) -> Field {
        match self {
            Rule::DescriptionRequired | Rule::DescriptionTooLong => Field::Description,
            Rule::TransactionDateRequired | Rule::TransactionDateInFuture => {
                Field::TransactionDate
            }
            Rule::PurchaseAmountRequired
            | Rule::PurchaseAmountNotPositive
            | Rule::PurchaseAmountMalformed => Field::PurchaseAmount,
        }
    }

    /// Stable, human-readable message for this rule.
    pub fn message(&self) -> &'static str {
        match self {
            Rule::DescriptionRequired => "Description is required",
            Rule::DescriptionTooLong => "Description must not exceed 50 characters",
            Rule::TransactionDateRequired => "Transaction date is required",
            Rule::TransactionDateInFuture => "Transaction date cannot be in the future",
            Rule::PurchaseAmountRequired => "Purchase amount is required",
            Rule::PurchaseAmountNotPositive => "Purchase amount must be positive",
            Rule::PurchaseAmountMalformed => {
                "Purchase amount must be rounded to the nearest cent"
            }
        }
    }
}

/// A single failed rule.
///
/// The field is always the one the rule belongs to; deserializing a pair that
/// disagrees is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ViolationRepr")]
pub struct Violation {
    field: Field,
    rule: Rule,
}

/// Wire form of [`Violation`]; `field` may be omitted.
#[derive(Deserialize)]
struct ViolationRepr {
    #[serde(default)]
    field: Option<Field>,
    rule: Rule,
}

impl TryFrom<ViolationRepr> for Violation {
    type Error = String;

    fn try_from(repr: ViolationRepr) -> Result<Self, Self::Error> {
        match repr.field {
            Some(field) if field != repr.rule.field() => Err(format!(
                "rule {:?} applies to {}, not {}",
                repr.rule,
                repr.rule.field().as_str(),
                field.as_str()
            )),
            _ => Ok(Self::new(repr.rule)),
        }
    }
}

impl Violation {
    pub fn new(rule: Rule) -> Self {
        Self {
            field: rule.field(),
            rule,
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn message(&self) -> &'static str {
        self.rule.message()
    }
}

impl core::fmt::Display for Violation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.field.as_str(), self.message())
    }
}

/// All violations found for one record, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn contains(&self, rule: Rule) -> bool {
        self.0.iter().any(|v| v.rule == rule)
    }

    pub fn messages(&self) -> Vec<&'static str> {
        self.0.iter().map(Violation::message).collect()
    }

    /// `Ok(())` when nothing failed, otherwise the collected violations.
    pub fn into_result(self) -> Result<(), Violations> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    fn push(&mut self, rule: Rule) {
        self.0.push(Violation::new(rule));
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl core::fmt::Display for Violations {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (idx, v) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

/// Check every rule against `tx`, treating `today` as the latest allowed date.
pub fn validate(tx: &PurchaseTransaction, today: NaiveDate) -> Violations {
    let mut violations = Violations::default();

    match tx.description() {
        Some(text) => {
            if text.trim().is_empty() {
                violations.push(Rule::DescriptionRequired);
            }
            if text.chars().count() > DESCRIPTION_MAX_CHARS {
                violations.push(Rule::DescriptionTooLong);
            }
        }
        None => violations.push(Rule::DescriptionRequired),
    }

    match tx.transaction_date() {
        Some(date) if date > today => violations.push(Rule::TransactionDateInFuture),
        Some(_) => {}
        None => violations.push(Rule::TransactionDateRequired),
    }

    match tx.amount() {
        Some(amount) => {
            if !amount.is_positive() {
                violations.push(Rule::PurchaseAmountNotPositive);
            }
            if !amount.fits_column() {
                violations.push(Rule::PurchaseAmountMalformed);
            }
        }
        None => violations.push(Rule::PurchaseAmountRequired),
    }

    violations
}
