use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ptm_core::{DomainError, DomainResult, Entity, uuid_id};

use crate::amount::PurchaseAmount;
use crate::validation::{self, Violations};

uuid_id! {
    /// Purchase transaction identifier, assigned by the store on first save.
    pub struct PurchaseTransactionId;
}

/// A single purchase: what was bought, when, and for how much.
///
/// Fields start unset and are filled in by the caller. The amount is rounded
/// to whole cents the moment it is assigned, so a record never holds an
/// un-normalized amount, not even before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<PurchaseTransactionId>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    transaction_date: Option<NaiveDate>,
    #[serde(default)]
    purchase_amount: Option<PurchaseAmount>,
}

impl PurchaseTransaction {
    /// Create an empty, never-persisted record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a persisted record from storage.
    pub fn restore(
        id: PurchaseTransactionId,
        description: String,
        transaction_date: NaiveDate,
        purchase_amount: Decimal,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: Some(id),
            description: Some(description),
            transaction_date: Some(transaction_date),
            purchase_amount: Some(PurchaseAmount::new(purchase_amount)?),
        })
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn transaction_date(&self) -> Option<NaiveDate> {
        self.transaction_date
    }

    pub fn amount(&self) -> Option<PurchaseAmount> {
        self.purchase_amount
    }

    /// The stored amount, always carrying two fractional digits.
    pub fn purchase_amount(&self) -> Option<Decimal> {
        self.purchase_amount.map(|a| a.value())
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn set_transaction_date(&mut self, transaction_date: Option<NaiveDate>) {
        self.transaction_date = transaction_date;
    }

    /// Assign the amount, rounding half-up to two places. `None` clears it.
    ///
    /// An amount too large to carry cents is refused and the previous amount
    /// is kept.
    pub fn set_purchase_amount(
        &mut self,
        purchase_amount: impl Into<Option<Decimal>>,
    ) -> DomainResult<()> {
        self.purchase_amount = purchase_amount.into().map(PurchaseAmount::new).transpose()?;
        Ok(())
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.set_description(Some(description.into()));
        self
    }

    pub fn with_transaction_date(mut self, transaction_date: NaiveDate) -> Self {
        self.set_transaction_date(Some(transaction_date));
        self
    }

    pub fn with_purchase_amount(
        mut self,
        purchase_amount: impl Into<Option<Decimal>>,
    ) -> DomainResult<Self> {
        self.set_purchase_amount(purchase_amount)?;
        Ok(self)
    }

    /// Give the record its identity. Identity is write-once: re-assigning the
    /// same id is accepted, a different one is refused.
    pub fn assign_id(&mut self, id: PurchaseTransactionId) -> DomainResult<()> {
        match self.id {
            None => {
                self.id = Some(id);
                Ok(())
            }
            Some(existing) if existing == id => Ok(()),
            Some(existing) => Err(DomainError::invalid_id(format!(
                "purchase transaction already has id {existing}, refusing {id}"
            ))),
        }
    }

    /// Validate against an explicit "today".
    pub fn validate_at(&self, today: NaiveDate) -> Violations {
        validation::validate(self, today)
    }

    /// Validate against the local calendar date.
    pub fn validate(&self) -> Violations {
        self.validate_at(Local::now().date_naive())
    }
}

impl Entity for PurchaseTransaction {
    type Id = PurchaseTransactionId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Rule;
    use chrono::Days;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn with_description(description: Option<&str>) -> PurchaseTransaction {
        let mut tx = PurchaseTransaction::new()
            .with_transaction_date(today())
            .with_purchase_amount(dec!(100.00))
            .unwrap();
        tx.set_description(description.map(str::to_string));
        tx
    }

    fn with_date(date: Option<NaiveDate>) -> PurchaseTransaction {
        let mut tx = PurchaseTransaction::new()
            .with_description("Test")
            .with_purchase_amount(dec!(100.00))
            .unwrap();
        tx.set_transaction_date(date);
        tx
    }

    fn with_amount(amount: Option<Decimal>) -> PurchaseTransaction {
        PurchaseTransaction::new()
            .with_description("Test")
            .with_transaction_date(today())
            .with_purchase_amount(amount)
            .unwrap()
    }

    #[test]
    fn rejects_missing_description() {
        let violations = with_description(None).validate();
        assert!(!violations.is_empty());
        assert!(violations.messages().iter().any(|m| m.contains("Description is required")));
    }

    #[test]
    fn rejects_blank_description() {
        let violations = with_description(Some("   ")).validate();
        assert!(!violations.is_empty());
        assert!(violations.contains(Rule::DescriptionRequired));
    }

    #[test]
    fn rejects_missing_transaction_date() {
        let violations = with_date(None).validate();
        assert!(violations.messages().iter().any(|m| m.contains("Transaction date is required")));
    }

    #[test]
    fn rejects_future_transaction_date() {
        let tomorrow = today().checked_add_days(Days::new(1)).unwrap();
        let violations = with_date(Some(tomorrow)).validate();
        assert!(violations.messages().iter().any(|m| m.contains("cannot be in the future")));
    }

    #[test]
    fn accepts_today_and_past_dates() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let past = today.checked_sub_days(Days::new(30)).unwrap();

        assert!(with_date(Some(today)).validate_at(today).is_empty());
        assert!(with_date(Some(past)).validate_at(today).is_empty());
    }

    #[test]
    fn rejects_missing_amount() {
        let violations = with_amount(None).validate();
        assert!(violations.messages().iter().any(|m| m.contains("Purchase amount is required")));
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        for amount in [Decimal::ZERO, dec!(-50.00)] {
            let violations = with_amount(Some(amount)).validate();
            assert!(
                violations.messages().iter().any(|m| m.contains("must be positive")),
                "{amount} should not be accepted"
            );
        }
    }

    #[test]
    fn rounds_amount_on_assignment() {
        let mut tx = PurchaseTransaction::new();

        tx.set_purchase_amount(dec!(100.126)).unwrap();
        assert_eq!(tx.purchase_amount(), Some(dec!(100.13)));

        tx.set_purchase_amount(dec!(100.124)).unwrap();
        assert_eq!(tx.purchase_amount(), Some(dec!(100.12)));

        tx.set_purchase_amount(dec!(100.125)).unwrap();
        assert_eq!(tx.purchase_amount(), Some(dec!(100.13)));

        tx.set_purchase_amount(None::<Decimal>).unwrap();
        assert_eq!(tx.purchase_amount(), None);
    }

    #[test]
    fn oversized_amount_is_refused_and_previous_kept() {
        let mut tx = with_amount(Some(dec!(42.10)));

        let err = tx.set_purchase_amount(Decimal::MAX).unwrap_err();
        assert!(matches!(err, DomainError::OutOfRange(_)));
        assert_eq!(tx.purchase_amount(), Some(dec!(42.10)));

        let rebuilt = PurchaseTransaction::restore(
            PurchaseTransactionId::generate(),
            "Test".to_string(),
            today(),
            Decimal::MAX,
        );
        assert!(rebuilt.is_err());
    }

    #[test]
    fn revalidating_a_valid_record_stays_clean() {
        let tx = with_amount(Some(dec!(301.84)));
        assert!(tx.validate().is_empty());
        assert!(tx.validate().is_empty());
    }

    #[test]
    fn validation_reports_all_problems_together() {
        let tomorrow = today().checked_add_days(Days::new(1)).unwrap();
        let tx = PurchaseTransaction::new()
            .with_description(" ")
            .with_transaction_date(tomorrow)
            .with_purchase_amount(dec!(-1))
            .unwrap();

        let violations = tx.validate();
        assert_eq!(violations.len(), 3);
        assert!(violations.contains(Rule::DescriptionRequired));
        assert!(violations.contains(Rule::TransactionDateInFuture));
        assert!(violations.contains(Rule::PurchaseAmountNotPositive));
    }

    #[test]
    fn identity_is_write_once() {
        let mut tx = PurchaseTransaction::new();
        assert!(!tx.is_persisted());

        let id = PurchaseTransactionId::generate();
        tx.assign_id(id).unwrap();
        tx.assign_id(id).unwrap();
        assert_eq!(tx.id(), Some(id));

        let err = tx.assign_id(PurchaseTransactionId::generate()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(_)));
        assert_eq!(tx.id(), Some(id));
    }

    #[test]
    fn deserialized_amounts_are_normalized() {
        let tx: PurchaseTransaction = serde_json::from_str(
            r#"{"description":"Equipment","transaction_date":"2025-10-01","purchase_amount":"150.5"}"#,
        )
        .unwrap();

        assert_eq!(tx.id(), None);
        assert_eq!(tx.purchase_amount().map(|a| a.scale()), Some(2));
        assert_eq!(tx.purchase_amount(), Some(dec!(150.50)));
    }

    #[test]
    fn deserializing_an_oversized_amount_fails() {
        let result = serde_json::from_str::<PurchaseTransaction>(
            r#"{"description":"Equipment","transaction_date":"2025-10-01","purchase_amount":"1000000000000000000000000000"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn identifier_round_trips_through_json_and_text() {
        let id = PurchaseTransactionId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        assert_eq!(serde_json::from_str::<PurchaseTransactionId>(&json).unwrap(), id);
        assert_eq!(id.to_string().parse::<PurchaseTransactionId>().unwrap(), id);
    }
}
