use crate::core::money::{validate_amount, AmountError};
use crate::core::person::PersonId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed obligation between two members of a group.
///
/// Represents the fact that `from` owes `to` the given `amount`.
/// The amount is validated when the debt is constructed, so every `Debt`
/// in circulation carries a positive amount.
///
/// Debts are never edited in place. Simplification replaces a group's
/// debt list with a freshly built one.
///
/// # Examples
///
/// ```
/// use settle_up::core::debt::Debt;
/// use settle_up::core::person::PersonId;
/// use rust_decimal_macros::dec;
///
/// let debt = Debt::new(PersonId::new("alice"), PersonId::new("bob"), dec!(10)).unwrap();
/// assert_eq!(debt.amount(), dec!(10));
/// assert!(Debt::new(PersonId::new("alice"), PersonId::new("bob"), dec!(0)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DebtRecord")]
pub struct Debt {
    /// The member who owes.
    from: PersonId,
    /// The member who is owed.
    to: PersonId,
    amount: Decimal,
}

impl Debt {
    pub fn new(from: PersonId, to: PersonId, amount: Decimal) -> Result<Self, AmountError> {
        let amount = validate_amount(amount)?;
        Ok(Self { from, to, amount })
    }

    /// Build a transfer whose amount the caller already knows is positive.
    pub(crate) fn transfer(from: PersonId, to: PersonId, amount: Decimal) -> Self {
        debug_assert!(amount > Decimal::ZERO, "transfer amount must be positive");
        Self { from, to, amount }
    }

    pub fn from(&self) -> &PersonId {
        &self.from
    }

    pub fn to(&self) -> &PersonId {
        &self.to
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// True when a debt points back at its own debtor.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Wire form of a debt, validated on the way in.
#[derive(Deserialize)]
struct DebtRecord {
    from: PersonId,
    to: PersonId,
    amount: Decimal,
}

impl TryFrom<DebtRecord> for Debt {
    type Error = AmountError;

    fn try_from(record: DebtRecord) -> Result<Self, Self::Error> {
        Debt::new(record.from, record.to, record.amount)
    }
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}

/// Sum of all debt amounts.
pub fn gross_total(debts: &[Debt]) -> Decimal {
    debts.iter().map(|d| d.amount()).sum()
}

/// Every person referenced by the debts, sorted and deduplicated.
pub fn people(debts: &[Debt]) -> Vec<PersonId> {
    let mut people: Vec<PersonId> = debts
        .iter()
        .flat_map(|d| [d.from().clone(), d.to().clone()])
        .collect();
    people.sort();
    people.dedup();
    people
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn debt(from: &str, to: &str, amount: Decimal) -> Debt {
        Debt::new(PersonId::new(from), PersonId::new(to), amount).unwrap()
    }

    #[test]
    fn test_debt_creation() {
        let d = debt("A", "B", dec!(12.5));
        assert_eq!(d.from().as_str(), "A");
        assert_eq!(d.to().as_str(), "B");
        assert_eq!(d.amount(), dec!(12.5));
        assert!(!d.is_self_loop());
    }

    #[test]
    fn test_debt_rejects_non_positive() {
        let zero = Debt::new(PersonId::new("A"), PersonId::new("B"), Decimal::ZERO);
        assert_eq!(zero, Err(AmountError::NotPositive(Decimal::ZERO)));

        let negative = Debt::new(PersonId::new("A"), PersonId::new("B"), dec!(-1));
        assert!(negative.is_err());
    }

    #[test]
    fn test_self_loop_is_allowed_here() {
        assert!(debt("A", "A", dec!(5)).is_self_loop());
    }

    #[test]
    fn test_aggregates() {
        let debts = vec![debt("B", "C", dec!(200)), debt("A", "B", dec!(100))];
        assert_eq!(gross_total(&debts), dec!(300));
        assert_eq!(
            people(&debts),
            vec![PersonId::new("A"), PersonId::new("B"), PersonId::new("C")]
        );
        assert_eq!(gross_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(debt("A", "B", dec!(6))).unwrap();
        assert_eq!(json["from"], "A");
        assert_eq!(json["to"], "B");
        assert_eq!(json["amount"], "6");
    }

    #[test]
    fn test_deserialize_validates_amount() {
        let ok: Debt = serde_json::from_str(r#"{"from":"A","to":"B","amount":"4.25"}"#).unwrap();
        assert_eq!(ok.amount(), dec!(4.25));

        let bad = serde_json::from_str::<Debt>(r#"{"from":"A","to":"B","amount":"-4"}"#);
        assert!(bad.is_err());
    }
}
