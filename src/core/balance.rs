use crate::core::debt::Debt;
use crate::core::person::PersonId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net position of each person in a group.
///
/// A positive balance means the person is owed money overall (net creditor).
/// A negative balance means the person owes money overall (net debtor).
/// Zero means settled.
///
/// Entries are kept in lexical `PersonId` order. That order is what the
/// simplifier walks when pairing debtors with creditors, so results are
/// reproducible regardless of the order debts were recorded in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances {
    positions: BTreeMap<PersonId, Decimal>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive balances from a list of debts.
    pub fn from_debts(debts: &[Debt]) -> Self {
        let mut balances = Self::new();
        for debt in debts {
            balances.apply_debt(debt);
        }
        balances
    }

    /// Apply a debt: `from` goes down, `to` goes up. Self-loops net to zero.
    pub fn apply_debt(&mut self, debt: &Debt) {
        *self
            .positions
            .entry(debt.from().clone())
            .or_insert(Decimal::ZERO) -= debt.amount();
        *self
            .positions
            .entry(debt.to().clone())
            .or_insert(Decimal::ZERO) += debt.amount();
    }

    /// Net position of a person; zero if they never appeared.
    pub fn get(&self, person: &PersonId) -> Decimal {
        self.positions
            .get(person)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// All positions, including settled ones, in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = (&PersonId, Decimal)> {
        self.positions.iter().map(|(p, &v)| (p, v))
    }

    /// People with a negative balance, in lexical order.
    pub fn debtors(&self) -> Vec<(PersonId, Decimal)> {
        self.filtered(|v| v < Decimal::ZERO)
    }

    /// People with a positive balance, in lexical order.
    pub fn creditors(&self) -> Vec<(PersonId, Decimal)> {
        self.filtered(|v| v > Decimal::ZERO)
    }

    fn filtered(&self, keep: impl Fn(Decimal) -> bool) -> Vec<(PersonId, Decimal)> {
        self.positions
            .iter()
            .filter(|(_, v)| keep(**v))
            .map(|(p, &v)| (p.clone(), v))
            .collect()
    }

    /// Sum of all positions.
    pub fn sum(&self) -> Decimal {
        self.positions.values().sum()
    }

    /// Money is conserved: every credit has a matching debit.
    pub fn is_balanced(&self) -> bool {
        self.sum() == Decimal::ZERO
    }

    /// True when nobody owes anything.
    pub fn is_settled(&self) -> bool {
        self.positions.values().all(|v| v.is_zero())
    }

    /// Total that has to change hands to settle the group.
    /// Equal to the sum of positive positions (and of |negative| ones).
    pub fn total_outstanding(&self) -> Decimal {
        self.positions
            .values()
            .filter(|v| **v > Decimal::ZERO)
            .sum()
    }

    /// Compare non-zero positions only. People who appear with a zero
    /// balance on one side and not at all on the other are equal here.
    pub fn net_equal(&self, other: &Balances) -> bool {
        let non_zero = |b: &Balances| -> Vec<(PersonId, Decimal)> {
            b.positions
                .iter()
                .filter(|(_, v)| !v.is_zero())
                .map(|(p, &v)| (p.clone(), v.normalize()))
                .collect()
        };
        non_zero(self) == non_zero(other)
    }
}
