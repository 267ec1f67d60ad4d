use crate::core::debt::Debt;
use crate::core::money::format_amount;
use crate::core::person::PersonId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One side of a transfer, as seen by a single person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub counterparty: PersonId,
    pub amount: Decimal,
}

/// What a single person has to pay and receive to settle up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSettlement {
    pub pays: Vec<Payment>,
    pub receives: Vec<Payment>,
}

impl PersonSettlement {
    pub fn total_paid(&self) -> Decimal {
        self.pays.iter().map(|p| p.amount).sum()
    }

    pub fn total_received(&self) -> Decimal {
        self.receives.iter().map(|p| p.amount).sum()
    }

    /// Received minus paid. Matches the person's balance.
    pub fn net(&self) -> Decimal {
        self.total_received() - self.total_paid()
    }
}

/// Per-person view of a list of transfers, typically the output of
/// simplification. This is what a member looks at before paying through
/// an external provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettlementPlan {
    people: BTreeMap<PersonId, PersonSettlement>,
}

impl SettlementPlan {
    pub fn from_transfers(transfers: &[Debt]) -> Self {
        let mut people: BTreeMap<PersonId, PersonSettlement> = BTreeMap::new();
        for t in transfers {
            people
                .entry(t.from().clone())
                .or_default()
                .pays
                .push(Payment {
                    counterparty: t.to().clone(),
                    amount: t.amount(),
                });
            people
                .entry(t.to().clone())
                .or_default()
                .receives
                .push(Payment {
                    counterparty: t.from().clone(),
                    amount: t.amount(),
                });
        }
        Self { people }
    }

    pub fn for_person(&self, person: &PersonId) -> Option<&PersonSettlement> {
        self.people.get(person)
    }

    /// Payments `person` has to make.
    pub fn pays(&self, person: &PersonId) -> &[Payment] {
        self.people
            .get(person)
            .map(|s| s.pays.as_slice())
            .unwrap_or(&[])
    }

    /// Payments `person` will receive.
    pub fn receives(&self, person: &PersonId) -> &[Payment] {
        self.people
            .get(person)
            .map(|s| s.receives.as_slice())
            .unwrap_or(&[])
    }

    pub fn net(&self, person: &PersonId) -> Decimal {
        self.people
            .get(person)
            .map(PersonSettlement::net)
            .unwrap_or(Decimal::ZERO)
    }

    /// Total `person` still owes.
    pub fn owed_by(&self, person: &PersonId) -> Decimal {
        self.pays(person).iter().map(|p| p.amount).sum()
    }

    /// Total still owed to `person`.
    pub fn owed_to(&self, person: &PersonId) -> Decimal {
        self.receives(person).iter().map(|p| p.amount).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PersonId, &PersonSettlement)> {
        self.people.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

impl std::fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settle Up ===")?;
        if self.people.is_empty() {
            writeln!(f, "  Everyone is settled.")?;
        }
        for (person, s) in &self.people {
            writeln!(f, "  {}", person)?;
            for p in &s.pays {
                writeln!(f, "    pays     {:<15} {:>12}", p.counterparty.as_str(), format_amount(p.amount))?;
            }
            for p in &s.receives {
                writeln!(f, "    receives {:<15} {:>12}", p.counterparty.as_str(), format_amount(p.amount))?;
            }
        }
        Ok(())
    }
}
