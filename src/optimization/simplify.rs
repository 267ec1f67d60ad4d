use crate::core::balance::Balances;
use crate::core::debt::{gross_total, Debt};
use crate::core::person::PersonId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reduce a list of debts to a smaller set of net transfers.
///
/// Convenience wrapper around [`DebtSimplifier::run`] returning only the
/// transfers.
///
/// # Examples
///
/// ```
/// use settle_up::core::debt::Debt;
/// use settle_up::core::person::PersonId;
/// use settle_up::optimization::simplify::simplify;
/// use rust_decimal_macros::dec;
///
/// let a = PersonId::new("A");
/// let b = PersonId::new("B");
/// let debts = vec![
///     Debt::new(a.clone(), b.clone(), dec!(10)).unwrap(),
///     Debt::new(b.clone(), a.clone(), dec!(4)).unwrap(),
/// ];
///
/// let transfers = simplify(&debts);
/// assert_eq!(transfers, vec![Debt::new(a, b, dec!(6)).unwrap()]);
/// ```
pub fn simplify(debts: &[Debt]) -> Vec<Debt> {
    DebtSimplifier::run(debts).transfers
}

/// Result of netting two people's debts against each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BilateralNet {
    pub person_a: PersonId,
    pub person_b: PersonId,
    /// Gross amount A owes B.
    pub gross_a_to_b: Decimal,
    /// Gross amount B owes A.
    pub gross_b_to_a: Decimal,
    /// Positive means A owes B net, negative means B owes A net.
    pub net_amount: Decimal,
    /// Amount that no longer has to move once the pair is netted.
    pub savings: Decimal,
}

/// Outcome of simplifying one group's debt list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplificationResult {
    /// Net transfers that settle every balance.
    transfers: Vec<Debt>,
    /// Balances derived from the input.
    balances: Balances,
    /// Sum of the input debt amounts.
    gross_total: Decimal,
    /// Sum of the transfer amounts.
    net_total: Decimal,
    original_count: usize,
}

impl SimplificationResult {
    pub fn transfers(&self) -> &[Debt] {
        &self.transfers
    }

    pub fn into_transfers(self) -> Vec<Debt> {
        self.transfers
    }

    /// Balances the transfers were computed from.
    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    pub fn gross_total(&self) -> Decimal {
        self.gross_total
    }

    pub fn net_total(&self) -> Decimal {
        self.net_total
    }

    /// Amount that no longer has to change hands.
    pub fn savings(&self) -> Decimal {
        self.gross_total - self.net_total
    }

    /// Savings as a percentage of gross.
    pub fn savings_percent(&self) -> f64 {
        if self.gross_total == Decimal::ZERO {
            return 0.0;
        }
        let pct = self.savings() * Decimal::from(100) / self.gross_total;
        pct.to_string().parse::<f64>().unwrap_or(0.0)
    }

    /// Number of debts before simplification.
    pub fn original_count(&self) -> usize {
        self.original_count
    }

    /// Number of transfers after simplification.
    pub fn transfer_count(&self) -> usize {
        self.transfers.len()
    }

    /// Transfers reproduce the input balances and money is conserved.
    pub fn is_valid(&self) -> bool {
        let after = Balances::from_debts(&self.transfers);
        self.balances.is_balanced() && after.is_balanced() && after.net_equal(&self.balances)
    }
}

/// Greedy debt simplification.
///
/// Not guaranteed to find the minimum number of transfers: that problem
/// is NP-hard in general. The greedy pass is bounded by
/// `debtors + creditors - 1` transfers.
pub struct DebtSimplifier;

impl DebtSimplifier {
    /// Simplify a debt list.
    ///
    /// # Algorithm
    ///
    /// 1. Derive each person's net balance from the debts.
    /// 2. Split people into debtors (balance < 0) and creditors
    ///    (balance > 0), both in lexical `PersonId` order.
    /// 3. Walk both lists with two cursors. Each step settles
    ///    `min(-debt, credit)` from the current debtor to the current
    ///    creditor and advances whichever cursor reached exactly zero
    ///    (possibly both).
    /// 4. Stop when either list is exhausted.
    ///
    /// Amounts are exact decimals, so the zero checks in step 3 are exact.
    pub fn run(debts: &[Debt]) -> SimplificationResult {
        let balances = Balances::from_debts(debts);
        let mut debtors = balances.debtors();
        let mut creditors = balances.creditors();

        log::debug!(
            "simplifying {} debts: {} debtors, {} creditors",
            debts.len(),
            debtors.len(),
            creditors.len()
        );

        let mut transfers = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));
        let (mut i, mut j) = (0, 0);

        while i < debtors.len() && j < creditors.len() {
            let (debtor, debt) = &mut debtors[i];
            let (creditor, credit) = &mut creditors[j];
            let settle = (-*debt).min(*credit);

            log::trace!("transfer {} -> {}: {}", debtor, creditor, settle);
            transfers.push(Debt::transfer(debtor.clone(), creditor.clone(), settle));

            *debt += settle;
            *credit -= settle;

            if debt.is_zero() {
                i += 1;
            }
            if credit.is_zero() {
                j += 1;
            }
        }

        let gross = gross_total(debts);
        let net_total = gross_total(&transfers);
        log::debug!(
            "simplified {} debts into {} transfers (gross {}, net {})",
            debts.len(),
            transfers.len(),
            gross,
            net_total
        );

        SimplificationResult {
            transfers,
            gross_total: gross,
            net_total,
            original_count: debts.len(),
            balances,
        }
    }

    /// Net the debts between two specific people.
    ///
    /// If A owes B 10 and B owes A 4, A owes B 6 net.
    pub fn bilateral(debts: &[Debt], person_a: &PersonId, person_b: &PersonId) -> BilateralNet {
        let mut a_to_b = Decimal::ZERO;
        let mut b_to_a = Decimal::ZERO;

        for debt in debts {
            if debt.from() == person_a && debt.to() == person_b {
                a_to_b += debt.amount();
            } else if debt.from() == person_b && debt.to() == person_a {
                b_to_a += debt.amount();
            }
        }

        let net = a_to_b - b_to_a;
        BilateralNet {
            person_a: person_a.clone(),
            person_b: person_b.clone(),
            gross_a_to_b: a_to_b,
            gross_b_to_a: b_to_a,
            net_amount: net,
            savings: a_to_b + b_to_a - net.abs(),
        }
    }
}

impl std::fmt::Display for SimplificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Simplified Debts ===")?;
        for transfer in &self.transfers {
            writeln!(f, "  {}", transfer)?;
        }
        writeln!(f)?;
        writeln!(f, "Debts before:   {}", self.original_count)?;
        writeln!(f, "Transfers:      {}", self.transfer_count())?;
        writeln!(f, "Gross Total:    {}", self.gross_total)?;
        writeln!(f, "Net Total:      {}", self.net_total)?;
        writeln!(f, "Savings:        {}", self.savings())?;
        writeln!(f, "Savings %:      {:.1}%", self.savings_percent())?;
        writeln!(f, "Valid:          {}", self.is_valid())?;
        Ok(())
    }
}
