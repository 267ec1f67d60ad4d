//! Random debt networks for benchmarks and manual testing.

use crate::core::debt::Debt;
use crate::core::money::{validate_amount, AmountError};
use crate::core::person::PersonId;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

/// Settings that cannot produce a network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("invalid amount bound: {0}")]
    Amount(#[from] AmountError),
    #[error("minimum amount {0} is below one cent")]
    BelowOneCent(Decimal),
    #[error("minimum amount {min} exceeds maximum amount {max}")]
    InvertedRange { min: Decimal, max: Decimal },
}

/// Configuration for generating a random group of debts.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Number of people in the group.
    pub people: usize,
    /// Number of debts to generate.
    pub debts: usize,
    /// Smallest debt, in whole currency units.
    pub min_amount: Decimal,
    /// Largest debt, in whole currency units.
    pub max_amount: Decimal,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            people: 10,
            debts: 30,
            min_amount: Decimal::from(1),
            max_amount: Decimal::from(500),
        }
    }
}

impl NetworkConfig {
    /// Check the amount range, returning it in whole cents.
    ///
    /// Both bounds must be valid debt amounts, the minimum at least one
    /// cent, and the minimum no larger than the maximum.
    pub fn cent_range(&self) -> Result<(i64, i64), GeneratorError> {
        let min = validate_amount(self.min_amount)?;
        let max = validate_amount(self.max_amount)?;
        if min > max {
            return Err(GeneratorError::InvertedRange { min, max });
        }
        let min_cents = to_cents(min)?;
        if min_cents < 1 {
            return Err(GeneratorError::BelowOneCent(min));
        }
        Ok((min_cents, to_cents(max)?))
    }
}

/// Generate random debts between distinct people, amounts in whole cents.
///
/// Returns an empty list when fewer than two people are configured.
pub fn generate_random_debts(config: &NetworkConfig) -> Result<Vec<Debt>, GeneratorError> {
    generate_with_rng(config, &mut rand::thread_rng())
}

/// Same as [`generate_random_debts`] with a caller-supplied RNG, so runs
/// can be reproduced with a seeded generator.
pub fn generate_with_rng<R: Rng + ?Sized>(
    config: &NetworkConfig,
    rng: &mut R,
) -> Result<Vec<Debt>, GeneratorError> {
    let (min_cents, max_cents) = config.cent_range()?;
    if config.people < 2 {
        return Ok(Vec::new());
    }

    let people: Vec<PersonId> = (0..config.people)
        .map(|i| PersonId::new(format!("person-{:03}", i)))
        .collect();

    let mut debts = Vec::with_capacity(config.debts);
    for _ in 0..config.debts {
        let from = rng.gen_range(0..people.len());
        let mut to = rng.gen_range(0..people.len());
        while to == from {
            to = rng.gen_range(0..people.len());
        }

        let cents = rng.gen_range(min_cents..=max_cents);
        debts.push(Debt::transfer(
            people[from].clone(),
            people[to].clone(),
            Decimal::new(cents, 2),
        ));
    }

    Ok(debts)
}

// Bounds are validated amounts, so whole cents always fit in an i64.
fn to_cents(value: Decimal) -> Result<i64, GeneratorError> {
    (value * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .ok_or(GeneratorError::Amount(AmountError::TooLarge(value)))
}
