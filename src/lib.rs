//! # settle-up
//!
//! Group expense ledger with greedy debt simplification.
//!
//! Members of a group record who owes whom. The simplifier replaces
//! that list with a shorter set of net transfers that leaves every
//! member's balance unchanged.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: people, debts, balances, money requests, groups
//! - **optimization** — Debt simplification and per-person settlement plans
//! - **storage** — In-process group repository with JSON persistence
//! - **simulation** — Random debt networks for benchmarks

pub mod core;
pub mod optimization;
pub mod simulation;
pub mod storage;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::Balances;
    pub use crate::core::debt::Debt;
    pub use crate::core::group::{Group, GroupError, GroupId};
    pub use crate::core::money::{format_amount, parse_amount, AmountError};
    pub use crate::core::person::PersonId;
    pub use crate::core::request::{MoneyRequest, RequestId, RequestStatus};
    pub use crate::optimization::settlement::SettlementPlan;
    pub use crate::optimization::simplify::{simplify, DebtSimplifier, SimplificationResult};
    pub use crate::storage::group_store::{GroupStore, StoreError};
}
