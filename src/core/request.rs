use crate::core::debt::Debt;
use crate::core::money::AmountError;
use crate::core::person::PersonId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a money request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// A request from one member asking another to pay them.
///
/// `from` is the member asking for money, `to` is the member expected
/// to pay. Approving the request records the debt `to -> from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyRequest {
    id: RequestId,
    from: PersonId,
    to: PersonId,
    amount: Decimal,
    description: Option<String>,
    status: RequestStatus,
    created_at: DateTime<Utc>,
}

impl MoneyRequest {
    pub(crate) fn new(
        from: PersonId,
        to: PersonId,
        amount: Decimal,
        description: Option<String>,
    ) -> Self {
        Self {
            id: RequestId::new(),
            from,
            to,
            amount,
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
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

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// The debt this request turns into once approved.
    pub fn as_debt(&self) -> Result<Debt, AmountError> {
        Debt::new(self.to.clone(), self.from.clone(), self.amount)
    }

    pub(crate) fn set_status(&mut self, status: RequestStatus) {
        self.status = status;
    }
}
