use crate::core::balance::Balances;
use crate::core::debt::Debt;
use crate::core::money::{validate_amount, AmountError};
use crate::core::person::PersonId;
use crate::core::request::{MoneyRequest, RequestId, RequestStatus};
use crate::optimization::simplify::{DebtSimplifier, SimplificationResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(Uuid);

impl GroupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for GroupId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Errors raised when a group operation is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("{0} is already a member of this group")]
    DuplicateMember(String),
    #[error("{0} is not a member of this group")]
    UnknownMember(PersonId),
    #[error("{0} cannot owe themselves")]
    SelfDebt(PersonId),
    #[error("no debt at index {index} (group has {len})")]
    DebtIndexOutOfRange { index: usize, len: usize },
    #[error("money request {0} not found")]
    RequestNotFound(RequestId),
    #[error("money request {id} is already {status}")]
    RequestNotPending { id: RequestId, status: RequestStatus },
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// A group of people sharing expenses.
///
/// Holds the ordered member list, the outstanding debts and any money
/// requests. All edits go through methods that validate their input, and
/// deserialized groups are checked by the same rules, so the debt list
/// only ever contains positive amounts between distinct members.
///
/// # Examples
///
/// ```
/// use settle_up::core::group::Group;
/// use rust_decimal_macros::dec;
///
/// let mut group = Group::new("Ski trip", "alice").unwrap();
/// let alice = group.add_member("alice").unwrap();
/// let bob = group.add_member("bob").unwrap();
///
/// group.add_debt(&alice, &bob, dec!(10)).unwrap();
/// group.add_debt(&bob, &alice, dec!(4)).unwrap();
///
/// let result = group.simplify();
/// assert_eq!(result.transfer_count(), 1);
/// assert_eq!(group.debts()[0].amount(), dec!(6));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GroupRecord")]
pub struct Group {
    id: GroupId,
    name: String,
    members: Vec<PersonId>,
    debts: Vec<Debt>,
    #[serde(default)]
    requests: Vec<MoneyRequest>,
    created_at: DateTime<Utc>,
    created_by: String,
}

impl Group {
    /// Create an empty group.
    pub fn new(name: &str, created_by: impl Into<String>) -> Result<Self, GroupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GroupError::EmptyName);
        }
        Ok(Self {
            id: GroupId::new(),
            name: name.to_string(),
            members: Vec::new(),
            debts: Vec::new(),
            requests: Vec::new(),
            created_at: Utc::now(),
            created_by: created_by.into(),
        })
    }

    // --- Accessors ---

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[PersonId] {
        &self.members
    }

    pub fn debts(&self) -> &[Debt] {
        &self.debts
    }

    pub fn requests(&self) -> &[MoneyRequest] {
        &self.requests
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    pub fn is_member(&self, person: &PersonId) -> bool {
        self.members.contains(person)
    }

    // --- Members ---

    /// Add a member. Names are trimmed and compared case-insensitively.
    pub fn add_member(&mut self, name: &str) -> Result<PersonId, GroupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GroupError::EmptyName);
        }
        if self.members.iter().any(|m| m.matches(name)) {
            return Err(GroupError::DuplicateMember(name.to_string()));
        }
        let person = PersonId::new(name);
        self.members.push(person.clone());
        Ok(person)
    }

    fn require_member(&self, person: &PersonId) -> Result<(), GroupError> {
        if self.is_member(person) {
            Ok(())
        } else {
            Err(GroupError::UnknownMember(person.clone()))
        }
    }

    fn check_pair(&self, from: &PersonId, to: &PersonId) -> Result<(), GroupError> {
        self.require_member(from)?;
        self.require_member(to)?;
        if from == to {
            return Err(GroupError::SelfDebt(from.clone()));
        }
        Ok(())
    }

    // --- Debts ---

    /// Record that `from` owes `to` the given amount.
    pub fn add_debt(
        &mut self,
        from: &PersonId,
        to: &PersonId,
        amount: Decimal,
    ) -> Result<&Debt, GroupError> {
        self.check_pair(from, to)?;
        let debt = Debt::new(from.clone(), to.clone(), amount)?;
        self.debts.push(debt);
        Ok(&self.debts[self.debts.len() - 1])
    }

    /// Remove the debt at `index` in the current list.
    pub fn remove_debt(&mut self, index: usize) -> Result<Debt, GroupError> {
        if index >= self.debts.len() {
            return Err(GroupError::DebtIndexOutOfRange {
                index,
                len: self.debts.len(),
            });
        }
        Ok(self.debts.remove(index))
    }

    /// Current net position of every person touched by a debt.
    pub fn balances(&self) -> Balances {
        Balances::from_debts(&self.debts)
    }

    /// Replace the debt list with its simplified equivalent.
    pub fn simplify(&mut self) -> SimplificationResult {
        let result = DebtSimplifier::run(&self.debts);
        self.debts = result.transfers().to_vec();
        result
    }

    // --- Money requests ---

    /// `from` asks `to` for money. Returns the id of the pending request.
    pub fn request_money(
        &mut self,
        from: &PersonId,
        to: &PersonId,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<RequestId, GroupError> {
        self.check_pair(from, to)?;
        let amount = validate_amount(amount)?;
        let request = MoneyRequest::new(from.clone(), to.clone(), amount, description);
        let id = request.id();
        self.requests.push(request);
        Ok(id)
    }

    pub fn request(&self, id: RequestId) -> Option<&MoneyRequest> {
        self.requests.iter().find(|r| r.id() == id)
    }

    fn pending_request_mut(&mut self, id: RequestId) -> Result<&mut MoneyRequest, GroupError> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(GroupError::RequestNotFound(id))?;
        if !request.is_pending() {
            return Err(GroupError::RequestNotPending {
                id,
                status: request.status(),
            });
        }
        Ok(request)
    }

    /// Approve a pending request and record the resulting debt.
    pub fn approve_request(&mut self, id: RequestId) -> Result<&Debt, GroupError> {
        let request = self.pending_request_mut(id)?;
        let debt = request.as_debt()?;
        request.set_status(RequestStatus::Approved);
        self.debts.push(debt);
        Ok(&self.debts[self.debts.len() - 1])
    }

    pub fn reject_request(&mut self, id: RequestId) -> Result<(), GroupError> {
        self.pending_request_mut(id)?
            .set_status(RequestStatus::Rejected);
        Ok(())
    }

    /// Pending requests `person` has been asked to pay.
    pub fn pending_requests_to(&self, person: &PersonId) -> Vec<&MoneyRequest> {
        self.requests
            .iter()
            .filter(|r| r.is_pending() && r.to() == person)
            .collect()
    }

    /// Pending requests `person` has sent.
    pub fn pending_requests_from(&self, person: &PersonId) -> Vec<&MoneyRequest> {
        self.requests
            .iter()
            .filter(|r| r.is_pending() && r.from() == person)
            .collect()
    }
}

/// Unchecked wire form of a [`Group`].
#[derive(Deserialize)]
struct GroupRecord {
    id: GroupId,
    name: String,
    members: Vec<PersonId>,
    debts: Vec<Debt>,
    #[serde(default)]
    requests: Vec<MoneyRequest>,
    created_at: DateTime<Utc>,
    created_by: String,
}

impl TryFrom<GroupRecord> for Group {
    type Error = GroupError;

    /// Rebuild the group through the same checks as the editing methods.
    fn try_from(record: GroupRecord) -> Result<Self, Self::Error> {
        let mut group = Group::new(&record.name, record.created_by)?;
        group.id = record.id;
        group.created_at = record.created_at;

        for member in &record.members {
            group.add_member(member.as_str())?;
        }
        for debt in record.debts {
            group.check_pair(debt.from(), debt.to())?;
            group.debts.push(debt);
        }
        for request in record.requests {
            group.check_pair(request.from(), request.to())?;
            validate_amount(request.amount())?;
            group.requests.push(request);
        }
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn group_with(members: &[&str]) -> Group {
        let mut group = Group::new("Flat 4B", "tester").unwrap();
        for m in members {
            group.add_member(m).unwrap();
        }
        group
    }

    fn p(name: &str) -> PersonId {
        PersonId::new(name)
    }

    #[test]
    fn test_new_group_trims_name() {
        let group = Group::new("  Road trip ", "alice").unwrap();
        assert_eq!(group.name(), "Road trip");
        assert!(group.members().is_empty());
        assert!(group.debts().is_empty());
        assert_eq!(Group::new("   ", "alice").unwrap_err(), GroupError::EmptyName);
    }

    #[test]
    fn test_add_member_rejects_duplicates() {
        let mut group = group_with(&["Alice"]);
        assert_eq!(
            group.add_member("alice"),
            Err(GroupError::DuplicateMember("alice".to_string()))
        );
        assert_eq!(group.add_member(""), Err(GroupError::EmptyName));
        assert_eq!(group.add_member(" bob ").unwrap(), p("bob"));
        assert_eq!(group.members(), &[p("Alice"), p("bob")]);
    }

    #[test]
    fn test_add_debt_validates() {
        let mut group = group_with(&["A", "B"]);
        assert_eq!(
            group.add_debt(&p("A"), &p("Z"), dec!(5)).unwrap_err(),
            GroupError::UnknownMember(p("Z"))
        );
        assert_eq!(
            group.add_debt(&p("A"), &p("A"), dec!(5)).unwrap_err(),
            GroupError::SelfDebt(p("A"))
        );
        assert_eq!(
            group.add_debt(&p("A"), &p("B"), dec!(0)).unwrap_err(),
            GroupError::Amount(AmountError::NotPositive(dec!(0)))
        );
        assert!(group.debts().is_empty());

        group.add_debt(&p("A"), &p("B"), dec!(5)).unwrap();
        assert_eq!(group.debts().len(), 1);
    }

    #[test]
    fn test_remove_debt() {
        let mut group = group_with(&["A", "B"]);
        group.add_debt(&p("A"), &p("B"), dec!(5)).unwrap();
        group.add_debt(&p("B"), &p("A"), dec!(2)).unwrap();

        let removed = group.remove_debt(0).unwrap();
        assert_eq!(removed.amount(), dec!(5));
        assert_eq!(group.debts().len(), 1);
        assert_eq!(
            group.remove_debt(3),
            Err(GroupError::DebtIndexOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn test_simplify_replaces_debts() {
        let mut group = group_with(&["A", "B", "C"]);
        group.add_debt(&p("A"), &p("B"), dec!(10)).unwrap();
        group.add_debt(&p("B"), &p("C"), dec!(10)).unwrap();
        group.add_debt(&p("C"), &p("A"), dec!(10)).unwrap();

        let result = group.simplify();
        assert_eq!(result.original_count(), 3);
        assert!(group.debts().is_empty());
        assert!(group.balances().is_settled());
    }

    #[test]
    fn test_approve_request_adds_debt() {
        let mut group = group_with(&["alice", "bob"]);
        let id = group
            .request_money(&p("alice"), &p("bob"), dec!(15), Some("tickets".into()))
            .unwrap();
        assert_eq!(group.pending_requests_to(&p("bob")).len(), 1);
        assert_eq!(group.pending_requests_from(&p("alice")).len(), 1);

        let debt = group.approve_request(id).unwrap().clone();
        assert_eq!(debt.from(), &p("bob"));
        assert_eq!(debt.to(), &p("alice"));
        assert_eq!(group.request(id).unwrap().status(), RequestStatus::Approved);
        assert!(group.pending_requests_to(&p("bob")).is_empty());
        assert_eq!(group.balances().get(&p("alice")), dec!(15));
    }

    #[test]
    fn test_request_transitions_only_from_pending() {
        let mut group = group_with(&["alice", "bob"]);
        let id = group
            .request_money(&p("alice"), &p("bob"), dec!(15), None)
            .unwrap();
        group.reject_request(id).unwrap();
        assert!(group.debts().is_empty());

        assert_eq!(
            group.approve_request(id).unwrap_err(),
            GroupError::RequestNotPending {
                id,
                status: RequestStatus::Rejected
            }
        );
        let missing = RequestId::new();
        assert_eq!(
            group.reject_request(missing),
            Err(GroupError::RequestNotFound(missing))
        );
    }

    #[test]
    fn test_request_validates_amount_and_members() {
        let mut group = group_with(&["alice", "bob"]);
        assert!(group
            .request_money(&p("alice"), &p("bob"), dec!(-1), None)
            .is_err());
        assert!(group
            .request_money(&p("alice"), &p("carol"), dec!(1), None)
            .is_err());
        assert!(group.requests().is_empty());
    }

    fn tampered(edit: impl FnOnce(&mut serde_json::Value)) -> Result<Group, serde_json::Error> {
        let mut group = group_with(&["alice", "bob"]);
        group.add_debt(&p("alice"), &p("bob"), dec!(12)).unwrap();
        group
            .request_money(&p("bob"), &p("alice"), dec!(3), None)
            .unwrap();
        let mut value = serde_json::to_value(&group).unwrap();
        edit(&mut value);
        serde_json::from_value(value)
    }

    #[test]
    fn test_deserialize_round_trip() {
        let group = tampered(|_| {}).unwrap();
        assert_eq!(group.members(), &[p("alice"), p("bob")]);
        assert_eq!(group.debts().len(), 1);
        assert_eq!(group.requests().len(), 1);
    }

    #[test]
    fn test_deserialize_rejects_invalid_groups() {
        let err = tampered(|v| v["members"] = json!(["alice", "ALICE ", "bob"])).unwrap_err();
        assert!(err.to_string().contains("already a member"));

        let err = tampered(|v| {
            v["debts"] = json!([{"from": "alice", "to": "alice", "amount": "5"}])
        })
        .unwrap_err();
        assert!(err.to_string().contains("cannot owe themselves"));

        let err = tampered(|v| {
            v["debts"] = json!([{"from": "alice", "to": "zed", "amount": "5"}])
        })
        .unwrap_err();
        assert!(err.to_string().contains("zed is not a member"));

        let err = tampered(|v| v["requests"][0]["to"] = json!("bob")).unwrap_err();
        assert!(err.to_string().contains("bob cannot owe themselves"));

        let err = tampered(|v| v["requests"][0]["amount"] = json!("-3")).unwrap_err();
        assert!(err.to_string().contains("must be positive"));

        let err = tampered(|v| v["name"] = json!("  ")).unwrap_err();
        assert!(err.to_string().contains("name must not be empty"));
    }
}
