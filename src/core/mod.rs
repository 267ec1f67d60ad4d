pub mod balance;
pub mod debt;
pub mod group;
pub mod money;
pub mod person;
pub mod request;
