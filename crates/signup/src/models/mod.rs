//! Data models for the signup service.

pub mod account;

pub use account::Account;
