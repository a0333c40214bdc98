//! Session caching and acquisition.
//!
//! [`SessionStore`] holds at most one cached [`Session`](vietstock_protocol::Session).
//! [`SessionAcquirer`] consults it first and falls back to a browser run that
//! sniffs the verification token from the portal's template fetch.

mod acquirer;
mod store;
mod strategy;
mod token;

#[cfg(test)]
mod tests;

pub use acquirer::SessionAcquirer;
pub use store::SessionStore;
pub use strategy::{AcquireState, Strategy};
pub use token::{Capture, TokenMatcher, form_field};
