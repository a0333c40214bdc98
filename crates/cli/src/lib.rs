//! Command-line front end for `vietstock`.
//!
//! Each invocation acquires (or reuses) one portal session, calls a single
//! endpoint and prints the records in the result envelope from [`output`].

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod settings;
pub mod styles;
