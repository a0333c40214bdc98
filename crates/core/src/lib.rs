//! Session acquisition and typed data access for the Vietstock finance portal.
//!
//! The portal guards its JSON endpoints with a verification token that a
//! browser picks up while loading the home page. [`SessionAcquirer`] drives a
//! browser through [`vietstock_runtime::Automation`] to capture that token and
//! the request headers around it, caching the result in a [`SessionStore`].
//! [`VietstockClient`] replays the session against the data endpoints.
//!
//! ```ignore
//! let config = ClientConfig::default();
//! let acquirer = SessionAcquirer::new(ChromiumAutomation::new(), config.clone());
//! let session = acquirer.acquire(None).await?;
//! let client = VietstockClient::new(config, session)?;
//! let deals = client.stock_deals("FPT").await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod session;

#[cfg(test)]
mod testing;

pub use client::{EventQuery, Memo, TransferQuery, VietstockClient};
pub use config::{ClientConfig, LoginSelectors, MemoConfig};
pub use error::{Error, Result};
pub use session::{AcquireState, Capture, SessionAcquirer, SessionStore, Strategy, TokenMatcher};
pub use vietstock_protocol::{Credentials, Session};
