//! Wire types for the Vietstock finance portal.
//!
//! Shared between the client and the CLI: the cached [`Session`], request
//! parameter vocabularies in [`params`], and typed [`records`] for every JSON
//! endpoint the client maps.

pub mod date;
pub mod de;
pub mod params;
pub mod records;
mod session;

pub use params::{DocumentType, FinancialPeriod, FinancialReportType, OrderDir, Period, Resolution};
pub use records::*;
pub use session::{Credentials, Session};
