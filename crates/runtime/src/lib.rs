//! Browser automation for vietstock-rs.
//!
//! [`Automation`] and [`BrowserContext`] describe the capability session
//! acquisition needs. [`ChromiumAutomation`] implements it over the Chrome
//! DevTools Protocol when the `chromium` feature is enabled (the default).

mod automation;
#[cfg(feature = "chromium")]
mod chromium;
mod error;

pub use automation::{Automation, BrowserContext, CookiePair, LaunchOptions, NavigateOptions, ObservedRequest, RequestSink, WaitUntil};
#[cfg(feature = "chromium")]
pub use chromium::ChromiumAutomation;
pub use error::{Error, Result};
