//! tackle-e2e: browser-driven end-to-end suites for Tackle
//!
//! A utility layer over the Tackle web UI: list-view navigation, table
//! pagination, column extraction and sort verification, toolbar filters,
//! row actions and a bulk fixture lifecycle, plus page objects for the
//! entities the suites create.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────────────────────────┐   ┌───────────────┐
//! │  suites   │──►│ models · lifecycle · filter  │──►│    Session    │
//! │ (harness) │   │ table · page_object · sort   │   │ (wait, views) │
//! └───────────┘   └──────────────────────────────┘   └──────┬────────┘
//!                                                           │ TackleDriver
//!                                          ┌────────────────┴─────────────┐
//!                                          │ ChromiumDriver │ FakeTackle  │
//!                                          └──────────────────────────────┘
//! ```
//!
//! Every wait is a bounded poll on a concrete condition; rows are found by
//! business key at the moment they are acted on.

#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod config;
mod driver;
mod locator;
mod result;
mod session;
mod wait;

pub mod data;
pub mod filter;
pub mod harness;
pub mod lifecycle;
pub mod models;
pub mod page_object;
pub mod sort;
pub mod suites;
pub mod table;
pub mod views;

/// In-process fake of the Tackle UI
pub mod mock;

/// Chromium over CDP
#[cfg(feature = "browser")]
pub mod browser;

#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use config::{TackleConfig, Timeouts};
pub use driver::{Cookie, DriverConfig, ElementHandle, Key, TackleDriver};
pub use harness::{RunObserver, Suite, SuiteResults, SuiteRunner, TestResult, TestStatus};
pub use lifecycle::{Creatable, Deletable, DeletePlan, RowAction};
pub use locator::{Locator, LocatorOptions, Selector, TextMatch};
pub use page_object::{ListView, UrlMatcher};
pub use result::{TackleError, TackleResult};
pub use session::{Perspective, Session, DEFAULT_PRESERVED_COOKIE, LANDING_HEADING};
pub use sort::{ColumnKind, ColumnValue, SortDirection};
pub use table::Table;
pub use wait::{poll_until, wait_for, wait_until_stable, WaitOptions, WaitResult};

/// Crate-level configuration re-exported as a module for env var names and defaults
pub mod defaults {
    pub use crate::config::{
        DEFAULT_BASE_URL, DEFAULT_COMMAND_TIMEOUT_MS, DEFAULT_LOOKUP_TIMEOUT_MS,
        DEFAULT_POLL_INTERVAL_MS, DEFAULT_SETTLE_MS, DEFAULT_SHORT_TIMEOUT_MS, ENV_GREP_TAGS,
        ENV_NEW_PASS, ENV_PASS, ENV_URL, ENV_USER,
    };
}
