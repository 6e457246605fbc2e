//! Fake Tackle application.
//!
//! [`FakeTackle`] implements [`TackleDriver`](crate::driver::TackleDriver)
//! over an in-memory model of the UI: login, perspectives, list views with
//! pagination, sorting, filters and expandable rows, creation forms, confirm
//! dialogs and the proxy page. It renders PatternFly markup into a small DOM
//! queried with a CSS subset, so the same selectors work against it and
//! against a real browser.

mod app;
mod dom;
mod model;
mod render;
mod selector;

pub use app::{FakeTackle, ProxyEntry, ProxySnapshot, BASE_URL};
pub use model::EntityKind;
