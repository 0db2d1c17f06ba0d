//! Applications shipped with the Chameleon application host
//!
//! [`AppSet`] owns one instance of every app in the [`CATALOG`] and
//! registers them in carousel order.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod catalog;
pub mod clock;
pub mod home;
pub mod placeholder;
pub mod wifi;

pub use catalog::{AppSet, Builtin, CatalogEntry, CATALOG, CATALOG_LEN};
pub use clock::ClockApp;
pub use home::HomeApp;
pub use placeholder::PlaceholderApp;
pub use wifi::WifiApp;
