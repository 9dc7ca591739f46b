pub mod catalog;
pub mod config;
pub mod error;
pub mod layout;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod proposals;
pub mod reconcile;
pub mod service;
pub mod setup;
pub mod sticker;
pub mod sync;
pub mod trello;
pub mod webhook;

pub use error::{BoardError, Result};
