pub mod health;
pub mod proposals;
pub mod setup;
pub mod stickers;
pub mod sync;
pub mod webhook;
