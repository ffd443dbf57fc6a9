//! Bistro Core - Shared domain types.
//!
//! This crate provides the types shared by every Bistro component:
//! - `server` - HTTP backend (users, carts, menu, payments)
//! - `cli` - Migrations, admin bootstrap, menu seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, roles and price conversion

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
