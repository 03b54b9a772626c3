//! Studio host for the canvas editor core.
//!
//! The [`canvas`] crate is pure and synchronous. This crate wraps it in an
//! [`session::EditingSession`] that performs the I/O the core cannot:
//! fetching and decoding assets, asking the backend for placement hints,
//! and running background removal. Backend access is configured from the
//! environment by [`config::StudioConfig`].

pub mod config;
pub mod services;
pub mod session;
