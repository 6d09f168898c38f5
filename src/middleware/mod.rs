//! Middleware modules for cross-cutting request concerns.

pub mod logging;
