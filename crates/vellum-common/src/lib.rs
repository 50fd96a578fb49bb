//! Common utilities for the vellum converter.
//!
//! This crate provides shared infrastructure used by all conversion components:
//! - **Warnings** - the ordered warning list returned with a conversion, plus
//!   colored, de-duplicated terminal diagnostics
//! - **Net** - fetching remote resources over HTTP(S) and `data:` URLs

pub mod net;
pub mod warning;
