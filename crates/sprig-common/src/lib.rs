//! Common utilities for the sprig renderer.
//!
//! This crate provides shared infrastructure used by all pipeline components:
//! - **Warning System** - colored, deduplicated terminal output for recovered errors
//! - **URL Resolution** - resolving `href` values against the document URL
//! - **Networking** - fetching documents and stylesheets (`http(s)`, `file`, `data`)

pub mod net;
pub mod url;
pub mod warning;
