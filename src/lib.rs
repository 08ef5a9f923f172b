//! # cclog
//!
//! Load-rule aware change log tracking. See [`cclog_core`] for the library and
//! the `cclog` binary in `cclog-cli` for the command line front end.

pub use cclog_core::*;
