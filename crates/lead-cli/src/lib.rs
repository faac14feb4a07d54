//! Terminal front end of the lead desk.
//!
//! The binary (`lead-desk`) parses arguments and runs one page controller
//! per command; this library holds the parts that are shared or tested on
//! their own.

pub mod app;
pub mod logging;
pub mod progress;
pub mod render;
pub mod settings;
