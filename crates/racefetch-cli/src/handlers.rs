//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod order;
mod run;

pub use order::handle_order;
pub use run::handle_run;
