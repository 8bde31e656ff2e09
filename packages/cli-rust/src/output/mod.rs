//! Output utilities for CLI commands
//!
//! Spinners for remote calls, cluster/bucket tables, error formatting with
//! tips, and the prefixed status lines every command prints.

pub mod errors;
pub mod spinner;
pub mod tables;

pub use errors::format_error;
pub use spinner::spin;
pub use tables::{bucket_table, cluster_table};

use console::style;

/// `Success: <msg>` on stdout unless quiet
pub fn success(quiet: bool, msg: &str) {
    if !quiet {
        println!("{} {msg}", style("Success:").green().bold());
    }
}

/// `Warning: <msg>` on stderr, even when quiet
pub fn warning(msg: &str) {
    eprintln!("{} {msg}", style("Warning:").yellow().bold());
}

/// Plain informational line on stdout unless quiet
pub fn info(quiet: bool, msg: &str) {
    if !quiet {
        println!("{msg}");
    }
}
