//! nsai - Provision and switch NStream AI clusters
//!
//! This is the main entry point for the Rust CLI binary.

fn main() {
    if let Err(err) = nsai::run() {
        nsai::report_error(&err);
        std::process::exit(1);
    }
}
