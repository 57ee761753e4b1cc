//! Command handlers for the `knot` CLI.
//!
//! Each handler reports its own errors on stderr and returns the process
//! exit code.

mod check;
mod run;
mod vars;

pub use check::check_file;
pub use run::run_file;
pub use vars::print_vars;

/// Read a script, or report why it could not be read.
pub(super) fn read_file(path: &str) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("error: {msg}");
            None
        }
    }
}
