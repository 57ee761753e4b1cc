//! The `check` command: compile every clause pattern of a script without
//! matching anything.

use knot_match::MatchOptions;

use super::read_file;
use crate::Session;

pub fn check_file(path: &str, options: MatchOptions) -> i32 {
    let Some(source) = read_file(path) else {
        return 1;
    };
    match Session::new(options).check(&source) {
        Ok(summary) => {
            println!(
                "{path}: {} match forms, {} clauses, {} record types",
                summary.matches, summary.clauses, summary.records
            );
            0
        }
        Err(err) => {
            eprintln!("{path}: error: {err}");
            1
        }
    }
}
