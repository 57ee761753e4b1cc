//! The `run` command: evaluate a match script and print each result.

use knot_match::MatchOptions;

use super::read_file;
use crate::Session;

pub fn run_file(path: &str, options: MatchOptions) -> i32 {
    let Some(source) = read_file(path) else {
        return 1;
    };
    let mut session = Session::new(options);
    match session.run_with(&source, |value| println!("{value}")) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}
