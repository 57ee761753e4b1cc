//! The `vars` command: show what the Variable Extractor reports for one
//! pattern.

use knot_patterns::{extract_vars, parse_pattern, NameSet, Registry};
use knot_reader::read_one;

pub fn print_vars(text: &str) -> i32 {
    let datum = match read_one(text) {
        Ok(datum) => datum,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };
    let pattern = match parse_pattern(&datum, &Registry::with_builtins()) {
        Ok(pattern) => pattern,
        Err(err) => {
            eprintln!("error: {err}");
            return 1;
        }
    };
    for var in extract_vars(&pattern, &NameSet::default()) {
        println!("{}\tacc{}", var.name, var.accumulator.index());
    }
    0
}
