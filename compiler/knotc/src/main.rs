//! Knot CLI
//!
//! `knot run FILE`, `knot check FILE`, `knot vars PATTERN`.

use clap::{Arg, ArgAction, ArgMatches, Command};
use knot_match::{MatchOptions, OrBindings};
use knotc::commands::{check_file, print_vars, run_file};

static SUBCOMMAND_RUN: &str = "run";
static SUBCOMMAND_CHECK: &str = "check";
static SUBCOMMAND_VARS: &str = "vars";

static ARG_FILE: &str = "file";
static ARG_PATTERN: &str = "pattern";
static ARG_LENIENT_OR: &str = "lenient-or";
static ARG_LOG: &str = "log";

fn command() -> Command {
    Command::new("knot")
        .bin_name("knot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("compile and run match.scm-style pattern matchers")
        .disable_help_subcommand(true)
        .subcommand_required(true)
        .arg(
            Arg::new(ARG_LENIENT_OR)
                .long("lenient-or")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Allow `or` branches that bind different variables"),
        )
        .arg(
            Arg::new(ARG_LOG)
                .long("log")
                .global(true)
                .value_name("FILTER")
                .help("Log filter, e.g. knot_match=debug (default: $KNOT_LOG)"),
        )
        .subcommand(
            Command::new(SUBCOMMAND_RUN)
                .about("Run a match script and print each result")
                .arg(Arg::new(ARG_FILE).required(true).value_name("FILE")),
        )
        .subcommand(
            Command::new(SUBCOMMAND_CHECK)
                .about("Compile every pattern in a match script")
                .arg(Arg::new(ARG_FILE).required(true).value_name("FILE")),
        )
        .subcommand(
            Command::new(SUBCOMMAND_VARS)
                .about("Print the variables a pattern binds")
                .arg(Arg::new(ARG_PATTERN).required(true).value_name("PATTERN")),
        )
}

fn options(matches: &ArgMatches) -> MatchOptions {
    let or_bindings = if matches.get_flag(ARG_LENIENT_OR) {
        OrBindings::Lenient
    } else {
        OrBindings::Strict
    };
    MatchOptions::new().with_or_bindings(or_bindings)
}

fn run(matches: &ArgMatches) -> i32 {
    let options = options(matches);
    if let Some(matches) = matches.subcommand_matches(SUBCOMMAND_RUN) {
        match matches.get_one::<String>(ARG_FILE) {
            Some(path) => run_file(path, options),
            None => 2,
        }
    } else if let Some(matches) = matches.subcommand_matches(SUBCOMMAND_CHECK) {
        match matches.get_one::<String>(ARG_FILE) {
            Some(path) => check_file(path, options),
            None => 2,
        }
    } else if let Some(matches) = matches.subcommand_matches(SUBCOMMAND_VARS) {
        match matches.get_one::<String>(ARG_PATTERN) {
            Some(pattern) => print_vars(pattern),
            None => 2,
        }
    } else {
        2
    }
}

fn main() {
    let matches = command().get_matches();
    knotc::init_tracing(matches.get_one::<String>(ARG_LOG).map(String::as_str));
    std::process::exit(run(&matches));
}
