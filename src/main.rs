//! Command-line dispatcher for the pipeline. All user-facing formatting lives
//! here; the stages themselves are the pure functions of the library.

use std::error::Error;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::{filter, prelude::*};

use relang::prelude::*;

fn cli() -> Command {
    Command::new("relang")
        .about("regular expressions and finite automata, the classical way")
        .subcommand_required(true)
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("debug"),
        )
        .subcommand(
            Command::new("build")
                .about("builds an ε-NFA from a regular expression")
                .arg(Arg::new("pattern").required(true))
                .arg(Arg::new("name").long("name").default_value("")),
        )
        .subcommand(
            Command::new("determinize")
                .about("reads an NFA description and determinizes it")
                .arg(Arg::new("file").required(true)),
        )
        .subcommand(
            Command::new("minimize")
                .about("reads a DFA description and minimizes it")
                .arg(Arg::new("file").required(true))
                .arg(
                    Arg::new("rename")
                        .long("rename")
                        .action(ArgAction::SetTrue)
                        .help("relabel the result as q0, q1, …"),
                ),
        )
        .subcommand(
            Command::new("extract")
                .about("reads a DFA description and extracts a regular expression")
                .arg(Arg::new("file").required(true)),
        )
        .subcommand(
            Command::new("roundtrip")
                .about("minimize, extract, rebuild, determinize and minimize again")
                .arg(Arg::new("file").required(true)),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    match matches.subcommand() {
        Some(("build", sub)) => {
            let pattern = sub.get_one::<String>("pattern").unwrap();
            let name = sub.get_one::<String>("name").unwrap();
            let nfa = thompson::build(pattern, name)?;
            println!("{nfa}");
        }
        Some(("determinize", sub)) => {
            let file = sub.get_one::<String>("file").unwrap();
            let nfa = nfa_from_path(file, file)?;
            println!("{nfa}");
            if nfa.has_epsilon() {
                println!("\n{}", "ε-closures:".bold());
                println!("{}", epsilon_closure_listing(&nfa));
            }
            println!("\n{}", "Determinized:".bold());
            println!("{}", determinize(&nfa));
        }
        Some(("minimize", sub)) => {
            let file = sub.get_one::<String>("file").unwrap();
            let dfa = dfa_from_path(file, file)?;
            println!("{dfa}");
            match minimize(&dfa) {
                Minimization::AlreadyMinimal => {
                    println!("\n{}", "already minimal".green());
                }
                Minimization::Minimized(mut minimal) => {
                    if sub.get_flag("rename") {
                        minimal = rename_states(&minimal);
                    }
                    println!("\n{}", "Minimized:".bold());
                    println!("{minimal}");
                }
            }
        }
        Some(("extract", sub)) => {
            let file = sub.get_one::<String>("file").unwrap();
            let dfa = dfa_from_path(file, file)?;
            println!("{dfa}");
            println!("\n{}", "Extracted:".bold());
            println!("{}", extract_regex(&dfa));
        }
        Some(("roundtrip", sub)) => {
            let file = sub.get_one::<String>("file").unwrap();
            let dfa = dfa_from_path(file, file)?;
            println!("{}", "Input:".bold());
            println!("{dfa}");

            let minimal = minimize(&dfa).unwrap_or(dfa);
            let regex = extract_regex(&minimal);
            println!("\n{}", "Extracted:".bold());
            println!("{regex}");

            debug!("rebuilding an NFA from `{regex}`");
            let rebuilt = thompson::build(&regex, file)?;
            let redet = determinize(&rebuilt);
            let reminimal = minimize(&redet).unwrap_or(redet);
            println!("\n{}", "Round-tripped:".bold());
            println!("{}", rename_states(&reminimal));
        }
        _ => unreachable!("a subcommand is required"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    setup_logging(&matches);
    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
