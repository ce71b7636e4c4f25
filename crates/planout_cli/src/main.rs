//! PlanOut CLI
//!
//! Evaluates experiment definitions and prints parameter assignments.

use planout_cli::commands::{list_operators, run_file};
use planout_cli::experiment::parse_run_args;
use planout_cli::init_tracing;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "run" => {
            let (path, options) = match parse_run_args(&args[2..]) {
                Ok(parsed) => parsed,
                Err(message) => {
                    eprintln!("error: {message}");
                    eprintln!("Usage: planout run <experiment.json> [options]");
                    std::process::exit(1);
                }
            };
            run_file(&path, &options);
        }
        "ops" => {
            list_operators();
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-V" => {
            println!("planout {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("PlanOut experiment interpreter");
    println!();
    println!("Usage: planout <command> [options]");
    println!();
    println!("Commands:");
    println!("  run <experiment.json>  Evaluate an experiment and print its assignment");
    println!("  ops                    List the operator vocabulary");
    println!("  help                   Show this help message");
    println!("  version                Show version information");
    println!();
    println!("Run options:");
    println!("  --salt=<salt>          Replace the experiment salt");
    println!("  --input <name=value>   Set an input (value parsed as JSON, else a string)");
    println!("  --override <name=value>  Force a parameter to a value");
    println!("  --pretty               Pretty-print the result");
    println!();
    println!("Examples:");
    println!("  planout run button.json --input userid=42");
    println!("  planout run button.json --input userid=42 --override color='\"red\"'");
    println!("  planout ops");
    println!();
    println!("Set RUST_LOG=debug to trace evaluation.");
}
