//! settle-up CLI
//!
//! Simplify shared-expense debts from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Settle obligations from a headerless payer,debtor,amount CSV
//! settle-up settle --input expenses.csv
//!
//! # Output as JSON, or the payments as CSV
//! settle-up settle --input expenses.json --format json
//! settle-up settle --input expenses.csv --format csv
//!
//! # Generate a random network for testing
//! settle-up generate --people 10 --obligations 30
//! ```

use settle_up::config::SettleConfig;
use settle_up::core::obligation::ObligationSet;
use settle_up::io::export::{write_obligations_csv, write_payments_csv};
use settle_up::io::ingest::{read_csv, read_json};
use settle_up::optimization::settlement::SettlementEngine;
use settle_up::simulation::stress_test::{generate_random_network, NetworkConfig};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::process;

fn print_usage() {
    eprintln!(
        r#"settle-up — simplify shared-expense debts into the fewest payments

USAGE:
    settle-up <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute the minimal settlement for a list of obligations
    generate    Generate a random obligation network (for testing)
    help        Show this message

OPTIONS (settle):
    --input <FILE>      Path to a .csv (payer,debtor,amount) or .json file
    --format <FORMAT>   Output format: text (default), json or csv
    --scale <N>         Maximum decimal places per amount (default: 2)
    --max-amount <X>    Largest amount a single record may carry (default: 1000000000000)

OPTIONS (generate):
    --people <N>        Number of people (default: 10)
    --obligations <N>   Number of obligations (default: 30)
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG            Log filter, e.g. RUST_LOG=settle_up=debug

EXAMPLES:
    settle-up settle --input trip.csv
    settle-up settle --input trip.csv --format json
    settle-up generate --people 20 --obligations 60 --output test.csv"#
    );
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> String {
    *i += 1;
    args.get(*i)
        .cloned()
        .unwrap_or_else(|| fail(format!("{} requires a value", flag)))
}

fn load_obligations(path: &str, config: &SettleConfig) -> ObligationSet {
    let file = File::open(path).unwrap_or_else(|e| fail(format!("reading '{}': {}", path, e)));
    let reader = BufReader::new(file);

    let is_json = Path::new(path)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let result = if is_json {
        read_json(reader, config)
    } else {
        read_csv(reader, config)
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error parsing '{}': {}", path, e);
        if is_json {
            eprintln!("Expected format:");
            eprintln!(
                r#"{{
  "obligations": [
    {{ "debtor": "Bob", "creditor": "Alice", "amount": "12.50" }}
  ]
}}"#
            );
        } else {
            eprintln!("Expected one 'payer,debtor,amount' record per line, no header.");
        }
        process::exit(1);
    })
}

fn cmd_settle(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut config = SettleConfig::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => input_path = Some(take_value(args, &mut i, "--input")),
            "--format" => format = take_value(args, &mut i, "--format"),
            "--scale" => {
                config.minor_unit_scale = take_value(args, &mut i, "--scale")
                    .parse()
                    .unwrap_or_else(|_| fail("--scale requires a number"));
            }
            "--max-amount" => {
                config.max_amount = take_value(args, &mut i, "--max-amount")
                    .parse()
                    .unwrap_or_else(|_| fail("--max-amount requires a decimal amount"));
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| fail("--input <FILE> is required"));
    let set = load_obligations(&path, &config);
    let report = SettlementEngine::settle(&set).unwrap_or_else(|e| fail(e));

    match format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report).unwrap_or_else(|e| fail(e));
            println!("{}", json);
        }
        "csv" => {
            write_payments_csv(io::stdout().lock(), report.payments()).unwrap_or_else(|e| fail(e));
        }
        "text" => print!("{}", report),
        other => fail(format!("unknown format '{}': expected text, json or csv", other)),
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = NetworkConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--people" => {
                config.people = take_value(args, &mut i, "--people")
                    .parse()
                    .unwrap_or_else(|_| fail("--people requires a number"));
            }
            "--obligations" => {
                config.obligations = take_value(args, &mut i, "--obligations")
                    .parse()
                    .unwrap_or_else(|_| fail("--obligations requires a number"));
            }
            "--output" => output_path = Some(take_value(args, &mut i, "--output")),
            other => fail(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    let set = generate_random_network(&config);

    if let Some(path) = output_path {
        let file = File::create(&path).unwrap_or_else(|e| fail(format!("writing '{}': {}", path, e)));
        write_obligations_csv(file, &set).unwrap_or_else(|e| fail(e));
        eprintln!(
            "Generated {} obligations across {} people → {}",
            set.len(),
            config.people,
            path
        );
    } else {
        write_obligations_csv(io::stdout().lock(), &set).unwrap_or_else(|e| fail(e));
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
