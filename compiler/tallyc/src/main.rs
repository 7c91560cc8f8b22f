//! Tally CLI
//!
//! Evaluates dice scripts from the command line.

use tallyc::commands::{
    describe_registry, eval_fragments, format_results, load_registry, run_files,
};
use tallyc::EvalConfig;

fn main() {
    tallyc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let mut config = match EvalConfig::from_env() {
        Ok(config) => config,
        Err(err) => fail(&err.to_string()),
    };

    // Flags may appear anywhere after the command
    let mut extensions = Vec::new();
    let mut operands = Vec::new();
    for arg in args.iter().skip(2) {
        if let Some(path) = arg.strip_prefix("--ext=") {
            extensions.push(path.to_string());
            continue;
        }
        match config.apply_flag(arg) {
            Ok(true) => {}
            Ok(false) => operands.push(arg.clone()),
            Err(err) => fail(&err.to_string()),
        }
    }

    let command = &args[1];
    match command.as_str() {
        "eval" => {
            if operands.is_empty() {
                eprintln!("Usage: tally eval <script>... [options]");
                std::process::exit(1);
            }
            let registry = load_or_exit(&extensions);
            match eval_fragments(&config, &registry, &operands) {
                Ok(results) => {
                    for result in &results {
                        println!("{}", format_results(result));
                    }
                }
                Err(err) => fail(&err.to_string()),
            }
        }
        "run" => {
            if operands.is_empty() {
                eprintln!("Usage: tally run <file>... [options]");
                std::process::exit(1);
            }
            let registry = load_or_exit(&extensions);
            let mut failed = false;
            for outcome in run_files(&config, &registry, &operands) {
                match outcome.result {
                    Ok(result) => println!("{}: {}", outcome.path, format_results(&result)),
                    Err(err) => {
                        eprintln!("{}: error: {err}", outcome.path);
                        failed = true;
                    }
                }
            }
            if failed {
                std::process::exit(1);
            }
        }
        "dice" => {
            let registry = load_or_exit(&extensions);
            for line in describe_registry(&registry) {
                println!("{line}");
            }
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("tally {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn load_or_exit(extensions: &[String]) -> tally_eval::SharedScriptRegistry {
    match load_registry(extensions) {
        Ok(registry) => registry,
        Err(err) => fail(&err.to_string()),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

fn print_usage() {
    println!("Tally dice script evaluator");
    println!();
    println!("Usage: tally <command> [options]");
    println!();
    println!("Commands:");
    println!("  eval <script>...     Evaluate fragments in order on one session");
    println!("  run <file>...        Evaluate files in parallel sessions");
    println!("  dice                 List registered dice and functions");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  --seed=<n>           Fixed random seed (env: TALLY_SEED)");
    println!("  --permission=<level> player, trusted or gm (env: TALLY_PERMISSION)");
    println!("  --default=<value>    Value for unset symbols (env: TALLY_DEFAULT_VALUE)");
    println!("  --isolated           Fragments do not share symbols");
    println!("  --ext=<file>         Load function and dice definitions");
    println!();
    println!("Logging: RUST_LOG=tally_eval=debug, TALLY_LOG_TREE=1 for indented output");
}
