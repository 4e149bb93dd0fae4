use std::{fs, process::ExitCode};

use clap::Parser;
use hostbasic::{Completion, Context, ContextConfig, interpreter::evaluator::core::DEFAULT_MAX_CALL_DEPTH, run};

/// hostbasic runs BASIC-dialect game scripts from the command line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells hostbasic to look at a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Maximum depth of nested subroutine calls.
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,

    /// Maximum number of iterations of a single loop.
    #[arg(long)]
    max_loop: Option<u64>,

    /// Logs parse and execution events to stderr.
    #[arg(short, long)]
    verbose: bool,

    contents: String,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = if verbose {
        EnvFilter::new("hostbasic=debug")
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        return;
    };
    tracing_subscriber::registry().with(fmt::layer().with_target(true)
                                                    .with_level(true)
                                                    .with_writer(std::io::stderr))
                                  .with(filter)
                                  .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let script = if args.file {
        match fs::read_to_string(&args.contents) {
            Ok(script) => script,
            Err(_) => {
                eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                          &args.contents);
                return ExitCode::FAILURE;
            },
        }
    } else {
        args.contents
    };

    let mut ctx = Context::with_config(ContextConfig { max_call_depth:      args.max_depth,
                                                       max_loop_iterations: args.max_loop, });
    ctx.on_command(|name, arguments| {
           let rendered = arguments.iter()
                                   .map(ToString::to_string)
                                   .collect::<Vec<_>>()
                                   .join(", ");
           println!("[command] {name}({rendered})");
       });

    match run(&script, &mut ctx) {
        Ok(Completion::Finished) => ExitCode::SUCCESS,
        Ok(Completion::Aborted { line }) => {
            eprintln!("Aborted on line {line}.");
            ExitCode::from(2)
        },
        // Reported by the default error hook.
        Err(_) => ExitCode::FAILURE,
    }
}
