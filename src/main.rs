use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, Report, Result, WrapErr};

use synvm::output::{self, file_message, message, MsgColor};
use synvm::RunState;

/// Runs binary program images for the 15-bit, 22-instruction word machine.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a program image to run
    path: Option<PathBuf>,

    /// Produce minimal output, suited for blackbox tests
    #[arg(short, long, global = true)]
    minimal: bool,

    /// Print every decoded instruction, and the final machine state, to stderr
    #[arg(
        short,
        long,
        global = true,
        env = "SYNVM_TRACE",
        value_parser = FalseyValueParser::new()
    )]
    trace: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program image with the terminal as its input and output
    Run {
        /// Program image: little-endian 16-bit words
        name: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match (args.command, args.path) {
        (Some(Command::Run { name }), _) | (None, Some(name)) => {
            run(&name, args.minimal, args.trace)
        }
        (None, None) => {
            println!("\n~ synvm v{VERSION} ~");
            println!("{}", SHORT_INFO.bold());
            Ok(())
        }
    }
}

fn run(name: &Path, minimal: bool, trace: bool) -> Result<()> {
    output::set_minimal(minimal);

    file_message(MsgColor::Green, "Loading", name);
    let bytes = fs::read(name)
        .into_diagnostic()
        .wrap_err_with(|| format!("could not read program image {}", name.display()))?;
    if bytes.len() % 2 != 0 {
        message(
            MsgColor::Yellow,
            "Warning",
            "image has an odd number of bytes, last byte ignored",
        );
    }

    let mut state = RunState::from_image(&bytes);
    state.set_trace(trace);
    message(
        MsgColor::Green,
        "Loaded",
        &format!("{} words", state.memory().len()),
    );

    message(MsgColor::Green, "Running", "program image");
    let result = {
        let mut input = io::stdin().lock();
        let mut stdout = io::stdout().lock();
        state.run(&mut input, &mut stdout)
    };

    if trace {
        output::print_state(&state);
    }
    if !output::is_minimal() {
        // Program output need not end in a newline
        println!();
    }

    match result {
        Ok(()) => {
            message(MsgColor::Cyan, "Halted", "normally");
            file_message(MsgColor::Green, "Completed", name);
            Ok(())
        }
        Err(err) => {
            let at = state.fetched_at();
            message(MsgColor::Red, "Failed", &format!("{} at ip {at}", err.kind()));
            Err(Report::new(err).wrap_err(format!("execution stopped at ip {at}")))
        }
    }
}

const SHORT_INFO: &str = r"
synvm loads a program image (little-endian 16-bit words, no header) at
address 0 and runs it until `halt`, reading stdin a line at a time.
Please use `-h` or `--help` to access the usage instructions.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
