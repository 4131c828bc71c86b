mod batch;

use batch::{ResultMode, compile_file, write_results};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tnfa_core::{
    CompileOptions, Compiler, DEFAULT_EPSILON_MARKER, OptionalStrategy, StateAllocator, preprocess,
    serialize,
};

const DEFAULT_RESULT_FILE: &str = "nfa_result.txt";

const EXIT_ERROR: i32 = 1;
const EXIT_MALFORMED: i32 = 2;

#[derive(Parser)]
#[command(name = "tnfa")]
#[command(about = "tnfa - compile regular expressions to NFAs with Thompson's construction")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every pattern in a file, one per line
    Compile {
        /// File with one pattern per line
        #[arg(short, long)]
        file: PathBuf,
        /// Where to write the serialized automata
        #[arg(short, long, default_value = DEFAULT_RESULT_FILE)]
        output: PathBuf,
        /// Keep only the last pattern's automaton in the result file
        #[arg(long)]
        last_only: bool,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Compile a single pattern and print its automaton
    Dump {
        /// The pattern to compile
        pattern: String,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Show the preprocessed and postfix forms of a pattern
    Convert {
        /// The pattern to convert
        pattern: String,
        /// Show a full compilation report
        #[arg(short, long)]
        debug: bool,
        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(Args)]
struct OptionArgs {
    /// Character that stands for epsilon in patterns
    #[arg(long, default_value_t = DEFAULT_EPSILON_MARKER)]
    epsilon: char,
    /// How to build the `?` operator
    #[arg(long, value_enum, default_value_t = OptionalArg::Alternation)]
    optional: OptionalArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum OptionalArg {
    /// Alternation with an epsilon-only branch
    Alternation,
    /// A bypass edge around the operand
    Bypass,
}

impl From<&OptionArgs> for CompileOptions {
    fn from(args: &OptionArgs) -> Self {
        CompileOptions {
            epsilon_marker: args.epsilon,
            optional: match args.optional {
                OptionalArg::Alternation => OptionalStrategy::Alternation,
                OptionalArg::Bypass => OptionalStrategy::Bypass,
            },
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let alloc = StateAllocator::new();

    match cli.command {
        Commands::Compile {
            file,
            output,
            last_only,
            options,
        } => {
            let mode = if last_only {
                ResultMode::LastOnly
            } else {
                ResultMode::All
            };
            let compiler = Compiler::with_options(&alloc, (&options).into());
            cmd_compile(&file, &output, mode, &compiler)
        }
        Commands::Dump { pattern, options } => {
            cmd_dump(&pattern, &Compiler::with_options(&alloc, (&options).into()))
        }
        Commands::Convert {
            pattern,
            debug,
            options,
        } => cmd_convert(&pattern, debug, &Compiler::with_options(&alloc, (&options).into())),
    }
}

fn cmd_compile(file: &Path, output: &Path, mode: ResultMode, compiler: &Compiler<'_>) {
    println!("{}", "Compiling patterns...".bold());
    println!("  Input:  {}", file.display().to_string().cyan());
    println!("  Output: {}", output.display().to_string().yellow());
    println!();

    let report = compile_file(file, compiler, |_, result| match result {
        Ok(compiled) => {
            println!("{} {}", "✓".green().bold(), compiled.pattern.cyan());
            println!("{}", compiled.text);
            println!();
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
    });

    let report = match report {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(EXIT_ERROR);
        }
    };

    if let Err(e) = write_results(output, &report, mode) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(EXIT_ERROR);
    }

    println!(
        "{} {}",
        "Compiled".bold(),
        format!("{} pattern(s)", report.compiled.len()).green()
    );
    if !report.failures.is_empty() {
        println!(
            "{} {}",
            "Rejected".bold(),
            format!("{} pattern(s)", report.failures.len()).red()
        );
        std::process::exit(EXIT_MALFORMED);
    }
}

fn cmd_dump(pattern: &str, compiler: &Compiler<'_>) {
    match compiler.compile(pattern) {
        Ok(nfa) => println!("{}", serialize(&nfa)),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(EXIT_MALFORMED);
        }
    }
}

fn cmd_convert(pattern: &str, debug: bool, compiler: &Compiler<'_>) {
    println!("{}", "Converting pattern...".bold());
    println!("  Input:  {}", pattern.cyan());
    println!();

    if debug {
        match compiler.compile_debug(pattern) {
            Ok(result) => {
                result.report();
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                std::process::exit(EXIT_MALFORMED);
            }
        }
    } else {
        let infix = preprocess(pattern, compiler.options().epsilon_marker);
        println!("{}", "Preprocessed:".bold());
        println!("  {}", infix.yellow());

        match compiler.postfix(pattern) {
            Ok(result) => {
                println!("{}", "Postfix:".bold());
                println!("  {}", result.green());
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                std::process::exit(EXIT_MALFORMED);
            }
        }
    }
}
