use std::{
    collections::HashSet,
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use bfcc::{
    codegen::{Target, MEMORY_SIZE},
    lexer::{self, Token},
    optimizer::optimize,
    parser::{self, printer},
    CompileError, Config,
};
use clap::{Parser, ValueEnum};
use colored::Colorize;

/// Brainf**k compiler: bytecode runner, assembly/IR/script backends
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The file to compile
    #[arg()]
    file: PathBuf,

    /// Where to write the artifact, without one the bytecode target runs the program
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Target::Bytecode)]
    target: Target,

    /// Print the generated artifact
    #[arg(short, long)]
    debug: bool,

    /// Input baked into targets that can't read at runtime (lox)
    #[arg(short, long)]
    input: Option<String>,

    /// Number of optimizer passes
    #[arg(short, long, default_value_t = 1)]
    passes: usize,

    #[arg(long, default_value_t = MEMORY_SIZE)]
    heap_size: usize,

    #[arg(long, value_enum)]
    dump: Vec<Dump>,

    /// Report the stages and their timings on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Hash, PartialEq, Eq)]
enum Dump {
    /// Output the lexer
    Tokens,
    /// Output the ast
    Ast,
    /// Output the optimized ast
    OptimizedAst,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            target: self.target,
            output: self.output.clone(),
            debug: self.debug,
            input: self.input.clone(),
            passes: self.passes,
            heap_size: self.heap_size,
        }
    }
}

/// Times a stage, only saying so when verbose
fn stage<T>(verbose: bool, name: &str, run: impl FnOnce() -> T) -> T {
    if verbose {
        eprintln!("{} {}", "Starting".blue(), name.blue());
    }
    let now = Instant::now();
    let result = run();
    if verbose {
        eprintln!("{} {} {} {:.2?}", "Finished".green(), name.green(), "in".green(), now.elapsed());
    }
    result
}

fn print_tokens(tokens: &[Token]) {
    let text: String = tokens.iter().filter_map(|token| token.kind.as_char()).collect();
    println!("{}", text);
}

fn run(args: &Args) -> Result<(), CompileError> {
    let dumps: HashSet<Dump> = HashSet::from_iter(args.dump.iter().cloned());
    let config = args.config();

    if args.verbose {
        eprintln!("Compiling {} for {:?}", args.file.display(), config.target);
    }

    let text = std::fs::read_to_string(&args.file)?;

    let tokens = stage(args.verbose, "lexing", || lexer::scan(&text));
    if dumps.contains(&Dump::Tokens) {
        print_tokens(&tokens);
    }

    let program = stage(args.verbose, "parsing", || parser::parse(&tokens))?;
    if dumps.contains(&Dump::Ast) {
        println!("{}", printer::debug_print(&program));
    }

    let optimized_program = stage(args.verbose, "optimizations", || optimize(&program, config.passes));
    if dumps.contains(&Dump::OptimizedAst) {
        println!("{}", printer::debug_print(&optimized_program));
    }

    stage(args.verbose, "codegen", || bfcc::generate(&optimized_program, &config))?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    // deeply nested loops need more stack than the main thread has
    let result = match bfcc::on_pipeline_stack(move || run(&args)) {
        Ok(result) => result,
        Err(e) => Err(CompileError::from(e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CompileError::Parse(e)) => {
            eprintln!("{}", e.to_string().red());
            ExitCode::from(65)
        }
        Err(e) => {
            eprintln!("{0:}: {1:}", "Error".red(), e);
            ExitCode::FAILURE
        }
    }
}
