//! Brainf**k compiler.
//!
//! `source -> lexer -> parser -> optimizer -> codegen`, each stage usable on its own.

extern crate clap;
extern crate thiserror;

pub mod bytecode;
pub mod codegen;
pub mod config;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod optimizer;
pub mod parser;

use std::{panic, path::Path, thread};

use crate::{
    codegen::{CodeGenerator, CodegenError},
    parser::{ParseError, Program},
};

pub use crate::{codegen::Target, config::Config, errors::CompileError};

/// Stack of the thread [`on_pipeline_stack`] spawns.
///
/// Parsing, optimizing, composing and dropping a program all recurse once per loop nesting
/// level, this leaves room for a few hundred thousand levels.
pub const PIPELINE_STACK_SIZE: usize = 512 * 1024 * 1024;

/// Runs `stage` on its own thread with a [`PIPELINE_STACK_SIZE`] stack and waits for it.
/// A panic in `stage` is resumed on the calling thread.
pub fn on_pipeline_stack<T, F>(stage: F) -> std::io::Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let handle = thread::Builder::new()
        .name("pipeline".to_string())
        .stack_size(PIPELINE_STACK_SIZE)
        .spawn(stage)?;

    match handle.join() {
        Ok(result) => Ok(result),
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// Scans, parses & optimizes `source`
pub fn frontend(source: &str, passes: usize) -> Result<Program, ParseError> {
    let tokens = lexer::scan(source);
    let program = parser::parse(&tokens)?;
    Ok(optimizer::optimize(&program, passes))
}

/// Hands an optimized program to the configured backend
pub fn generate(program: &Program, config: &Config) -> Result<(), CodegenError> {
    let mut generator = config.target.generator(config);
    run_generator(generator.as_mut(), program, config.output.as_deref(), config.debug)
}

pub fn run_generator(
    generator: &mut dyn CodeGenerator,
    program: &Program,
    output: Option<&Path>,
    debug: bool,
) -> Result<(), CodegenError> {
    if debug {
        println!("{}", generator.compose(program));
    }
    generator.generate(program, output)
}

/// The whole pipeline for one source text
pub fn compile(source: &str, config: &Config) -> Result<(), CompileError> {
    let program = frontend(source, config.passes)?;
    generate(&program, config)?;
    Ok(())
}

