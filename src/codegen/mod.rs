//! Backends, each lowering an optimized [`Program`] to one target.
//!
//! Every backend has a private composer implementing [`Visitor`](crate::parser::Visitor) which
//! accumulates its output; composers are built fresh for every `compose` call so their
//! counters & indentation never leak between runs.

pub mod arm;
pub mod bytecode;
pub mod c;
pub mod emitter;
pub mod jasmin;
pub mod js;
pub mod llvm;
pub mod lox;
pub mod smali;
pub mod wasm;

use std::path::Path;

use clap::ValueEnum;
use thiserror::Error;

use crate::{config::Config, interpreter::RuntimeError, parser::Program};

pub use emitter::{Composer, Emitter};

/// Cells on the tape for every target
pub const MEMORY_SIZE: usize = 30_000;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("IO Error: {0}")]
    Io(
        #[from]
        std::io::Error,
    ),

    #[error("Runtime error: {0}")]
    Runtime(
        #[from]
        RuntimeError,
    ),
}

pub trait CodeGenerator {
    /// The artifact for `program` as text
    fn compose(&self, program: &Program) -> String;

    /// Writes the artifact to `output`, there is nothing to do without one.
    fn generate(&mut self, program: &Program, output: Option<&Path>) -> Result<(), CodegenError> {
        if let Some(path) = output {
            std::fs::write(path, self.compose(program))?;
        }
        Ok(())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
pub enum Target {
    /// Internal bytecode, executed right away when there is no output file
    #[default]
    Bytecode,
    /// 32 bit ARM assembly (GNU as, Linux syscalls)
    Arm,
    /// LLVM IR
    Llvm,
    /// JVM assembly for the Jasmin assembler
    Jasmin,
    /// Dalvik assembly for smali
    Smali,
    /// WebAssembly text format using WASI
    Wasm,
    /// Lox script
    Lox,
    /// C source
    C,
    /// Node.js script
    Js,
}

impl Target {
    pub fn generator(&self, config: &Config) -> Box<dyn CodeGenerator> {
        match self {
            Target::Bytecode => Box::new(bytecode::BytecodeGenerator::new(config.heap_size)),
            Target::Arm => Box::new(arm::ArmCodeGenerator),
            Target::Llvm => Box::new(llvm::LlvmCodeGenerator),
            Target::Jasmin => Box::new(jasmin::JasminCodeGenerator),
            Target::Smali => Box::new(smali::SmaliCodeGenerator),
            Target::Wasm => Box::new(wasm::WasmCodeGenerator),
            Target::Lox => Box::new(lox::LoxCodeGenerator::new(
                config.input.as_deref().unwrap_or_default(),
            )),
            Target::C => Box::new(c::CCodeGenerator),
            Target::Js => Box::new(js::JsCodeGenerator),
        }
    }
}
