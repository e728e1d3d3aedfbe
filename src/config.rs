use std::path::PathBuf;

use crate::codegen::{Target, MEMORY_SIZE};

/// Everything a compilation needs to know besides the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub target: Target,
    /// Where the artifact goes, `None` runs the program for [`Target::Bytecode`]
    pub output: Option<PathBuf>,
    /// Print the artifact before writing/running it
    pub debug: bool,
    /// Input for targets that take it at generation time
    pub input: Option<String>,
    pub passes: usize,
    /// Tape size of the in-process runtime
    pub heap_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: Target::default(),
            output: None,
            debug: false,
            input: None,
            passes: 1,
            heap_size: MEMORY_SIZE,
        }
    }
}
