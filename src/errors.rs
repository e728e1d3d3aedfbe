use thiserror::Error;

use crate::{codegen::CodegenError, parser::ParseError};

/// Anything that stops a compilation, there is only ever one
#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Parse(
        #[from]
        ParseError,
    ),

    #[error(transparent)]
    Codegen(
        #[from]
        CodegenError,
    ),

    #[error("IO Error: {0}")]
    FileIO(
        #[from]
        std::io::Error,
    ),
}
