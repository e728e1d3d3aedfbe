use std::path::Path;

use crate::{
    bytecode::to_bytecode,
    interpreter::{ByteCodeInterpreter, Runtime},
    parser::Program,
};

use super::{CodeGenerator, CodegenError};

/// The one target that can run what it generates: with no output file the bytecode is
/// executed straight away, otherwise its listing is written out.
pub struct BytecodeGenerator {
    heap_size: usize,
    /// used instead of stdin/stdout when set, every run starts it on a fresh tape
    runtime: Option<Runtime>,
}

impl BytecodeGenerator {
    pub fn new(heap_size: usize) -> Self {
        Self {
            heap_size,
            runtime: None,
        }
    }

    pub fn with_runtime(runtime: Runtime) -> Self {
        Self {
            heap_size: runtime.heap().len(),
            runtime: Some(runtime),
        }
    }
}

impl CodeGenerator for BytecodeGenerator {
    fn compose(&self, program: &Program) -> String {
        to_bytecode(program)
            .iter()
            .enumerate()
            .map(|(pc, instruction)| format!("{:>5}: {}\n", pc, instruction))
            .collect()
    }

    fn generate(&mut self, program: &Program, output: Option<&Path>) -> Result<(), CodegenError> {
        if let Some(path) = output {
            std::fs::write(path, self.compose(program))?;
            return Ok(());
        }

        let bytecode = to_bytecode(program);
        match self.runtime.as_mut() {
            Some(runtime) => {
                runtime.reset();
                ByteCodeInterpreter::new().run(runtime, &bytecode)?;
            }
            None => {
                let mut runtime = Runtime::with_stdio(self.heap_size);
                ByteCodeInterpreter::new().run(&mut runtime, &bytecode)?;
            }
        }
        Ok(())
    }
}
