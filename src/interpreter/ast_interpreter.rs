use crate::parser::{self, AstKind};

use super::RuntimeError;

/// Walks the tree directly, used as the reference for what a program should do
pub struct AstInterpreter {}

impl AstInterpreter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn interpret(
        &mut self,
        runtime: &mut super::Runtime,
        program: &parser::Program,
    ) -> Result<(), RuntimeError> {
        self.interpret_block(runtime, &program.body)?;
        runtime.flush()
    }

    fn interpret_block(
        &mut self,
        runtime: &mut super::Runtime,
        block: &parser::BasicBlock,
    ) -> Result<(), RuntimeError> {
        // written this way since the upper-most block (program) doesn't repeat
        for instruction in block.instructions.iter() {
            match instruction {
                AstKind::Move(i) => runtime.shift_data_pointer(*i as isize),
                AstKind::Add(i) => runtime.deref_and_add_value(parser::wrapping_byte(*i))?,
                AstKind::Zero => runtime.set_zero()?,
                AstKind::Print => runtime.write()?,
                AstKind::Read => runtime.read()?,
                AstKind::Loop(node) => {
                    while !runtime.value_is_zero()? {
                        self.interpret_block(runtime, &node.body)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for AstInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{interpreter::tests::runtime, lexer::scan, parser::parse};

    #[test]
    fn echoes_input() {
        let program = parse(&scan(",[.,]")).unwrap();
        let (mut runtime, output) = runtime(b"abc\0");
        AstInterpreter::new().interpret(&mut runtime, &program).unwrap();
        assert_eq!(&output.0.borrow()[..], b"abc");
    }
}
