use crate::bytecode::ByteCode;

use super::RuntimeError;

pub struct ByteCodeInterpreter {}

impl ByteCodeInterpreter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn run(
        &mut self,
        runtime: &mut super::Runtime,
        instructions: &[ByteCode],
    ) -> Result<(), RuntimeError> {
        let mut pc = 0;
        while pc < instructions.len() {
            match &instructions[pc] {
                ByteCode::ShiftDataPointer(i) => runtime.shift_data_pointer(*i),
                ByteCode::DerefAdd(i) => runtime.deref_and_add_value(*i)?,
                ByteCode::SetZero => runtime.set_zero()?,
                ByteCode::Read => runtime.read()?,
                ByteCode::Write => runtime.write()?,
                ByteCode::JumpForwardsIfZero(offset) => {
                    if runtime.value_is_zero()? {
                        pc = pc.wrapping_add(*offset);
                        // don't do the ++
                        continue;
                    }
                }
                ByteCode::JumpBackwardsIfNonZero(offset) => {
                    if !runtime.value_is_zero()? {
                        pc = pc.wrapping_sub(*offset);
                        // don't do the ++
                        continue;
                    }
                }
            }
            pc += 1;
        }
        runtime.flush()
    }
}

impl Default for ByteCodeInterpreter {
    fn default() -> Self {
        Self::new()
    }
}
