use crate::parser::{wrapping_byte, AstKind, BasicBlock, Program};

use super::ByteCode;

pub fn to_bytecode(program: &Program) -> Vec<ByteCode> {
    let mut instructions = vec![];
    bytecode_write_block(&mut instructions, &program.body);
    instructions
}

fn bytecode_write_block(instructions: &mut Vec<ByteCode>, block: &BasicBlock) {
    for instruction in block.instructions.iter() {
        match instruction {
            AstKind::Move(i) => instructions.push(ByteCode::ShiftDataPointer(*i as isize)),
            AstKind::Add(i) => instructions.push(ByteCode::DerefAdd(wrapping_byte(*i))),
            AstKind::Zero => instructions.push(ByteCode::SetZero),
            AstKind::Print => instructions.push(ByteCode::Write),
            AstKind::Read => instructions.push(ByteCode::Read),
            AstKind::Loop(node) => {
                // because of recursion we need to count how many sub-instructions exist
                let current_len = instructions.len();
                bytecode_write_block(instructions, &node.body);
                let end_len = instructions.len();
                let offset = end_len - current_len;

                // i.e. if we have just [+] then it'll be JumpForwardsIfZero(3) & JumpBackwardsIfNonZero(1)
                // we want to jump past the last instruction (that we've not added yet)
                instructions.insert(current_len, ByteCode::JumpForwardsIfZero(offset + 2));
                // we want to jump above the instruction above
                instructions.push(ByteCode::JumpBackwardsIfNonZero(offset));
            }
        }
    }
}
