use crate::parser::{AstKind, BasicBlock};

/// The tape starts out zeroed so until something writes to a cell (`+`/`-` or `,`) every loop
/// is skipped and every zeroing does nothing. Drops the loops & zeroes in that leading stretch.
///
/// Only looks at the kind and position of instructions, moves are not tracked so a loop after
/// `>+<` still counts as reachable. Only valid for the program body: a loop body is only ever
/// entered with a non-zero cell.
pub fn remove_unreachable_loops(block: &mut BasicBlock) {
    let first_memory_update = block
        .instructions
        .iter()
        .position(|instruction| matches!(instruction, AstKind::Add(_) | AstKind::Read))
        .unwrap_or(block.instructions.len());

    let mut index = 0;
    block.instructions.retain(|instruction| {
        let unreachable = index < first_memory_update
            && matches!(instruction, AstKind::Loop(_) | AstKind::Zero);
        index += 1;
        !unreachable
    });
}
