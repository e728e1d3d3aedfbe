//! AST to AST rewrites, see [`optimize`].

use crate::parser::{AstKind, BasicBlock, Program};

use self::{constant_folding::constant_folding, unreachable_loops::remove_unreachable_loops};

pub mod constant_folding;
pub mod unreachable_loops;

/// Runs `passes` optimization passes over a copy of the program.
///
/// A pass folds a block, then walks into the loops that survived, so things that only become
/// adjacent after folding (`+>-<` style) need another pass. One pass is not a fixed point,
/// see [`optimize_to_fixed_point`].
pub fn optimize(program: &Program, passes: usize) -> Program {
    let mut copy = program.clone();

    for _ in 0..passes {
        run_pass(&mut copy);
    }

    copy
}

/// Keeps running passes until one changes nothing or `max_passes` have run.
/// Returns the program and the number of passes that changed something.
pub fn optimize_to_fixed_point(program: &Program, max_passes: usize) -> (Program, usize) {
    let mut current = program.clone();

    for pass in 0..max_passes {
        let mut next = current.clone();
        run_pass(&mut next);
        if next == current {
            return (current, pass);
        }
        current = next;
    }

    (current, max_passes)
}

fn run_pass(program: &mut Program) {
    optimize_block(&mut program.body);
    remove_unreachable_loops(&mut program.body);
}

fn optimize_block(block: &mut BasicBlock) {
    constant_folding(block);

    for instruction in block.instructions.iter_mut() {
        if let AstKind::Loop(node) = instruction {
            optimize_block(&mut node.body);
        }
    }
}
