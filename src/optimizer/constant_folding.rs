use crate::parser::{AstKind, BasicBlock};

macro_rules! constant_fold_instruction {
    ($pc: tt, $instructions: tt, $pattern: path) => {
        let old_pos = $pc;
        // accumulate all the values into this "constant"
        let mut acc = 0;

        while $pc < $instructions.len() {
            if let $pattern(i2) = $instructions[$pc] {
                acc += i2;
                $pc += 1;
            } else {
                // no longer a series of constants
                break;
            }
        }

        // doing this slightly awkward way just to avoid having to shuffle a lot of elements twice
        $instructions.drain(old_pos + 1..$pc);
        $instructions[old_pos] = $pattern(acc);
        $pc = old_pos;
    };
}

/// Folds runs of moves/adds into one instruction and collapses runs of zeroes,
/// then drops whatever cancelled out (net zero moves/adds & empty loops).
///
/// Only this block is touched, nested loops are left for the caller.
pub fn constant_folding(block: &mut BasicBlock) {
    let mut pc = 0;
    let instructions = &mut block.instructions;
    while pc < instructions.len() {
        match instructions[pc] {
            AstKind::Move(_) => {
                constant_fold_instruction!(pc, instructions, AstKind::Move);
            }
            AstKind::Add(_) => {
                constant_fold_instruction!(pc, instructions, AstKind::Add);
            }
            AstKind::Zero => {
                let run = instructions[pc..]
                    .iter()
                    .take_while(|instruction| **instruction == AstKind::Zero)
                    .count();
                instructions.drain(pc + 1..pc + run);
            }
            // everything else is ignored
            _ => {}
        }

        pc += 1;
    }

    instructions.retain(|instruction| match instruction {
        AstKind::Move(amount) | AstKind::Add(amount) => *amount != 0,
        AstKind::Loop(node) => !node.body.is_empty(),
        _ => true,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{LoopBlock, LoopId};

    fn folded(instructions: Vec<AstKind>) -> Vec<AstKind> {
        let mut block = BasicBlock::new(instructions);
        constant_folding(&mut block);
        block.instructions
    }

    #[test]
    fn runs_are_summed() {
        use AstKind::*;
        assert_eq!(folded(vec![Add(1), Add(1), Add(-3)]), vec![Add(-1)]);
        assert_eq!(folded(vec![Move(2), Print, Move(1), Move(1)]), vec![Move(2), Print, Move(2)]);
        assert_eq!(folded(vec![Zero, Zero, Zero, Read]), vec![Zero, Read]);
    }

    #[test]
    fn cancelled_runs_disappear() {
        use AstKind::*;
        assert_eq!(folded(vec![Add(1), Add(-1), Print]), vec![Print]);
        // cancelling exposes neighbours but those only merge on the next call
        assert_eq!(
            folded(vec![Move(1), Add(1), Add(-1), Move(1)]),
            vec![Move(1), Move(1)]
        );
    }

    #[test]
    fn empty_loops_are_removed_but_not_entered() {
        let empty = AstKind::Loop(LoopBlock {
            id: LoopId(0),
            body: BasicBlock::default(),
        });
        let nested = AstKind::Loop(LoopBlock {
            id: LoopId(1),
            body: BasicBlock::new(vec![AstKind::Add(1), AstKind::Add(-1)]),
        });
        assert_eq!(folded(vec![AstKind::Read, empty, nested.clone()]), vec![AstKind::Read, nested]);
    }
}
