//! Turning a tree back into text.

use super::{LoopBlock, Program, Visitor};

/// Prints the minimal source for each node, so parsing and printing gives back the source
/// with every comment character stripped out.
pub struct AstPrinter;

impl Visitor for AstPrinter {
    type Output = String;

    fn visit_program(&mut self, program: &Program) -> String {
        program.body.accept_each(self).concat()
    }

    fn visit_move(&mut self, amount: i32) -> String {
        (if amount < 0 { "<" } else { ">" }).repeat(amount.unsigned_abs() as usize)
    }

    fn visit_add(&mut self, amount: i32) -> String {
        (if amount < 0 { "-" } else { "+" }).repeat(amount.unsigned_abs() as usize)
    }

    fn visit_zero(&mut self) -> String {
        String::from("[+]")
    }

    fn visit_loop(&mut self, node: &LoopBlock) -> String {
        format!("[{}]", node.body.accept_each(self).concat())
    }

    fn visit_print(&mut self) -> String {
        String::from(".")
    }

    fn visit_read(&mut self) -> String {
        String::from(",")
    }
}

/// Compact form used for dumps & tests: `+{3}`, `<{2}`, `[Z]`
pub struct DebugAstPrinter;

impl Visitor for DebugAstPrinter {
    type Output = String;

    fn visit_program(&mut self, program: &Program) -> String {
        program.body.accept_each(self).concat()
    }

    fn visit_move(&mut self, amount: i32) -> String {
        format!("{}{{{}}}", if amount < 0 { "<" } else { ">" }, amount.unsigned_abs())
    }

    fn visit_add(&mut self, amount: i32) -> String {
        format!("{}{{{}}}", if amount < 0 { "-" } else { "+" }, amount.unsigned_abs())
    }

    fn visit_zero(&mut self) -> String {
        String::from("[Z]")
    }

    fn visit_loop(&mut self, node: &LoopBlock) -> String {
        format!("[{}]", node.body.accept_each(self).concat())
    }

    fn visit_print(&mut self) -> String {
        String::from(".")
    }

    fn visit_read(&mut self) -> String {
        String::from(",")
    }
}

pub fn print(program: &Program) -> String {
    program.accept(&mut AstPrinter)
}

pub fn debug_print(program: &Program) -> String {
    program.accept(&mut DebugAstPrinter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{AstKind, BasicBlock, LoopId};

    #[test]
    fn debug_form() {
        let program = Program::new(vec![
            AstKind::Read,
            AstKind::Zero,
            AstKind::Move(-3),
            AstKind::Loop(LoopBlock {
                id: LoopId(0),
                body: BasicBlock::new(vec![AstKind::Add(-2), AstKind::Print]),
            }),
        ]);
        assert_eq!(debug_print(&program), ",[Z]<{3}[-{2}.]");
        assert_eq!(print(&program), ",[+]<<<[--.]");
    }
}
