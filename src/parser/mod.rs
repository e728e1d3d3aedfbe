pub mod parser;
pub mod printer;

use thiserror::Error;

pub use parser::{parse, Parser};

/// Unique per `[` in the source, assigned in parse order.
///
/// Backends use it to name labels & blocks since two loops with identical bodies still need
/// distinct names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoopId(pub u32);

impl std::fmt::Display for LoopId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstKind {
    /// Net shift of the data pointer
    Move(i32),
    /// Net change of the byte at the data pointer (wrapped only when emitted)
    Add(i32),
    /// Set the byte at the data pointer to 0, what `[-]` & `[+]` become
    Zero,
    Print,
    Read,
    Loop(LoopBlock),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopBlock {
    pub id: LoopId,
    pub body: BasicBlock,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicBlock {
    pub instructions: Vec<AstKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub body: BasicBlock,
}

/// One method per node kind; `accept` does the (exhaustive) dispatch.
pub trait Visitor {
    type Output;

    fn visit_program(&mut self, program: &Program) -> Self::Output;
    fn visit_move(&mut self, amount: i32) -> Self::Output;
    fn visit_add(&mut self, amount: i32) -> Self::Output;
    fn visit_zero(&mut self) -> Self::Output;
    fn visit_loop(&mut self, node: &LoopBlock) -> Self::Output;
    fn visit_print(&mut self) -> Self::Output;
    fn visit_read(&mut self) -> Self::Output;
}

impl AstKind {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            AstKind::Move(amount) => visitor.visit_move(*amount),
            AstKind::Add(amount) => visitor.visit_add(*amount),
            AstKind::Zero => visitor.visit_zero(),
            AstKind::Print => visitor.visit_print(),
            AstKind::Read => visitor.visit_read(),
            AstKind::Loop(node) => visitor.visit_loop(node),
        }
    }
}

impl BasicBlock {
    pub fn new(instructions: Vec<AstKind>) -> Self {
        Self { instructions }
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Visit every instruction in program order
    pub fn accept_each<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Vec<V::Output> {
        self.instructions
            .iter()
            .map(|instruction| instruction.accept(visitor))
            .collect()
    }
}

impl Program {
    pub fn new(instructions: Vec<AstKind>) -> Self {
        Self {
            body: BasicBlock::new(instructions),
        }
    }

    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_program(self)
    }
}

/// Reduce an `Add` amount to the byte it changes a cell by (cells wrap at 256)
pub fn wrapping_byte(amount: i32) -> u8 {
    amount.rem_euclid(256) as u8
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error encountered on line {line}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}
