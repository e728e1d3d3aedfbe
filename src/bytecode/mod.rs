pub mod bytecode;

pub use bytecode::to_bytecode;

/// A very simple bytecode set of instructions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ByteCode {
    /// Add the given value to the data pointer
    ShiftDataPointer(isize),

    /// Dereference the data pointer and add to the heap value (wrapping)
    DerefAdd(u8),

    /// Dereference the data pointer and clear the heap value
    SetZero,

    /// Read a byte into the heap at the data pointer
    Read,

    /// Write the byte at the data pointer
    Write,

    /// Jump instructions forwards if zero
    JumpForwardsIfZero(usize),

    /// Jump instructions backwards if non zero
    JumpBackwardsIfNonZero(usize),
}

impl std::fmt::Display for ByteCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteCode::ShiftDataPointer(i) => write!(f, "shift {}", i),
            ByteCode::DerefAdd(i) => write!(f, "add {}", i),
            ByteCode::SetZero => write!(f, "zero"),
            ByteCode::Read => write!(f, "read"),
            ByteCode::Write => write!(f, "write"),
            ByteCode::JumpForwardsIfZero(offset) => write!(f, "jz +{}", offset),
            ByteCode::JumpBackwardsIfNonZero(offset) => write!(f, "jnz -{}", offset),
        }
    }
}
