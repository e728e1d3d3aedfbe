pub mod ast_interpreter;
pub mod bytecode_interpreter;

use std::io::{ErrorKind, Read, Write};

use thiserror::Error;

pub use ast_interpreter::AstInterpreter;
pub use bytecode_interpreter::ByteCodeInterpreter;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("IO Error: {0}")]
    Io(
        #[from]
        std::io::Error,
    ),

    #[error("Data pointer ({pointer}) out of bounds (max length {len})")]
    PointerOutOfBounds { pointer: isize, len: usize },
}

pub struct Runtime {
    /// Pointer into the heap, signed so that moving left of 0 is reported rather than wrapped
    data_pointer: isize,

    /// Our statically allocated heap
    heap: Vec<u8>,

    in_stream: Box<dyn Read>,
    out_stream: Box<dyn Write>,
}

impl Runtime {
    /// Zeroed tape & pointer back at the start, the streams are kept
    pub fn reset(&mut self) {
        self.heap.fill(0);
        self.data_pointer = 0;
    }

    /// Read from stream in runtime and write to data pointer, the cell is left alone at end of input
    pub fn read(&mut self) -> Result<(), RuntimeError> {
        let index = self.check_data_pointer()?;
        let mut byte = [0u8; 1];
        loop {
            match self.in_stream.read(&mut byte) {
                Ok(0) => return Ok(()),
                Ok(_) => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.heap[index] = byte[0];
        Ok(())
    }

    /// Write to stream in runtime from data pointer
    pub fn write(&mut self) -> Result<(), RuntimeError> {
        let index = self.check_data_pointer()?;
        self.out_stream.write_all(&self.heap[index..index + 1])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), RuntimeError> {
        self.out_stream.flush()?;
        Ok(())
    }

    pub fn deref_and_add_value(&mut self, by: u8) -> Result<(), RuntimeError> {
        let index = self.check_data_pointer()?;
        self.heap[index] = self.heap[index].wrapping_add(by);
        Ok(())
    }

    pub fn set_zero(&mut self) -> Result<(), RuntimeError> {
        let index = self.check_data_pointer()?;
        self.heap[index] = 0;
        Ok(())
    }

    pub fn shift_data_pointer(&mut self, by: isize) {
        self.data_pointer = self.data_pointer.wrapping_add(by);
        // we don't check that the data pointer is valid on shifts
        // we only check that it's valid once it's read/written to
    }

    /// is the value at the data pointer zero?
    pub fn value_is_zero(&self) -> Result<bool, RuntimeError> {
        let index = self.check_data_pointer()?;
        Ok(self.heap[index] == 0)
    }

    pub fn heap(&self) -> &[u8] {
        &self.heap
    }

    /// check if the data pointer is within bounds
    fn check_data_pointer(&self) -> Result<usize, RuntimeError> {
        match usize::try_from(self.data_pointer) {
            Ok(index) if index < self.heap.len() => Ok(index),
            _ => Err(RuntimeError::PointerOutOfBounds {
                pointer: self.data_pointer,
                len: self.heap.len(),
            }),
        }
    }
}

impl Runtime {
    pub fn new(heap_size: usize, in_stream: Box<dyn Read>, out_stream: Box<dyn Write>) -> Self {
        Self {
            data_pointer: 0,
            heap: vec![0; heap_size],
            in_stream,
            out_stream,
        }
    }

    /// A runtime hooked up to the process' stdin/stdout
    pub fn with_stdio(heap_size: usize) -> Self {
        Self::new(
            heap_size,
            Box::new(std::io::stdin()),
            Box::new(std::io::stdout()),
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{cell::RefCell, io::Write, rc::Rc};

    use super::*;

    /// Output sink that can still be read after the runtime took ownership of it
    #[derive(Clone, Default)]
    pub struct SharedBuffer(pub Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    pub fn runtime(input: &[u8]) -> (Runtime, SharedBuffer) {
        let output = SharedBuffer::default();
        let runtime = Runtime::new(
            30_000,
            Box::new(std::io::Cursor::new(input.to_vec())),
            Box::new(output.clone()),
        );
        (runtime, output)
    }

    #[test]
    fn cells_wrap() {
        let (mut runtime, _) = runtime(b"");
        runtime.deref_and_add_value(255).unwrap();
        runtime.deref_and_add_value(2).unwrap();
        assert_eq!(runtime.heap()[0], 1);
    }

    #[test]
    fn pointer_bounds_are_checked_on_access() {
        let (mut runtime, _) = runtime(b"");
        runtime.shift_data_pointer(-1);
        assert!(matches!(
            runtime.value_is_zero(),
            Err(RuntimeError::PointerOutOfBounds { pointer: -1, len: 30_000 })
        ));
        runtime.shift_data_pointer(1);
        assert!(runtime.value_is_zero().unwrap());
    }

    #[test]
    fn read_at_end_of_input_keeps_the_cell() {
        let (mut runtime, _) = runtime(b"A");
        runtime.read().unwrap();
        assert_eq!(runtime.heap()[0], b'A');
        runtime.read().unwrap();
        assert_eq!(runtime.heap()[0], b'A');
    }
}
