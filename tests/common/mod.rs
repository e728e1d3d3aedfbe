#![allow(dead_code)]

use std::{cell::RefCell, fs, io::Write, path::PathBuf, rc::Rc};

use bfcc::{
    interpreter::Runtime,
    lexer::scan,
    optimizer::optimize,
    parser::{parse, printer, Program},
};

pub const HELLO_WORLD: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]
>+>+>->>+[<]<-]>>.>---.+++++++..++
+.>>.<-.<.+++.------.--------.>>+.
>++.";

/// Output sink that can still be read after a runtime took ownership of it
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }
}

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

pub fn parse_source(source: &str) -> Program {
    parse(&scan(source)).expect("source should parse")
}

/// Two passes like the default test setup, printed in the compact form
pub fn optimized(source: &str) -> String {
    printer::debug_print(&optimize(&parse_source(source), 2))
}

/// A path in this test binary's own scratch directory
pub fn scratch_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bfcc-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("scratch directory should be creatable");
    dir.join(name)
}
