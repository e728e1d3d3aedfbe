use crate::parser::{wrapping_byte, LoopBlock, LoopId, Program, Visitor};

use super::{CodeGenerator, Composer, Emitter, MEMORY_SIZE};

const DP: &str = "$ptr";

const STDIN: u32 = 0;
const STDOUT: u32 = 1;

// scratch space for the WASI calls, just after the tape
const IO_VEC_ARRAY_ADDR: usize = MEMORY_SIZE;
const IO_VEC_ARRAY_LENGTH: usize = IO_VEC_ARRAY_ADDR + 4;
const IO_BYTES_WRITTEN_ADDR: usize = IO_VEC_ARRAY_ADDR + 8;
const IO_BYTES_READ_ADDR: usize = IO_BYTES_WRITTEN_ADDR;

/// WebAssembly text with WASI imports (`fd_write`, `fd_read`, `proc_exit`)
pub struct WasmCodeGenerator;

impl CodeGenerator for WasmCodeGenerator {
    fn compose(&self, program: &Program) -> String {
        let mut composer = WasmComposer {
            emitter: Emitter::new(),
            frames: vec![],
        };
        program.accept(&mut composer);
        composer.emitter.finish()
    }
}

/// Branches name their target by how many enclosing `block`/`loop`s they cross, so the
/// composer keeps the stack of open ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// `block` around a loop, branching here leaves the loop
    Exit(LoopId),
    /// the `loop` itself, branching here starts the next iteration
    Repeat(LoopId),
}

struct WasmComposer {
    emitter: Emitter,
    frames: Vec<Frame>,
}

impl Composer for WasmComposer {
    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}

impl WasmComposer {
    /// Emits `opener ... end` with `frame` open for everything `emit` writes
    fn structured<F: FnOnce(&mut Self)>(&mut self, opener: &str, frame: Frame, emit: F) {
        self.emitter.line(opener);
        self.frames.push(frame);
        self.nested(emit);
        self.frames.pop();
        self.emitter.line("end");
    }

    /// Relative depth of `target` from the innermost open frame
    fn depth_of(&self, target: Frame) -> usize {
        self.frames
            .iter()
            .rev()
            .position(|frame| *frame == target)
            .unwrap_or_else(|| unreachable!("branch to {:?} outside of it", target))
    }

    fn fd_call(&mut self, function: &str, fd: u32, result_addr: usize) {
        self.emitter.line(";; point the iovec at the current cell, the length is always 1");
        self.emitter.line(format!("(i32.store (i32.const {}) (local.get {}))", IO_VEC_ARRAY_ADDR, DP));
        self.emitter.line(format!(
            "(call ${} (i32.const {}) (i32.const {}) (i32.const 1) (i32.const {}))",
            function, fd, IO_VEC_ARRAY_ADDR, result_addr
        ));
        self.emitter.line("drop");
    }
}

impl Visitor for WasmComposer {
    type Output = ();

    fn visit_program(&mut self, program: &Program) {
        self.emitter.line("(module");
        self.nested(|composer| {
            composer.emitter.line(";; fd_write(fd, iovec_addr, iovec_count, bytes_written_addr)");
            composer.emitter.line("(import \"wasi_unstable\" \"fd_write\" (func $fd_write (param i32 i32 i32 i32) (result i32)))");
            composer.emitter.line(";; fd_read(fd, iovec_addr, iovec_count, bytes_read_addr)");
            composer.emitter.line("(import \"wasi_unstable\" \"fd_read\" (func $fd_read (param i32 i32 i32 i32) (result i32)))");
            composer.emitter.line("(import \"wasi_unstable\" \"proc_exit\" (func $proc_exit (param i32)))");
            composer.emitter.line("");
            composer.emitter.line("(memory 1)");
            composer.emitter.line("");
            composer.emitter.line(format!("(func $_start (local {} i32)", DP));
            composer.nested(|composer| {
                composer.emitter.line(format!(
                    "(i32.store (i32.const {}) (i32.const 1))",
                    IO_VEC_ARRAY_LENGTH
                ));
                program.body.accept_each(composer);
                composer.emitter.line("(call $proc_exit (i32.const 0))");
            });
            composer.emitter.line(")");
            composer.emitter.line("");
            composer.emitter.line("(export \"memory\" (memory 0))");
            composer.emitter.line("(export \"_start\" (func $_start))");
        });
        self.emitter.line(")");
    }

    fn visit_move(&mut self, amount: i32) {
        self.emitter.line(format!("local.get {}", DP));
        self.emitter.line(format!("i32.const {}", amount));
        self.emitter.line("i32.add");
        self.emitter.line(format!("local.set {}", DP));
    }

    fn visit_add(&mut self, amount: i32) {
        // store8 keeps the low byte so the add wraps by itself
        self.emitter.line(format!("local.get {}", DP));
        self.emitter.line(format!("local.get {}", DP));
        self.emitter.line("i32.load8_u");
        self.emitter.line(format!("i32.const {}", wrapping_byte(amount)));
        self.emitter.line("i32.add");
        self.emitter.line("i32.store8");
    }

    fn visit_zero(&mut self) {
        self.emitter.line(format!("(i32.store8 (local.get {}) (i32.const 0))", DP));
    }

    fn visit_loop(&mut self, node: &LoopBlock) {
        let exit = Frame::Exit(node.id);
        let repeat = Frame::Repeat(node.id);

        self.structured(&format!("block ;; exit {}", node.id), exit, |composer| {
            composer.structured(&format!("loop ;; loop {}", node.id), repeat, |composer| {
                composer.emitter.line(format!("(i32.load8_u (local.get {}))", DP));
                composer.emitter.line("i32.eqz");
                let depth = composer.depth_of(exit);
                composer.emitter.line(format!("br_if {}", depth));
                node.body.accept_each(composer);
                let depth = composer.depth_of(repeat);
                composer.emitter.line(format!("br {}", depth));
            });
        });
    }

    fn visit_print(&mut self) {
        self.fd_call("fd_write", STDOUT, IO_BYTES_WRITTEN_ADDR);
    }

    fn visit_read(&mut self) {
        // reading 0 bytes at end of input leaves the cell alone
        self.fd_call("fd_read", STDIN, IO_BYTES_READ_ADDR);
    }
}
