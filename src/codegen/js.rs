use crate::parser::{wrapping_byte, LoopBlock, Program, Visitor};

use super::{CodeGenerator, Composer, Emitter, MEMORY_SIZE};

/// Node.js script, input comes from the script's arguments
pub struct JsCodeGenerator;

impl CodeGenerator for JsCodeGenerator {
    fn compose(&self, program: &Program) -> String {
        let mut composer = JsComposer {
            emitter: Emitter::new(),
        };
        program.accept(&mut composer);
        composer.emitter.finish()
    }
}

struct JsComposer {
    emitter: Emitter,
}

impl Composer for JsComposer {
    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}

impl Visitor for JsComposer {
    type Output = ();

    fn visit_program(&mut self, program: &Program) {
        self.emitter.line("#!/usr/bin/env node");
        self.emitter.line("'use strict'");
        // Uint8Array wraps on its own
        self.emitter.line(format!("const memory = new Uint8Array({})", MEMORY_SIZE));
        self.emitter.line("const input = Buffer.from(process.argv.slice(2).join(''))");
        self.emitter.line("const output = []");
        self.emitter.line("let inputPos = 0");
        self.emitter.line("let ptr = 0");
        program.body.accept_each(self);
        self.emitter.line("process.stdout.write(Buffer.from(output))");
    }

    fn visit_move(&mut self, amount: i32) {
        self.emitter.line(format!("ptr += {}", amount));
    }

    fn visit_add(&mut self, amount: i32) {
        self.emitter.line(format!("memory[ptr] += {}", wrapping_byte(amount)));
    }

    fn visit_zero(&mut self) {
        self.emitter.line("memory[ptr] = 0");
    }

    fn visit_loop(&mut self, node: &LoopBlock) {
        self.emitter.line("while (memory[ptr]) {");
        self.nested(|composer| {
            node.body.accept_each(composer);
        });
        self.emitter.line("}");
    }

    fn visit_print(&mut self) {
        self.emitter.line("output.push(memory[ptr])");
    }

    fn visit_read(&mut self) {
        self.emitter.line("if (inputPos < input.length) memory[ptr] = input[inputPos++]");
    }
}
