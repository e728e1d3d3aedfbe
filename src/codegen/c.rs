use crate::parser::{wrapping_byte, LoopBlock, Program, Visitor};

use super::{CodeGenerator, Composer, Emitter, MEMORY_SIZE};

pub struct CCodeGenerator;

impl CodeGenerator for CCodeGenerator {
    fn compose(&self, program: &Program) -> String {
        let mut composer = CComposer {
            emitter: Emitter::new(),
        };
        program.accept(&mut composer);
        composer.emitter.finish()
    }
}

struct CComposer {
    emitter: Emitter,
}

impl Composer for CComposer {
    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}

impl Visitor for CComposer {
    type Output = ();

    fn visit_program(&mut self, program: &Program) {
        self.emitter.line("#include <stdio.h>");
        self.emitter.line("");
        self.emitter.line("int main(void) {");
        self.nested(|composer| {
            composer.emitter.line(format!("static unsigned char memory[{}];", MEMORY_SIZE));
            composer.emitter.line("unsigned char *ptr = memory;");
            composer.emitter.line("int c;");
            program.body.accept_each(composer);
            composer.emitter.line("return 0;");
        });
        self.emitter.line("}");
    }

    fn visit_move(&mut self, amount: i32) {
        self.emitter.line(format!("ptr += {};", amount));
    }

    fn visit_add(&mut self, amount: i32) {
        self.emitter.line(format!("*ptr += {};", wrapping_byte(amount)));
    }

    fn visit_zero(&mut self) {
        self.emitter.line("*ptr = 0;");
    }

    fn visit_loop(&mut self, node: &LoopBlock) {
        self.emitter.line("while (*ptr) {");
        self.nested(|composer| {
            node.body.accept_each(composer);
        });
        self.emitter.line("}");
    }

    fn visit_print(&mut self) {
        self.emitter.line("putchar(*ptr);");
    }

    fn visit_read(&mut self) {
        self.emitter.line("if ((c = getchar()) != EOF) *ptr = (unsigned char)c;");
    }
}
