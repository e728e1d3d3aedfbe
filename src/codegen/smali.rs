use crate::parser::{wrapping_byte, LoopBlock, Program, Visitor};

use super::{CodeGenerator, Composer, Emitter, MEMORY_SIZE};

const MEMORY: &str = "v0";
const DP: &str = "v1";
const TEMP: &str = "v2";
const SCRATCH: &str = "v3";

/// Dalvik assembly for smali, a `LMain;` class with `print`/`read` helpers
pub struct SmaliCodeGenerator;

impl CodeGenerator for SmaliCodeGenerator {
    fn compose(&self, program: &Program) -> String {
        let mut composer = SmaliComposer {
            emitter: Emitter::new(),
            next_read: 0,
        };
        program.accept(&mut composer);
        composer.emitter.finish()
    }
}

struct SmaliComposer {
    emitter: Emitter,
    next_read: usize,
}

impl Composer for SmaliComposer {
    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}

const HELPERS: &str = "\
.method public static print(B)V
    .registers 2
    sget-object v0, Ljava/lang/System;->out:Ljava/io/PrintStream;
    invoke-virtual {v0, p0}, Ljava/io/PrintStream;->write(I)V
    return-void
.end method

.method public static read()I
    .registers 1
    sget-object v0, Ljava/lang/System;->in:Ljava/io/InputStream;
    invoke-virtual {v0}, Ljava/io/InputStream;->read()I
    move-result v0
    return v0
.end method
";

impl Visitor for SmaliComposer {
    type Output = ();

    fn visit_program(&mut self, program: &Program) {
        self.emitter.label(".class public LMain;");
        self.emitter.label(".super Ljava/lang/Object;");
        self.emitter.label("");
        self.emitter.label(".method public static main([Ljava/lang/String;)V");
        self.nested(|composer| {
            // v0-v3 are locals, p0 (args) is v4
            composer.emitter.line(".registers 5");
            composer.emitter.line(format!("const/16 {}, {}", MEMORY, MEMORY_SIZE));
            composer.emitter.line(format!("new-array {}, {}, [B", MEMORY, MEMORY));
            composer.emitter.line(format!("const/4 {}, 0", DP));

            program.body.accept_each(composer);

            composer.emitter.line(format!("sget-object {}, Ljava/lang/System;->out:Ljava/io/PrintStream;", TEMP));
            composer.emitter.line(format!("invoke-virtual {{{}}}, Ljava/io/PrintStream;->flush()V", TEMP));
            composer.emitter.line("return-void");
        });
        self.emitter.label(".end method");
        self.emitter.label("");
        self.emitter.raw(HELPERS);
    }

    fn visit_move(&mut self, amount: i32) {
        if i16::try_from(amount).is_ok() {
            self.emitter.line(format!("add-int/lit16 {}, {}, {}", DP, DP, amount));
        } else {
            self.emitter.line(format!("const {}, {}", SCRATCH, amount));
            self.emitter.line(format!("add-int {}, {}, {}", DP, DP, SCRATCH));
        }
    }

    fn visit_add(&mut self, amount: i32) {
        self.emitter.line(format!("aget-byte {}, {}, {}", TEMP, MEMORY, DP));
        self.emitter.line(format!("add-int/lit8 {}, {}, {}", TEMP, TEMP, wrapping_byte(amount) as i8));
        self.emitter.line(format!("int-to-byte {}, {}", TEMP, TEMP));
        self.emitter.line(format!("aput-byte {}, {}, {}", TEMP, MEMORY, DP));
    }

    fn visit_zero(&mut self) {
        self.emitter.line(format!("const/4 {}, 0", TEMP));
        self.emitter.line(format!("aput-byte {}, {}, {}", TEMP, MEMORY, DP));
    }

    fn visit_loop(&mut self, node: &LoopBlock) {
        self.emitter.line(format!(":start_{}", node.id));
        self.emitter.line(format!("aget-byte {}, {}, {}", TEMP, MEMORY, DP));
        self.emitter.line(format!("if-eqz {}, :end_{}", TEMP, node.id));
        self.nested(|composer| {
            node.body.accept_each(composer);
        });
        self.emitter.line(format!("goto :start_{}", node.id));
        self.emitter.line(format!(":end_{}", node.id));
    }

    fn visit_print(&mut self) {
        self.emitter.line(format!("aget-byte {}, {}, {}", TEMP, MEMORY, DP));
        self.emitter.line(format!("invoke-static {{{}}}, LMain;->print(B)V", TEMP));
    }

    fn visit_read(&mut self) {
        let skip = format!(":eof_{}", self.next_read);
        self.next_read += 1;

        self.emitter.line("invoke-static {}, LMain;->read()I");
        self.emitter.line(format!("move-result {}", TEMP));
        self.emitter.line(format!("if-ltz {}, {}", TEMP, skip));
        self.emitter.line(format!("aput-byte {}, {}, {}", TEMP, MEMORY, DP));
        self.emitter.line(skip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::scan, optimizer::optimize, parser::parse};

    fn compose(source: &str) -> String {
        SmaliCodeGenerator.compose(&optimize(&parse(&scan(source)).unwrap(), 2))
    }

    #[test]
    fn lowering() {
        let smali = compose(",[->+<]>.");
        assert!(smali.contains("    :start_0\n"));
        assert!(smali.contains("    if-eqz v2, :end_0\n"));
        assert!(smali.contains("        add-int/lit8 v2, v2, -1\n"));
        assert!(smali.contains("        add-int/lit16 v1, v1, -1\n"));
        assert!(smali.contains("invoke-static {v2}, LMain;->print(B)V"));
        assert!(smali.contains("if-ltz v2, :eof_0\n"));
        assert!(smali.ends_with(".end method\n"));
    }

    #[test]
    fn far_moves_go_through_a_register() {
        let smali = compose(&">".repeat(40_000));
        assert!(smali.contains("const v3, 40000\n"));
        assert!(smali.contains("add-int v1, v1, v3\n"));
    }
}
