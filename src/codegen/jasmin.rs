use crate::parser::{wrapping_byte, LoopBlock, Program, Visitor};

use super::{CodeGenerator, Composer, Emitter, MEMORY_SIZE};

// local variable slots, 0 is `args`
const MEMORY: u8 = 1;
const DP: u8 = 2;
const INPUT: u8 = 3;

/// Text for the Jasmin JVM assembler: a `Main` class whose `main` runs the program on a
/// `byte[]` with `System.in`/`System.out` for I/O.
pub struct JasminCodeGenerator;

impl CodeGenerator for JasminCodeGenerator {
    fn compose(&self, program: &Program) -> String {
        let mut composer = JasminComposer {
            emitter: Emitter::new(),
            next_read: 0,
        };
        program.accept(&mut composer);
        composer.emitter.finish()
    }
}

struct JasminComposer {
    emitter: Emitter,
    /// each read needs its own skip label
    next_read: usize,
}

impl Composer for JasminComposer {
    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}

/// The shortest instruction pushing `value`
fn push_int(value: i32) -> String {
    match value {
        -1 => String::from("iconst_m1"),
        0..=5 => format!("iconst_{}", value),
        -128..=127 => format!("bipush {}", value),
        -32768..=32767 => format!("sipush {}", value),
        _ => format!("ldc {}", value),
    }
}

impl JasminComposer {
    fn load_cell_address(&mut self) {
        self.emitter.line(format!("aload_{}", MEMORY));
        self.emitter.line(format!("iload_{}", DP));
    }
}

impl Visitor for JasminComposer {
    type Output = ();

    fn visit_program(&mut self, program: &Program) {
        self.emitter.label(".class public Main");
        self.emitter.label(".super java/lang/Object");
        self.emitter.label("");
        self.emitter.label(".method public static main([Ljava/lang/String;)V");
        self.nested(|composer| {
            composer.emitter.line(".limit stack 6");
            composer.emitter.line(".limit locals 4");
            composer.emitter.line(push_int(MEMORY_SIZE as i32));
            composer.emitter.line("newarray byte");
            composer.emitter.line(format!("astore_{}", MEMORY));
            composer.emitter.line("iconst_0");
            composer.emitter.line(format!("istore_{}", DP));

            program.body.accept_each(composer);

            composer.emitter.line("getstatic java/lang/System/out Ljava/io/PrintStream;");
            composer.emitter.line("invokevirtual java/io/PrintStream/flush()V");
            composer.emitter.line("return");
        });
        self.emitter.label(".end method");
    }

    fn visit_move(&mut self, amount: i32) {
        // iinc only takes a signed 16 bit constant
        let mut remaining = amount;
        while remaining != 0 {
            let step = remaining.clamp(i16::MIN as i32, i16::MAX as i32);
            self.emitter.line(format!("iinc {} {}", DP, step));
            remaining -= step;
        }
    }

    fn visit_add(&mut self, amount: i32) {
        self.load_cell_address();
        self.emitter.line("dup2");
        self.emitter.line("baload");
        self.emitter.line(push_int(wrapping_byte(amount) as i8 as i32));
        self.emitter.line("iadd");
        self.emitter.line("i2b");
        self.emitter.line("bastore");
    }

    fn visit_zero(&mut self) {
        self.load_cell_address();
        self.emitter.line("iconst_0");
        self.emitter.line("bastore");
    }

    fn visit_loop(&mut self, node: &LoopBlock) {
        self.emitter.label(format!("Lstart_{}:", node.id));
        self.load_cell_address();
        self.emitter.line("baload");
        self.emitter.line(format!("ifeq Lend_{}", node.id));
        self.nested(|composer| {
            node.body.accept_each(composer);
        });
        self.emitter.line(format!("goto Lstart_{}", node.id));
        self.emitter.label(format!("Lend_{}:", node.id));
    }

    fn visit_print(&mut self) {
        self.emitter.line("getstatic java/lang/System/out Ljava/io/PrintStream;");
        self.load_cell_address();
        self.emitter.line("baload");
        self.emitter.line("invokevirtual java/io/PrintStream/write(I)V");
    }

    fn visit_read(&mut self) {
        let skip = format!("Leof_{}", self.next_read);
        self.next_read += 1;

        self.emitter.line("getstatic java/lang/System/in Ljava/io/InputStream;");
        self.emitter.line("invokevirtual java/io/InputStream/read()I");
        self.emitter.line(format!("istore {}", INPUT));
        self.emitter.line(format!("iload {}", INPUT));
        // -1 is end of input, leave the cell alone
        self.emitter.line(format!("iflt {}", skip));
        self.load_cell_address();
        self.emitter.line(format!("iload {}", INPUT));
        self.emitter.line("i2b");
        self.emitter.line("bastore");
        self.emitter.label(format!("{}:", skip));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::scan, optimizer::optimize, parser::parse};

    fn compose(source: &str) -> String {
        JasminCodeGenerator.compose(&optimize(&parse(&scan(source)).unwrap(), 2))
    }

    #[test]
    fn constants_use_the_short_forms() {
        assert_eq!(push_int(-1), "iconst_m1");
        assert_eq!(push_int(5), "iconst_5");
        assert_eq!(push_int(-128), "bipush -128");
        assert_eq!(push_int(30_000), "sipush 30000");
        assert_eq!(push_int(70_000), "ldc 70000");
    }

    #[test]
    fn big_moves_are_split() {
        let asm = compose(&"<".repeat(40_000));
        assert!(asm.contains("iinc 2 -32768\n"));
        assert!(asm.contains("iinc 2 -7232\n"));
    }

    #[test]
    fn loops_and_reads_have_unique_labels() {
        let asm = compose(",[.,]>,[.,]");
        for label in ["Lstart_0:", "Lend_0:", "Lstart_1:", "Lend_1:", "Leof_0:", "Leof_1:", "Leof_2:", "Leof_3:"] {
            assert_eq!(asm.matches(label).count(), 1, "{}", label);
        }
    }

    #[test]
    fn adds_store_wrapped_bytes() {
        let asm = compose(",+++");
        assert!(asm.contains("    dup2\n    baload\n    iconst_3\n    iadd\n    i2b\n    bastore\n"));
    }
}
