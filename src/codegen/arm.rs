use crate::parser::{wrapping_byte, LoopBlock, Program, Visitor};

use super::{CodeGenerator, Composer, Emitter, MEMORY_SIZE};

/// Data pointer
const DP: &str = "r4";
const TEMP: &str = "r5";
/// Holds moves too big for an immediate
const SCRATCH: &str = "r6";

const STDIN: u8 = 0;
const STDOUT: u8 = 1;

const SYS_EXIT: u8 = 1;
const SYS_READ: u8 = 3;
const SYS_WRITE: u8 = 4;

/// 32 bit ARM assembly for GNU as, talking to Linux through `swi`
pub struct ArmCodeGenerator;

impl CodeGenerator for ArmCodeGenerator {
    fn compose(&self, program: &Program) -> String {
        let mut composer = ArmComposer {
            emitter: Emitter::new(),
        };
        program.accept(&mut composer);
        composer.emitter.finish()
    }
}

struct ArmComposer {
    emitter: Emitter,
}

impl Composer for ArmComposer {
    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}

impl ArmComposer {
    fn syscall(&mut self, fd: u8, number: u8) {
        self.emitter.line(format!("mov r0, #{}", fd));
        self.emitter.line(format!("mov r1, {}", DP));
        self.emitter.line("mov r2, #1");
        self.emitter.line(format!("mov r7, #{}", number));
        self.emitter.line("swi #0");
    }
}

impl Visitor for ArmComposer {
    type Output = ();

    fn visit_program(&mut self, program: &Program) {
        self.emitter.label(".bss");
        self.emitter.label(format!(".lcomm MEMORY, {}", MEMORY_SIZE));
        self.emitter.label(".text");
        self.emitter.label(".global _start");
        self.emitter.label("_start:");
        self.nested(|composer| {
            composer.emitter.line(format!("ldr {}, =MEMORY", DP));
            program.body.accept_each(composer);

            composer.emitter.line("@ exit(0)");
            composer.emitter.line("mov r0, #0");
            composer.emitter.line(format!("mov r7, #{}", SYS_EXIT));
            composer.emitter.line("swi #0");
        });
    }

    fn visit_move(&mut self, amount: i32) {
        let op = if amount < 0 { "sub" } else { "add" };
        let magnitude = amount.unsigned_abs();
        // only 8 bit immediates are always encodable
        if magnitude <= 0xFF {
            self.emitter.line(format!("{} {}, {}, #{}", op, DP, DP, magnitude));
        } else {
            self.emitter.line(format!("ldr {}, ={}", SCRATCH, magnitude));
            self.emitter.line(format!("{} {}, {}, {}", op, DP, DP, SCRATCH));
        }
    }

    fn visit_add(&mut self, amount: i32) {
        self.emitter.line(format!("ldrb {}, [{}]", TEMP, DP));
        self.emitter.line(format!("add {}, {}, #{}", TEMP, TEMP, wrapping_byte(amount)));
        self.emitter.line(format!("strb {}, [{}]", TEMP, DP));
    }

    fn visit_zero(&mut self) {
        self.emitter.line(format!("mov {}, #0", TEMP));
        self.emitter.line(format!("strb {}, [{}]", TEMP, DP));
    }

    fn visit_loop(&mut self, node: &LoopBlock) {
        self.emitter.label(format!(".Lstart_{}:", node.id));
        self.emitter.line(format!("ldrb {}, [{}]", TEMP, DP));
        self.emitter.line(format!("cmp {}, #0", TEMP));
        self.emitter.line(format!("beq .Lend_{}", node.id));
        self.nested(|composer| {
            node.body.accept_each(composer);
        });
        self.emitter.line(format!("b .Lstart_{}", node.id));
        self.emitter.label(format!(".Lend_{}:", node.id));
    }

    fn visit_print(&mut self) {
        self.syscall(STDOUT, SYS_WRITE);
    }

    fn visit_read(&mut self) {
        // at end of input nothing is read so the cell keeps its value
        self.syscall(STDIN, SYS_READ);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::scan, optimizer::optimize, parser::parse};

    fn compose(source: &str) -> String {
        ArmCodeGenerator.compose(&optimize(&parse(&scan(source)).unwrap(), 2))
    }

    #[test]
    fn identical_loops_get_distinct_labels() {
        let asm = compose(",[>]<[>]");
        assert!(asm.contains(".Lstart_0:"));
        assert!(asm.contains(".Lstart_1:"));
        assert_eq!(asm.matches("beq .Lend_0").count(), 1);
        assert_eq!(asm.matches("beq .Lend_1").count(), 1);
    }

    #[test]
    fn lowering() {
        let asm = compose("+++>>-.<<<<");
        assert!(asm.contains("    add r5, r5, #3\n"));
        assert!(asm.contains("    add r4, r4, #2\n"));
        assert!(asm.contains("    add r5, r5, #255\n"));
        assert!(asm.contains("    mov r7, #4\n"));
        assert!(asm.contains("    sub r4, r4, #4\n"));
        assert!(asm.starts_with(".bss\n.lcomm MEMORY, 30000\n"));
    }

    #[test]
    fn large_moves_use_a_register() {
        let asm = compose(&">".repeat(300));
        assert!(asm.contains("ldr r6, =300\n"));
        assert!(asm.contains("add r4, r4, r6\n"));
    }
}
