use crate::parser::{wrapping_byte, LoopBlock, Program, Visitor};

use super::{CodeGenerator, Composer, Emitter, MEMORY_SIZE};

/// LLVM IR (opaque pointers) calling libc's `putchar`/`getchar`.
///
/// Every value is a fresh `%tN`; the data pointer lives in a stack slot and is reloaded
/// around every instruction.
pub struct LlvmCodeGenerator;

impl CodeGenerator for LlvmCodeGenerator {
    fn compose(&self, program: &Program) -> String {
        let mut composer = LlvmComposer {
            emitter: Emitter::with_depth(1),
            next_name: 0,
            ptr: String::new(),
        };
        program.accept(&mut composer);
        composer.emitter.finish()
    }
}

struct LlvmComposer {
    emitter: Emitter,
    /// shared by values & blocks, never reset during a run
    next_name: usize,
    /// the slot holding the data pointer
    ptr: String,
}

impl Composer for LlvmComposer {
    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}

impl LlvmComposer {
    /// `N` names nobody else in this module has used
    fn fresh<const N: usize>(&mut self) -> [String; N] {
        std::array::from_fn(|_| {
            let name = format!("t{}", self.next_name);
            self.next_name += 1;
            name
        })
    }
}

impl Visitor for LlvmComposer {
    type Output = ();

    fn visit_program(&mut self, program: &Program) {
        let [memory, ptr, start] = self.fresh();
        self.ptr = ptr.clone();

        self.emitter.label("declare void @llvm.memset.p0.i64(ptr nocapture writeonly, i8, i64, i1 immarg)");
        self.emitter.label("declare i32 @putchar(i32)");
        self.emitter.label("declare i32 @getchar()");
        self.emitter.label("");
        self.emitter.label("define i32 @main() {");
        self.emitter.label("entry:");
        self.emitter.line(format!("%{} = alloca [{} x i8], align 16", memory, MEMORY_SIZE));
        self.emitter.line(format!("%{} = alloca ptr, align 8", ptr));
        self.emitter.line(format!(
            "call void @llvm.memset.p0.i64(ptr align 16 %{}, i8 0, i64 {}, i1 false)",
            memory, MEMORY_SIZE
        ));
        self.emitter.line(format!(
            "%{} = getelementptr inbounds [{} x i8], ptr %{}, i64 0, i64 0",
            start, MEMORY_SIZE, memory
        ));
        self.emitter.line(format!("store ptr %{}, ptr %{}, align 8", start, ptr));

        program.body.accept_each(self);

        self.emitter.line("ret i32 0");
        self.emitter.label("}");
    }

    fn visit_move(&mut self, amount: i32) {
        let [a, b] = self.fresh();
        self.emitter.line(format!("%{} = load ptr, ptr %{}, align 8", a, self.ptr));
        self.emitter.line(format!("%{} = getelementptr inbounds i8, ptr %{}, i64 {}", b, a, amount));
        self.emitter.line(format!("store ptr %{}, ptr %{}, align 8", b, self.ptr));
    }

    fn visit_add(&mut self, amount: i32) {
        let [a, b, c] = self.fresh();
        self.emitter.line(format!("%{} = load ptr, ptr %{}, align 8", a, self.ptr));
        self.emitter.line(format!("%{} = load i8, ptr %{}, align 1", b, a));
        // i8 arithmetic wraps, the constant just has to be in signed range
        self.emitter.line(format!("%{} = add i8 %{}, {}", c, b, wrapping_byte(amount) as i8));
        self.emitter.line(format!("store i8 %{}, ptr %{}, align 1", c, a));
    }

    fn visit_zero(&mut self) {
        let [a] = self.fresh();
        self.emitter.line(format!("%{} = load ptr, ptr %{}, align 8", a, self.ptr));
        self.emitter.line(format!("store i8 0, ptr %{}, align 1", a));
    }

    fn visit_loop(&mut self, node: &LoopBlock) {
        let [cond, a, b, c] = self.fresh();
        let body = format!("{}.body", cond);
        let end = format!("{}.end", cond);

        self.emitter.line(format!("br label %{}", cond));
        self.emitter.label(format!("{}:", cond));
        self.emitter.line(format!("%{} = load ptr, ptr %{}, align 8", a, self.ptr));
        self.emitter.line(format!("%{} = load i8, ptr %{}, align 1", b, a));
        self.emitter.line(format!("%{} = icmp ne i8 %{}, 0", c, b));
        self.emitter.line(format!("br i1 %{}, label %{}, label %{}", c, body, end));
        self.emitter.label(format!("{}:", body));
        node.body.accept_each(self);
        self.emitter.line(format!("br label %{}", cond));
        self.emitter.label(format!("{}:", end));
    }

    fn visit_print(&mut self) {
        let [a, b, c, d] = self.fresh();
        self.emitter.line(format!("%{} = load ptr, ptr %{}, align 8", a, self.ptr));
        self.emitter.line(format!("%{} = load i8, ptr %{}, align 1", b, a));
        self.emitter.line(format!("%{} = zext i8 %{} to i32", c, b));
        self.emitter.line(format!("%{} = call i32 @putchar(i32 %{})", d, c));
    }

    fn visit_read(&mut self) {
        let [a, b, c, d, e, f] = self.fresh();
        self.emitter.line(format!("%{} = call i32 @getchar()", a));
        self.emitter.line(format!("%{} = icmp eq i32 %{}, -1", b, a));
        self.emitter.line(format!("%{} = load ptr, ptr %{}, align 8", c, self.ptr));
        self.emitter.line(format!("%{} = load i8, ptr %{}, align 1", d, c));
        self.emitter.line(format!("%{} = trunc i32 %{} to i8", e, a));
        // EOF keeps the old value
        self.emitter.line(format!("%{} = select i1 %{}, i8 %{}, i8 %{}", f, b, d, e));
        self.emitter.line(format!("store i8 %{}, ptr %{}, align 1", f, c));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{lexer::scan, optimizer::optimize, parser::parse};

    fn compose(source: &str) -> String {
        LlvmCodeGenerator.compose(&optimize(&parse(&scan(source)).unwrap(), 2))
    }

    #[test]
    fn every_value_is_assigned_once() {
        let ir = compose(",[>+<-]>[-]<<,.[,.]");
        let mut seen = HashSet::new();
        for line in ir.lines() {
            if let Some((lhs, _)) = line.trim().split_once(" = ") {
                assert!(seen.insert(lhs.to_string()), "{} assigned twice", lhs);
            }
        }
        assert!(seen.len() > 10);
    }

    #[test]
    fn loops_have_three_blocks() {
        let ir = compose(",[.[-.]]");
        // names 0..=2 go to the prologue, 3..=8 to the read
        assert!(ir.contains("br label %t9\nt9:\n"));
        assert!(ir.contains("label %t9.body, label %t9.end"));
        assert!(ir.contains("t9.end:\n"));
        // the inner loop gets its own blocks
        assert_eq!(ir.matches(".body:\n").count(), 2);
        assert_eq!(ir.matches(".end:\n").count(), 2);
    }

    #[test]
    fn adds_are_signed_bytes() {
        let ir = compose("+>-----");
        assert!(ir.contains("%t5 = add i8 %t4, 1\n"));
        assert!(ir.contains("%t10 = add i8 %t9, -5\n"));
    }
}
