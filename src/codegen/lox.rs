use crate::parser::{wrapping_byte, LoopBlock, Program, Visitor};

use super::{CodeGenerator, Composer, Emitter, MEMORY_SIZE};

/// Lox has no arrays, so the tape (and the input) are doubly linked lists of cells.
const PRELUDE: &str = "\
class Cell {}

class Memory {
    init(size) {
        this.current = nil;
        var i = 0;
        while (i < size) {
            this.insert(0);
            i = i + 1;
        }
    }

    // Inserts a new cell at the beginning of the list.
    insert(value) {
        var cell = Cell();
        cell.value = value;
        cell.next = this.current;
        cell.prev = nil;
        if (this.current != nil) this.current.prev = cell;
        this.current = cell;
    }

    // Moves the current cell left (-amount) or right (+amount).
    move(amount) {
        var i = 0;
        while (i < amount) {
            this.current = this.current.next;
            i = i + 1;
        }
        while (i > amount) {
            this.current = this.current.prev;
            i = i - 1;
        }
    }

    get() { return this.current.value; }
    set(value) { this.current.value = value; }

    // Cells hold a byte, amounts are always 0..255.
    add(value) {
        var sum = this.current.value + value;
        if (sum > 255) sum = sum - 256;
        this.current.value = sum;
    }

    atEnd() { return this.current == nil; }
}
";

/// Lox script. Lox can't read input so it is baked in at generation time.
pub struct LoxCodeGenerator {
    input: Vec<u8>,
}

impl LoxCodeGenerator {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.as_bytes().to_vec(),
        }
    }
}

impl CodeGenerator for LoxCodeGenerator {
    fn compose(&self, program: &Program) -> String {
        let mut composer = LoxComposer {
            emitter: Emitter::new(),
            input: &self.input,
        };
        program.accept(&mut composer);
        composer.emitter.finish()
    }
}

struct LoxComposer<'a> {
    emitter: Emitter,
    input: &'a [u8],
}

impl<'a> Composer for LoxComposer<'a> {
    fn emitter(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}

impl<'a> Visitor for LoxComposer<'a> {
    type Output = ();

    fn visit_program(&mut self, program: &Program) {
        self.emitter.lines(PRELUDE);
        self.emitter.line("");
        self.emitter.line("var input = Memory(0);");
        // inserting at the front, so backwards gives the right order to read forwards
        for byte in self.input.iter().rev() {
            self.emitter.line(format!("input.insert({});", byte));
        }
        self.emitter.line(format!("var memory = Memory({});", MEMORY_SIZE));
        self.emitter.line("");

        program.body.accept_each(self);
    }

    fn visit_move(&mut self, amount: i32) {
        self.emitter.line(format!("memory.move({});", amount));
    }

    fn visit_add(&mut self, amount: i32) {
        self.emitter.line(format!("memory.add({});", wrapping_byte(amount)));
    }

    fn visit_zero(&mut self) {
        self.emitter.line("memory.set(0);");
    }

    fn visit_loop(&mut self, node: &LoopBlock) {
        self.emitter.line("while (memory.get() != 0) {");
        self.nested(|composer| {
            node.body.accept_each(composer);
        });
        self.emitter.line("}");
    }

    fn visit_print(&mut self) {
        self.emitter.line("print memory.get();");
    }

    fn visit_read(&mut self) {
        self.emitter.line("if (!input.atEnd()) { memory.set(input.get()); input.move(1); }");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::scan, optimizer::optimize, parser::parse};

    #[test]
    fn input_is_inserted_in_reverse() {
        let program = optimize(&parse(&scan(",.,.")).unwrap(), 1);
        let lox = LoxCodeGenerator::new("ab").compose(&program);
        let b = lox.find("input.insert(98);").unwrap();
        let a = lox.find("input.insert(97);").unwrap();
        assert!(b < a);
        assert!(lox.contains("var memory = Memory(30000);"));
        assert_eq!(lox.matches("memory.set(input.get())").count(), 2);
    }

    #[test]
    fn loops_are_indented_whiles() {
        let program = optimize(&parse(&scan("+[>+[-<]]")).unwrap(), 1);
        let lox = LoxCodeGenerator::new("").compose(&program);
        assert!(lox.contains(
            "memory.add(1);\nwhile (memory.get() != 0) {\n    memory.move(1);\n    memory.add(1);\n    while (memory.get() != 0) {\n        memory.add(255);\n        memory.move(-1);\n    }\n}\n"
        ));
    }
}
