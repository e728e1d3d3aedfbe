/// Text buffer for the textual backends, owns the indentation depth.
///
/// The depth can only change through [`Composer::nested`] so every indent has its outdent.
#[derive(Debug, Clone)]
pub struct Emitter {
    buffer: String,
    depth: usize,
    indent: &'static str,
}

impl Emitter {
    pub fn new() -> Self {
        Self::with_depth(0)
    }

    /// Start already `depth` levels in, for bodies that live inside a fixed prologue
    pub fn with_depth(depth: usize) -> Self {
        Self {
            buffer: String::new(),
            depth,
            indent: "    ",
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// One line at the current depth, an empty `text` gives a blank line
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buffer.push_str(self.indent);
            }
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
    }

    /// Every line of `text` at the current depth
    pub fn lines(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    /// A line in column 0 whatever the depth (labels)
    pub fn label(&mut self, text: impl AsRef<str>) {
        self.buffer.push_str(text.as_ref());
        self.buffer.push('\n');
    }

    /// Appended exactly as given
    pub fn raw(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

/// The per backend visitor that writes into an [`Emitter`]
pub trait Composer: Sized {
    fn emitter(&mut self) -> &mut Emitter;

    /// Runs `emit` one level deeper
    fn nested<F: FnOnce(&mut Self)>(&mut self, emit: F) {
        self.emitter().depth += 1;
        emit(self);
        self.emitter().depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blocks {
        emitter: Emitter,
    }

    impl Composer for Blocks {
        fn emitter(&mut self) -> &mut Emitter {
            &mut self.emitter
        }
    }

    #[test]
    fn nesting_is_balanced() {
        let mut blocks = Blocks {
            emitter: Emitter::new(),
        };
        blocks.emitter.line("a {");
        blocks.nested(|b| {
            b.emitter.line("b {");
            b.nested(|b| b.emitter.lines("c\nd"));
            b.emitter.label("e:");
            b.emitter.line("}");
        });
        blocks.emitter.line("");
        blocks.emitter.line("}");
        assert_eq!(blocks.emitter.depth(), 0);
        assert_eq!(
            blocks.emitter.finish(),
            "a {\n    b {\n        c\n        d\ne:\n    }\n\n}\n"
        );
    }
}
