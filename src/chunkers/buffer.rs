//! Token-budgeted accumulation of text units.

/// Running buffer of paragraphs or sentences waiting to become a chunk.
///
/// The running total counts each unit plus one separator between units, so
/// the budget check never undercounts the joined text. The joined text is
/// recounted when the chunk is built.
pub(crate) struct ChunkBuffer {
    separator: &'static str,
    separator_tokens: usize,
    units: Vec<String>,
    tokens: usize,
}

impl ChunkBuffer {
    pub(crate) fn new(separator: &'static str, separator_tokens: usize) -> Self {
        Self {
            separator,
            separator_tokens,
            units: Vec::new(),
            tokens: 0,
        }
    }

    fn joining_cost(&self) -> usize {
        if self.units.is_empty() {
            0
        } else {
            self.separator_tokens
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Whether a unit of `unit_tokens` can join without passing `budget`.
    pub(crate) fn fits(&self, unit_tokens: usize, budget: usize) -> bool {
        self.tokens + self.joining_cost() + unit_tokens <= budget
    }

    pub(crate) fn push(&mut self, unit: String, unit_tokens: usize) {
        self.tokens += self.joining_cost() + unit_tokens;
        self.units.push(unit);
    }

    /// Drain the buffer into its joined text.
    pub(crate) fn take(&mut self) -> Option<String> {
        if self.units.is_empty() {
            return None;
        }
        let text = self.units.join(self.separator);
        self.units.clear();
        self.tokens = 0;
        Some(text)
    }
}
