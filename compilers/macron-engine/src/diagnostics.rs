use serde::Serialize;

/// Counters for one run. Filled per chunk and folded with [`absorb`].
///
/// [`absorb`]: Diagnostics::absorb
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub tokens: usize,
    /// Tokens whose markup carries at least one new marker.
    pub resolved: usize,
    pub malformed: usize,
    pub stop_words: usize,
    pub tagger_mismatches: usize,
    /// Tokens with nothing left to decide.
    pub skipped: usize,
    /// Forms given up on at the recursion ceiling.
    pub depth_exceeded: Vec<String>,
    /// Tokens left with candidates for an external disambiguator.
    pub ambiguous: usize,
    pub dichrona_before: usize,
    pub dichrona_after: usize,
}

impl Diagnostics {
    pub fn absorb(&mut self, other: Diagnostics) {
        self.tokens += other.tokens;
        self.resolved += other.resolved;
        self.malformed += other.malformed;
        self.stop_words += other.stop_words;
        self.tagger_mismatches += other.tagger_mismatches;
        self.skipped += other.skipped;
        self.depth_exceeded.extend(other.depth_exceeded);
        self.ambiguous += other.ambiguous;
        self.dichrona_before += other.dichrona_before;
        self.dichrona_after += other.dichrona_after;
    }

    /// Share of open dichrona that got a marker, 1.0 when there were none.
    pub fn ratio(&self) -> f64 {
        if self.dichrona_before == 0 {
            return 1.0;
        }
        let decided = self.dichrona_before.saturating_sub(self.dichrona_after);
        decided as f64 / self.dichrona_before as f64
    }
}
