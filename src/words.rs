use rand::Rng;

/// Rotating words shown when the pool is not overridden on the CLI or in
/// the config file.
pub const DEFAULT_WORDS: &[&str] = &[
    "developer",
    "software developer",
    "full-stack dev",
    "web dev",
    "student",
    "videographer",
    "designer",
    "content creator",
    "tech enthusiast",
    "programmer",
    "coder",
    "UI/UX designer",
    "nutella lover!",
    "compsci kid",
    "compsci class rep!",
];

pub fn default_words() -> Vec<String> {
    DEFAULT_WORDS.iter().map(|w| w.to_string()).collect()
}

/// Strategy for choosing the next word to type.
///
/// The session asks for an index into its pool once at construction and
/// again every time a word has been fully erased.
pub trait WordPicker {
    /// Pick an index in `0..len`. `len` is always non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random selection. Repeats are allowed: each pick is
/// independent of the previous one.
pub struct RandomPicker;

impl WordPicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Walks the pool in order, wrapping at the end. Used by `--in-order`
/// and wherever tests need a deterministic word sequence.
pub struct CyclePicker {
    next: usize,
}

impl CyclePicker {
    pub fn new() -> Self {
        Self { next: 0 }
    }
}

impl Default for CyclePicker {
    fn default() -> Self {
        Self::new()
    }
}

impl WordPicker for CyclePicker {
    fn pick(&mut self, len: usize) -> usize {
        let idx = self.next % len;
        self.next = idx + 1;
        idx
    }
}
