use crate::words::WordPicker;
use std::fmt;
use std::time::Duration;

/// Caret glyph appended to the displayed text while the blink is lit.
pub const CARET: char = '|';

/// One step of the typewriter cycle. The cycle has no terminal state; it
/// runs until the owning element is torn down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Typing,
    PausedAfterType,
    Deleting,
    PausedAfterDelete,
}

/// Pacing for a typewriter session. Every duration must be non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pacing {
    pub type_interval: Duration,
    pub delete_interval: Duration,
    pub post_type_pause: Duration,
    pub post_delete_pause: Duration,
    pub caret_blink: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            type_interval: Duration::from_millis(100),
            delete_interval: Duration::from_millis(50),
            post_type_pause: Duration::from_millis(1500),
            post_delete_pause: Duration::from_millis(750),
            caret_blink: Duration::from_millis(500),
        }
    }
}

impl Pacing {
    fn validate(&self) -> Result<(), SessionError> {
        let fields = [
            ("type interval", self.type_interval),
            ("delete interval", self.delete_interval),
            ("post-type pause", self.post_type_pause),
            ("post-delete pause", self.post_delete_pause),
            ("caret blink period", self.caret_blink),
        ];
        for (what, duration) in fields {
            if duration.is_zero() {
                return Err(SessionError::ZeroInterval(what));
            }
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    /// The rotating-word pool was empty.
    NoWords,
    /// A pacing duration was zero.
    ZeroInterval(&'static str),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWords => write!(f, "at least one rotating word is required"),
            Self::ZeroInterval(what) => write!(f, "{} must be greater than zero", what),
        }
    }
}

impl std::error::Error for SessionError {}

/// Typewriter headline state: a fixed prefix plus one rotating word,
/// revealed and erased a character at a time.
///
/// The session is advanced by a cooperative tick source; it owns no
/// timers of its own. `advance` drives the phase machine, `blink` drives
/// the caret, and both accept arbitrary deltas so a stalled host frame
/// catches up deterministically.
pub struct Typewriter {
    base_text: String,
    words: Vec<String>,
    pacing: Pacing,
    picker: Box<dyn WordPicker>,
    active_word: usize,
    /// Characters of `base_text + active word` currently shown.
    /// Never drops below the base text length.
    cursor: usize,
    phase: Phase,
    phase_elapsed: Duration,
    caret_elapsed: Duration,
    caret_on: bool,
    cycles: u64,
}

impl std::fmt::Debug for Typewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typewriter")
            .field("base_text", &self.base_text)
            .field("words", &self.words)
            .field("pacing", &self.pacing)
            .field("picker", &"<dyn WordPicker>")
            .field("active_word", &self.active_word)
            .field("cursor", &self.cursor)
            .field("phase", &self.phase)
            .field("phase_elapsed", &self.phase_elapsed)
            .field("caret_elapsed", &self.caret_elapsed)
            .field("caret_on", &self.caret_on)
            .field("cycles", &self.cycles)
            .finish()
    }
}

impl Typewriter {
    pub fn new(
        base_text: String,
        words: Vec<String>,
        pacing: Pacing,
        mut picker: Box<dyn WordPicker>,
    ) -> Result<Self, SessionError> {
        if words.is_empty() {
            return Err(SessionError::NoWords);
        }
        pacing.validate()?;

        let cursor = base_text.chars().count();
        let active_word = picker.pick(words.len());
        Ok(Self {
            base_text,
            words,
            pacing,
            picker,
            active_word,
            cursor,
            phase: Phase::Typing,
            phase_elapsed: Duration::ZERO,
            caret_elapsed: Duration::ZERO,
            caret_on: true,
            cycles: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn caret_on(&self) -> bool {
        self.caret_on
    }

    pub fn active_word(&self) -> &str {
        &self.words[self.active_word]
    }

    /// Words fully typed and erased since the session started.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    fn base_len(&self) -> usize {
        self.base_text.chars().count()
    }

    fn target_len(&self) -> usize {
        self.base_len() + self.words[self.active_word].chars().count()
    }

    /// Advance the phase machine by `dt`, consuming as many whole
    /// intervals as have elapsed. A delta spanning several type
    /// intervals reveals several characters.
    pub fn advance(&mut self, dt: Duration) {
        self.phase_elapsed += dt;
        loop {
            let due = match self.phase {
                Phase::Typing => self.pacing.type_interval,
                Phase::PausedAfterType => self.pacing.post_type_pause,
                Phase::Deleting => self.pacing.delete_interval,
                Phase::PausedAfterDelete => self.pacing.post_delete_pause,
            };
            if self.phase_elapsed < due {
                break;
            }
            self.phase_elapsed -= due;
            self.step();
        }
    }

    /// Advance the caret blink by `dt`. Independent of the phase
    /// machine: toggling never touches `cursor` or `phase`, and phase
    /// transitions never reset the blink.
    pub fn blink(&mut self, dt: Duration) {
        self.caret_elapsed += dt;
        while self.caret_elapsed >= self.pacing.caret_blink {
            self.caret_elapsed -= self.pacing.caret_blink;
            self.caret_on = !self.caret_on;
        }
    }

    // One elapsed interval in the current phase.
    fn step(&mut self) {
        match self.phase {
            Phase::Typing => {
                if self.cursor < self.target_len() {
                    self.cursor += 1;
                }
                if self.cursor == self.target_len() {
                    self.enter(Phase::PausedAfterType);
                }
            }
            Phase::PausedAfterType => self.enter(Phase::Deleting),
            Phase::Deleting => {
                if self.cursor > self.base_len() {
                    self.cursor -= 1;
                }
                if self.cursor == self.base_len() {
                    self.enter(Phase::PausedAfterDelete);
                }
            }
            Phase::PausedAfterDelete => {
                self.active_word = self.picker.pick(self.words.len());
                self.cycles += 1;
                self.enter(Phase::Typing);
            }
        }
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.phase_elapsed = Duration::ZERO;
    }

    /// Restart the cycle: erase back to the base text, pick a fresh word
    /// and begin typing it.
    pub fn restart(&mut self) {
        self.active_word = self.picker.pick(self.words.len());
        self.cursor = self.base_len();
        self.enter(Phase::Typing);
    }

    /// Currently revealed text: the base prefix plus the typed portion
    /// of the active word. Pure; calling it repeatedly without an
    /// intervening tick returns identical output.
    pub fn display_text(&self) -> String {
        self.base_text
            .chars()
            .chain(self.words[self.active_word].chars())
            .take(self.cursor)
            .collect()
    }

    /// Display text with the caret glyph appended while the blink is
    /// lit. This is the string handed to the presenter.
    pub fn rendered_text(&self) -> String {
        let mut text = self.display_text();
        if self.caret_on {
            text.push(CARET);
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::CyclePicker;

    fn pacing_ms(type_ms: u64) -> Pacing {
        Pacing {
            type_interval: Duration::from_millis(type_ms),
            delete_interval: Duration::from_millis(type_ms / 2),
            post_type_pause: Duration::from_millis(1500),
            post_delete_pause: Duration::from_millis(750),
            caret_blink: Duration::from_millis(500),
        }
    }

    fn session(base: &str, words: &[&str]) -> Typewriter {
        Typewriter::new(
            base.to_string(),
            words.iter().map(|w| w.to_string()).collect(),
            pacing_ms(10),
            Box::new(CyclePicker::new()),
        )
        .unwrap()
    }

    #[test]
    fn construction_rejects_empty_pool() {
        let err = Typewriter::new(
            "Hi ".to_string(),
            vec![],
            Pacing::default(),
            Box::new(CyclePicker::new()),
        )
        .unwrap_err();
        assert_eq!(err, SessionError::NoWords);
    }

    #[test]
    fn construction_rejects_zero_intervals() {
        let mut pacing = Pacing::default();
        pacing.delete_interval = Duration::ZERO;
        let err = Typewriter::new(
            "Hi ".to_string(),
            vec!["Bob".to_string()],
            pacing,
            Box::new(CyclePicker::new()),
        )
        .unwrap_err();
        assert_eq!(err, SessionError::ZeroInterval("delete interval"));
    }

    #[test]
    fn starts_showing_only_the_base_text() {
        let tw = session("Hi ", &["Bob"]);
        assert_eq!(tw.display_text(), "Hi ");
        assert_eq!(tw.phase(), Phase::Typing);
    }

    #[test]
    fn types_one_char_per_interval() {
        let mut tw = session("Hi ", &["Bob"]);
        tw.advance(Duration::from_millis(10));
        assert_eq!(tw.display_text(), "Hi B");
        tw.advance(Duration::from_millis(10));
        assert_eq!(tw.display_text(), "Hi Bo");
        tw.advance(Duration::from_millis(10));
        assert_eq!(tw.display_text(), "Hi Bob");
        assert_eq!(tw.phase(), Phase::PausedAfterType);
    }

    #[test]
    fn sub_interval_deltas_accumulate() {
        let mut tw = session("Hi ", &["Bob"]);
        tw.advance(Duration::from_millis(4));
        tw.advance(Duration::from_millis(4));
        assert_eq!(tw.display_text(), "Hi ");
        tw.advance(Duration::from_millis(4));
        assert_eq!(tw.display_text(), "Hi B");
    }

    #[test]
    fn large_delta_reveals_multiple_chars() {
        let mut tw = session("Hi ", &["Bob"]);
        tw.advance(Duration::from_millis(25));
        assert_eq!(tw.display_text(), "Hi Bo");
    }

    #[test]
    fn pause_after_type_then_deletes() {
        let mut tw = session("Hi ", &["Bob"]);
        tw.advance(Duration::from_millis(30));
        assert_eq!(tw.phase(), Phase::PausedAfterType);

        // still paused until the post-type pause elapses
        tw.advance(Duration::from_millis(1499));
        assert_eq!(tw.phase(), Phase::PausedAfterType);
        assert_eq!(tw.display_text(), "Hi Bob");

        tw.advance(Duration::from_millis(1));
        assert_eq!(tw.phase(), Phase::Deleting);
    }

    #[test]
    fn deletes_back_to_base_and_never_past_it() {
        let mut tw = session("Hi ", &["Bob"]);
        tw.advance(Duration::from_millis(30)); // typed
        tw.advance(Duration::from_millis(1500)); // pause over
        tw.advance(Duration::from_millis(5));
        assert_eq!(tw.display_text(), "Hi Bo");
        tw.advance(Duration::from_millis(10));
        assert_eq!(tw.display_text(), "Hi ");
        assert_eq!(tw.phase(), Phase::PausedAfterDelete);

        // further deleting time must not eat into the base text
        tw.advance(Duration::from_millis(5));
        assert_eq!(tw.display_text(), "Hi ");
    }

    #[test]
    fn repicks_a_word_after_the_delete_pause() {
        let mut tw = session("Hi ", &["Bob", "Eve"]);
        assert_eq!(tw.active_word(), "Bob");
        tw.advance(Duration::from_millis(30)); // type Bob
        tw.advance(Duration::from_millis(1500)); // post-type pause
        tw.advance(Duration::from_millis(15)); // delete Bob
        assert_eq!(tw.phase(), Phase::PausedAfterDelete);
        tw.advance(Duration::from_millis(750)); // post-delete pause
        assert_eq!(tw.phase(), Phase::Typing);
        assert_eq!(tw.active_word(), "Eve");
        assert_eq!(tw.cycles(), 1);
    }

    #[test]
    fn display_text_is_idempotent() {
        let mut tw = session("Hi ", &["Bob"]);
        tw.advance(Duration::from_millis(10));
        let first = tw.display_text();
        assert_eq!(first, tw.display_text());
        assert_eq!(first, tw.display_text());
    }

    #[test]
    fn length_is_monotonic_within_each_phase() {
        let mut tw = session("Hi ", &["developer"]);
        let mut last = tw.display_text().chars().count();
        while tw.phase() == Phase::Typing {
            tw.advance(Duration::from_millis(10));
            let len = tw.display_text().chars().count();
            assert!(len >= last);
            last = len;
        }
        tw.advance(Duration::from_millis(1500));
        while tw.phase() == Phase::Deleting {
            tw.advance(Duration::from_millis(5));
            let len = tw.display_text().chars().count();
            assert!(len <= last);
            assert!(len >= "Hi ".chars().count());
            last = len;
        }
    }

    #[test]
    fn caret_blinks_on_its_own_period() {
        let mut tw = session("Hi ", &["Bob"]);
        assert!(tw.caret_on());
        tw.blink(Duration::from_millis(499));
        assert!(tw.caret_on());
        tw.blink(Duration::from_millis(1));
        assert!(!tw.caret_on());
        tw.blink(Duration::from_millis(500));
        assert!(tw.caret_on());
    }

    #[test]
    fn caret_never_touches_cursor_or_phase() {
        let mut tw = session("Hi ", &["Bob"]);
        tw.advance(Duration::from_millis(10));
        let text = tw.display_text();
        let phase = tw.phase();
        tw.blink(Duration::from_millis(5000));
        assert_eq!(tw.display_text(), text);
        assert_eq!(tw.phase(), phase);
    }

    #[test]
    fn rendered_text_appends_caret_only_while_lit() {
        let mut tw = session("Hi ", &["Bob"]);
        assert_eq!(tw.rendered_text(), "Hi |");
        tw.blink(Duration::from_millis(500));
        assert_eq!(tw.rendered_text(), "Hi ");
    }

    #[test]
    fn empty_word_cycles_without_typing() {
        let mut tw = session("Hi ", &[""]);
        assert_eq!(tw.display_text(), "Hi ");
        // first type interval finds nothing to reveal and pauses
        tw.advance(Duration::from_millis(10));
        assert_eq!(tw.phase(), Phase::PausedAfterType);
        assert_eq!(tw.display_text(), "Hi ");
    }

    #[test]
    fn multibyte_base_text_counts_chars_not_bytes() {
        let mut tw = session("héllo ", &["wörld"]);
        assert_eq!(tw.display_text(), "héllo ");
        tw.advance(Duration::from_millis(10));
        assert_eq!(tw.display_text(), "héllo w");
        tw.advance(Duration::from_millis(40));
        assert_eq!(tw.display_text(), "héllo wörld");
    }

    #[test]
    fn restart_erases_to_base_and_types_again() {
        let mut tw = session("Hi ", &["Bob", "Eve"]);
        tw.advance(Duration::from_millis(30));
        assert_eq!(tw.display_text(), "Hi Bob");
        tw.restart();
        assert_eq!(tw.display_text(), "Hi ");
        assert_eq!(tw.phase(), Phase::Typing);
        assert_eq!(tw.active_word(), "Eve");
    }
}
