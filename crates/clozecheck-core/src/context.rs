//! Per-session context: random source, settings, workarounds and the
//! active alphabet.

use rand::Rng;

use crate::config::{Settings, Workarounds};
use crate::model::Locale;
use crate::rng::SessionRng;
use crate::text::{self, Alphabet};

/// How a test session draws its randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Reproducible from `seed`; prefers random text over configured
    /// solutions and salts produced text with markup characters.
    Regression { seed: u64 },
    /// Seeded from system entropy.
    Random,
}

/// Everything the generators and the readjustment engine read besides the
/// question itself.
#[derive(Debug, Clone)]
pub struct Context {
    pub rng: SessionRng,
    pub mode: SessionMode,
    pub settings: Settings,
    pub workarounds: Workarounds,
    /// Characters random cloze text is built from.
    pub alphabet: Alphabet,
    /// Locale used for export names.
    pub locale: Locale,
}

impl Context {
    pub fn new(
        mode: SessionMode,
        settings: Settings,
        workarounds: Workarounds,
        locale: Locale,
    ) -> Self {
        let rng = match mode {
            SessionMode::Regression { seed } => SessionRng::seeded(seed),
            SessionMode::Random => SessionRng::from_entropy(),
        };
        let alphabet = Alphabet::cloze(&workarounds);
        Self {
            rng,
            mode,
            settings,
            workarounds,
            alphabet,
            locale,
        }
    }

    /// A regression context with default settings and workarounds.
    pub fn regression(seed: u64) -> Self {
        Self::new(
            SessionMode::Regression { seed },
            Settings::default(),
            Workarounds::default(),
            Locale::default(),
        )
    }

    /// Whether text gaps should favor random text over configured options.
    pub fn prefer_text(&self) -> bool {
        matches!(self.mode, SessionMode::Regression { .. })
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.random::<f64>() < p
    }

    /// Random text for a gap that accepts up to `size` characters.
    ///
    /// Regression sessions always fill the full size and interleave the
    /// alphabet's markup characters (`<`, `>`) with random characters.
    /// Random sessions pick the length uniformly from `0..=size`.
    pub fn produce_text(&mut self, size: usize) -> String {
        match self.mode {
            SessionMode::Regression { .. } => self.produce_salted_text(size),
            SessionMode::Random => {
                let len = self.rng.random_range(0..=size);
                text::random_text(&mut self.rng, len, &self.alphabet)
            }
        }
    }

    fn produce_salted_text(&mut self, size: usize) -> String {
        let mut special: Vec<char> = ['<', '>', '\n']
            .into_iter()
            .filter(|c| self.alphabet.contains(*c))
            .collect();
        if special.is_empty() {
            return text::random_text(&mut self.rng, size, &self.alphabet);
        }

        let mut produced = String::new();
        let mut len = 0;
        while len < size {
            if len % special.len() == 0 {
                let piece = text::random_text(&mut self.rng, 1, &self.alphabet);
                len += piece.chars().count();
                produced.push_str(&piece);
            } else {
                produced.push(special[0]);
                special.rotate_left(1);
                len += 1;
            }
        }
        produced
    }

    /// Text of `size` characters that never parses as a number.
    pub fn produce_non_numeric_text(&mut self, size: usize) -> String {
        text::random_non_numeric_text(&mut self.rng, size, &self.alphabet)
    }

    pub fn strip_whitespace(&self, value: &str) -> String {
        text::strip_whitespace(value, &self.workarounds)
    }
}
