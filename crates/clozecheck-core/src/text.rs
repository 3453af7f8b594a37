//! Random text production and textual mutation of answers.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use crate::config::{Settings, Workarounds};
use crate::context::Context;
use crate::numeric::looks_numeric;

const BASE_CHARS: &str = " ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789\
éáèêäöüÄÖÜß?!.-_:;#§%&=^|\\{\\}[]()@+-*/~'\"\t";

const ENTITIES: [&str; 3] = ["&lt;", "&gt;", "&amp;"];

/// Tokens that random text is assembled from. Most tokens are single
/// characters; HTML entities count with their full length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    tokens: Vec<String>,
}

impl Alphabet {
    pub fn new(allow_newlines: bool, allow_dollar: bool, allow_clamps: bool) -> Self {
        let mut chars = BASE_CHARS.to_string();
        if allow_newlines {
            chars.push('\n');
        }
        if allow_clamps {
            chars.push_str("<>");
        }
        if allow_dollar {
            chars.push('$');
        }
        let mut tokens: Vec<String> = chars.chars().map(String::from).collect();
        tokens.extend(ENTITIES.iter().map(|e| e.to_string()));
        Self { tokens }
    }

    /// The alphabet for cloze gaps; never contains newlines.
    pub fn cloze(workarounds: &Workarounds) -> Self {
        Self::new(
            false,
            !workarounds.disallow_dollar_in_cloze,
            !workarounds.disallow_clamps_in_cloze,
        )
    }

    /// A copy of this alphabet without any decimal digits.
    pub fn without_digits(&self) -> Self {
        Self {
            tokens: self
                .tokens
                .iter()
                .filter(|t| !t.chars().any(|c| c.is_ascii_digit()))
                .cloned()
                .collect(),
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.tokens.iter().any(|t| t.chars().eq(std::iter::once(c)))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.tokens.choose(rng).map(String::as_str).unwrap_or(" ")
    }
}

/// A random number-looking string of at most `n` characters.
pub fn random_number<R: Rng + ?Sized>(rng: &mut R, n: usize) -> String {
    match n {
        0 => String::new(),
        1 => rng.random_range(0..=9u32).to_string(),
        _ if rng.random::<f64>() < 0.5 => {
            if rng.random::<f64>() < 0.5 {
                format!(".{}", rng.random_range(0..=max_with_digits(n - 1)))
            } else {
                let value = rng.random::<f64>() * 1000.0;
                value.to_string().chars().take(n).collect()
            }
        }
        _ => {
            let mut s = String::new();
            if rng.random::<f64>() < 0.5 {
                s.push('+');
            }
            let digits = n - s.len();
            s.push_str(&rng.random_range(0..=max_with_digits(digits)).to_string());
            s
        }
    }
}

fn max_with_digits(digits: usize) -> u64 {
    10u64.pow(digits.min(18) as u32) - 1
}

/// Random text of exactly `n` characters (5% of the time a number of at
/// most `n` characters instead).
pub fn random_text<R: Rng + ?Sized>(rng: &mut R, n: usize, alphabet: &Alphabet) -> String {
    if rng.random::<f64>() * 100.0 < 5.0 {
        return random_number(rng, n);
    }
    fill_from(rng, n, alphabet)
}

fn fill_from<R: Rng + ?Sized>(rng: &mut R, n: usize, alphabet: &Alphabet) -> String {
    let mut text = String::new();
    let mut len = 0;
    while len < n {
        let token = alphabet.choose(rng);
        let token_len = token.chars().count();
        if len + token_len <= n {
            text.push_str(token);
            len += token_len;
        }
    }
    text
}

/// Random text of `n` characters that does not parse as a number.
pub fn random_non_numeric_text<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    alphabet: &Alphabet,
) -> String {
    let letters = alphabet.without_digits();
    loop {
        let text = fill_from(rng, n.max(1), &letters);
        if !looks_numeric(&text) && !text.trim().is_empty() {
            return text;
        }
    }
}

/// Number of characters to enter into a gap of the given size limit.
pub fn max_entry_size(size: Option<usize>, settings: &Settings) -> usize {
    size.unwrap_or(settings.max_cloze_text_length)
}

/// The ways a configured answer may be disturbed before it is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMutation {
    Unmodified,
    RandomChars,
    RandomCase,
    Permutation,
    Replacement,
}

impl TextMutation {
    const WEIGHTED: [(TextMutation, f64); 5] = [
        (TextMutation::Unmodified, 0.5),
        (TextMutation::RandomChars, 0.2),
        (TextMutation::RandomCase, 0.1),
        (TextMutation::Permutation, 0.1),
        (TextMutation::Replacement, 0.1),
    ];

    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::WEIGHTED
            .choose_weighted(rng, |(_, weight)| *weight)
            .map(|(mode, _)| *mode)
            .unwrap_or(TextMutation::Unmodified)
    }
}

const CHAR_MUTATION_P: f64 = 0.2;

/// Mutate `text` with a randomly chosen [`TextMutation`]. `size` is the gap's
/// size limit, used for full replacements.
pub fn mutate_text(text: &str, size: Option<usize>, ctx: &mut Context) -> String {
    let mode = TextMutation::choose(&mut ctx.rng);
    apply_mutation(mode, text, size, ctx)
}

pub fn apply_mutation(
    mode: TextMutation,
    text: &str,
    size: Option<usize>,
    ctx: &mut Context,
) -> String {
    match mode {
        TextMutation::Unmodified => text.to_string(),
        TextMutation::Permutation => {
            let mut chars: Vec<char> = text.chars().collect();
            chars.shuffle(&mut ctx.rng);
            chars.into_iter().collect()
        }
        TextMutation::Replacement => {
            let len = max_entry_size(size, &ctx.settings);
            ctx.produce_text(len)
        }
        TextMutation::RandomChars => {
            let mut mutated = String::with_capacity(text.len());
            for c in text.chars() {
                if ctx.rng.random::<f64>() < CHAR_MUTATION_P {
                    mutated.push_str(ctx.alphabet.choose(&mut ctx.rng));
                } else {
                    mutated.push(c);
                }
            }
            mutated
        }
        TextMutation::RandomCase => {
            let mut mutated = String::with_capacity(text.len());
            for c in text.chars() {
                if ctx.rng.random::<f64>() < CHAR_MUTATION_P {
                    push_swapped_case(&mut mutated, c);
                } else {
                    mutated.push(c);
                }
            }
            mutated
        }
    }
}

fn push_swapped_case(out: &mut String, c: char) {
    if c.is_uppercase() {
        out.extend(c.to_lowercase());
    } else if c.is_lowercase() {
        out.extend(c.to_uppercase());
    } else {
        out.push(c);
    }
}

/// Whitespace normalization applied before deciding whether an answer is
/// empty.
pub fn strip_whitespace(value: &str, workarounds: &Workarounds) -> String {
    let trimmed = value.trim();
    if workarounds.sloppy_whitespace {
        trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        trimmed.to_string()
    }
}

pub fn is_empty_answer(value: &str, workarounds: &Workarounds) -> bool {
    strip_whitespace(value, workarounds).is_empty()
}
