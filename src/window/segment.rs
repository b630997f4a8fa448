// Window segmentation — tokenize a document and slide a fixed-size
// window across it.
//
// Tokenization here is deliberately simple (lowercased word runs); the
// heavy linguistic feature extraction lives outside this crate. The same
// tokenizer is shared by the rolling-delta, impostors, and lexicon
// analyzers so their vocabularies agree.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::error::AnalysisError;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9']+").expect("word pattern compiles"));

/// Split text into lowercase word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// Lazy, finite iterator over `(start_index, window_text)` pairs.
///
/// Yields windows of `window_size` tokens advancing by `step` tokens,
/// stopping before any window would run past the end of the document.
/// A document shorter than one window yields exactly one window at index
/// 0 covering the whole text — short input is not an error.
pub struct TokenWindows {
    tokens: Vec<String>,
    window_size: usize,
    step: usize,
    next_start: usize,
    done: bool,
}

impl TokenWindows {
    /// Number of tokens in the underlying document.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

impl Iterator for TokenWindows {
    type Item = (usize, String);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        // Short-document case: one window with everything.
        if self.tokens.len() < self.window_size {
            self.done = true;
            return Some((0, self.tokens.join(" ")));
        }

        if self.next_start + self.window_size > self.tokens.len() {
            self.done = true;
            return None;
        }

        let start = self.next_start;
        let text = self.tokens[start..start + self.window_size].join(" ");
        self.next_start += self.step;
        Some((start, text))
    }
}

/// Segment `text` into overlapping windows of `window_size` tokens,
/// advancing by `step` tokens. Both must be positive.
pub fn generate_windows(
    text: &str,
    window_size: usize,
    step: usize,
) -> Result<TokenWindows, AnalysisError> {
    if window_size == 0 {
        return Err(AnalysisError::InvalidParameter(
            "window size must be a positive integer".to_string(),
        ));
    }
    if step == 0 {
        return Err(AnalysisError::InvalidParameter(
            "window step must be a positive integer".to_string(),
        ));
    }

    Ok(TokenWindows {
        tokens: tokenize(text),
        window_size,
        step,
        next_start: 0,
        done: false,
    })
}
