use serde::Serialize;

use super::tokenize::Token;
use crate::constants::MAX_PHRASE_TOKENS;

/// Phrase length of a [`Candidate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    Unigram,
    Bigram,
    Trigram,
}

impl CandidateKind {
    fn from_len(len: usize) -> Option<Self> {
        match len {
            1 => Some(Self::Unigram),
            2 => Some(Self::Bigram),
            3 => Some(Self::Trigram),
            _ => None,
        }
    }

    /// Number of tokens in the phrase.
    #[inline]
    pub fn token_count(&self) -> usize {
        match self {
            Self::Unigram => 1,
            Self::Bigram => 2,
            Self::Trigram => 3,
        }
    }
}

/// A 1-3 token phrase. `text` joins the token texts with single spaces; `[start, end)`
/// runs from the first token's start to the last token's end (character offsets).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub kind: CandidateKind,
}

impl Candidate {
    fn from_window(window: &[Token]) -> Option<Self> {
        let kind = CandidateKind::from_len(window.len())?;
        let first = window.first()?;
        let last = window.last()?;

        let text = window
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Some(Self {
            text,
            start: first.start,
            end: last.end,
            kind,
        })
    }

    /// Formats the span as `"<start> - <end>"`.
    pub fn position(&self) -> String {
        format!("{} - {}", self.start, self.end)
    }
}

impl From<&Token> for Candidate {
    fn from(token: &Token) -> Self {
        Self {
            text: token.text.clone(),
            start: token.start,
            end: token.end,
            kind: CandidateKind::Unigram,
        }
    }
}

/// Returns the exact number of candidates [`generate_candidates`] yields for `n` tokens.
#[inline]
pub fn candidate_count(n: usize) -> usize {
    (1..=MAX_PHRASE_TOKENS).map(|len| n.saturating_sub(len - 1)).sum()
}

/// Builds all contiguous 1-, 2- and 3-token phrases.
///
/// Order is fixed: every unigram in document order, then every bigram, then every
/// trigram. Tie-breaking in the match engine relies on this order.
pub fn generate_candidates(tokens: &[Token]) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(candidate_count(tokens.len()));

    for len in 1..=MAX_PHRASE_TOKENS {
        candidates.extend(tokens.windows(len).filter_map(Candidate::from_window));
    }

    candidates
}

/// Returns the slice of `document` covering characters
/// `[start - margin, end + margin)`, clamped to the document.
pub fn char_window(document: &str, start: usize, end: usize, margin: usize) -> &str {
    let from = start.saturating_sub(margin);
    let to = end.saturating_add(margin);

    let mut byte_from = document.len();
    let mut byte_to = document.len();

    for (char_idx, (byte_idx, _)) in document.char_indices().enumerate() {
        if char_idx == from {
            byte_from = byte_idx;
        }
        if char_idx == to {
            byte_to = byte_idx;
            break;
        }
    }

    if byte_from > byte_to {
        return "";
    }
    &document[byte_from..byte_to]
}
