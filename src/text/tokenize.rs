use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// Letters, numbers and `_`. Plain `\w` also matches combining marks, joiners and
// connector punctuation.
static WORD_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}_]+").expect("valid word regex"));

/// A maximal run of word characters and its `[start, end)` character span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// Number of characters covered by the token.
    #[inline]
    pub fn char_len(&self) -> usize {
        self.end - self.start
    }
}

/// Splits `document` into word-character runs: Unicode letters, numbers and `_`.
///
/// Combining marks, joiners and other connector punctuation act as separators.
///
/// Separators produce no tokens. An empty document, or one without word characters,
/// yields an empty vector.
pub fn tokenize(document: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars_before = 0usize;
    let mut byte_cursor = 0usize;

    for m in WORD_RUN.find_iter(document) {
        chars_before += document[byte_cursor..m.start()].chars().count();
        let len = m.as_str().chars().count();

        tokens.push(Token {
            text: m.as_str().to_string(),
            start: chars_before,
            end: chars_before + len,
        });

        chars_before += len;
        byte_cursor = m.end();
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_only_separators() {
        assert!(tokenize("  ,.;!? -- \n\t").is_empty());
    }

    #[test]
    fn test_tokenize_ascii_offsets() {
        let tokens = tokenize("the quick, brown fox!");
        assert_eq!(texts(&tokens), ["the", "quick", "brown", "fox"]);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 3));
        assert_eq!((tokens[1].start, tokens[1].end), (4, 9));
        assert_eq!((tokens[2].start, tokens[2].end), (11, 16));
        assert_eq!((tokens[3].start, tokens[3].end), (17, 20));
    }

    #[test]
    fn test_tokenize_cyrillic_uses_char_offsets() {
        let doc = "быстрая лиса прыгает";
        let tokens = tokenize(doc);
        assert_eq!(texts(&tokens), ["быстрая", "лиса", "прыгает"]);
        assert_eq!((tokens[1].start, tokens[1].end), (8, 12));
        assert_eq!((tokens[2].start, tokens[2].end), (13, 20));
        assert_eq!(doc.chars().count(), 20);
    }

    #[test]
    fn test_tokenize_digits_and_underscore() {
        let tokens = tokenize("v2_final-7 (x)");
        assert_eq!(texts(&tokens), ["v2_final", "7", "x"]);
    }

    #[test]
    fn test_tokenize_spans_cover_word_runs() {
        let doc = "Привет, мир!  hello_world 42...ok";
        let chars: Vec<char> = doc.chars().collect();
        let tokens = tokenize(doc);

        let mut prev_end = 0;
        for token in &tokens {
            assert!(token.start < token.end);
            assert!(token.start >= prev_end);
            let slice: String = chars[token.start..token.end].iter().collect();
            assert_eq!(slice, token.text);
            prev_end = token.end;
        }

        let covered: usize = tokens.iter().map(Token::char_len).sum();
        let word_chars = chars
            .iter()
            .filter(|c| c.is_alphanumeric() || **c == '_')
            .count();
        assert_eq!(covered, word_chars);
    }

    fn spans(tokens: &[Token]) -> Vec<(&str, usize, usize)> {
        tokens
            .iter()
            .map(|t| (t.text.as_str(), t.start, t.end))
            .collect()
    }

    #[test]
    fn test_tokenize_combining_mark_separates() {
        let tokens = tokenize("моло\u{301}ко");
        assert_eq!(spans(&tokens), [("моло", 0, 4), ("ко", 5, 7)]);
    }

    #[test]
    fn test_tokenize_joiners_and_connectors_separate() {
        let tokens = tokenize("a\u{200D}b x\u{203F}y");
        assert_eq!(
            spans(&tokens),
            [("a", 0, 1), ("b", 2, 3), ("x", 4, 5), ("y", 6, 7)]
        );
    }

    #[test]
    fn test_tokenize_letter_numbers_are_word_chars() {
        let tokens = tokenize("глава Ⅻ ½");
        assert_eq!(texts(&tokens), ["глава", "Ⅻ", "½"]);
    }
}
