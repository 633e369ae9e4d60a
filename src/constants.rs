//! Cross-cutting, shared defaults.
//!
//! Front ends pick different default thresholds: the interactive CLI is a little more
//! permissive than the HTTP service.

/// Default accept threshold for the `search` CLI.
pub const DEFAULT_CLI_THRESHOLD: f32 = 0.6;

/// Default accept threshold for the HTTP service.
pub const DEFAULT_SERVICE_THRESHOLD: f32 = 0.65;

/// Characters of surrounding text added on each side of the best candidate.
pub const DEFAULT_CONTEXT_CHARS: usize = 10;

/// Weight of the candidate score in the final blend (the context window gets the rest).
pub const DEFAULT_CONTEXT_WEIGHT: f32 = 0.8;

/// Longest phrase (in tokens) considered as a candidate.
pub const MAX_PHRASE_TOKENS: usize = 3;

/// Output dimension of the default sentence encoder (and of the stub embedder).
pub const DEFAULT_EMBEDDING_DIM: usize = 1024;

/// Max tokens fed to the sentence encoder per text.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Characters of the input used as the query when none is given.
pub const QUERY_FALLBACK_CHARS: usize = 100;

/// Characters of the input echoed back in HTTP responses.
pub const INPUT_PREVIEW_CHARS: usize = 100;

/// Max accepted request body (16 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub const SEMFIND_STATUS_HEADER: &str = "X-Semfind-Status";
pub const SEMFIND_STATUS_HEALTHY: &str = "healthy";
pub const SEMFIND_STATUS_READY: &str = "ready";
pub const SEMFIND_STATUS_SUCCESS: &str = "success";

/// Returns the first `max_chars` characters of `text`.
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
