use camino::Utf8Path;
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Str(String),
    Open,
    Close,
}

/// Splits manifest text into quoted strings and braces. Whitespace and `//`
/// comments are dropped; an unterminated string ends at end of input.
fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => tokens.push(Token::Open),
            '}' => tokens.push(Token::Close),
            '"' => {
                let mut s = String::new();
                while let Some(c) = chars.next() {
                    match c {
                        '"' => break,
                        '\\' => match chars.next() {
                            Some('n') => s.push('\n'),
                            Some('t') => s.push('\t'),
                            Some(other) => s.push(other),
                            None => break,
                        },
                        _ => s.push(c),
                    }
                }
                tokens.push(Token::Str(s));
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    tokens
}

#[derive(Clone, Copy)]
enum ScanState {
    /// Before the top-level block opened.
    Outside,
    /// Inside the top-level block at the given brace depth.
    Inside(usize),
}

/// Extracts the flat `"key" "value"` pairs of the top-level block.
///
/// This is a shallow parser: nested blocks are skipped wholesale, so keys that
/// only exist inside sub-blocks are never reported. Input without a block
/// yields an empty map. Repeated keys keep the last value.
pub fn parse_manifest(text: &str) -> BTreeMap<String, String> {
    let tokens = tokenize(text);
    let mut map = BTreeMap::new();
    let mut state = ScanState::Outside;
    let mut i = 0;

    while i < tokens.len() {
        match (state, &tokens[i]) {
            (ScanState::Outside, Token::Open) => state = ScanState::Inside(1),
            (ScanState::Outside, _) => {}
            (ScanState::Inside(depth), Token::Open) => state = ScanState::Inside(depth + 1),
            (ScanState::Inside(1), Token::Close) => return map,
            (ScanState::Inside(depth), Token::Close) => state = ScanState::Inside(depth - 1),
            (ScanState::Inside(1), Token::Str(key)) => {
                if let Some(Token::Str(value)) = tokens.get(i + 1) {
                    map.insert(key.clone(), value.clone());
                    i += 1;
                }
                // A key followed by `{` names a sub-block; the brace is handled next.
            }
            (ScanState::Inside(_), Token::Str(_)) => {}
        }
        i += 1;
    }

    if matches!(state, ScanState::Inside(_)) {
        debug!("Manifest block was not terminated, keeping {} pairs", map.len());
    }
    map
}

/// The two fields a manifest contributes to a [`GameMeta`](crate::models::library::GameMeta).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    pub app_id: String,
    pub install_dir: String,
}

/// Reads `appid` and `installdir`, defaulting each to `"unknown"`.
pub fn map_to_record(map: &BTreeMap<String, String>, source: &Utf8Path) -> ManifestRecord {
    let field = |key: &str| {
        map.get(key).cloned().unwrap_or_else(|| {
            warn!("Manifest {source} has no '{key}', using '{UNKNOWN}'");
            UNKNOWN.to_string()
        })
    };

    ManifestRecord {
        app_id: field("appid"),
        install_dir: field("installdir"),
    }
}
