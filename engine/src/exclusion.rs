//! Token exclusion and typing-sequence regeneration.
//!
//! Snippets arrive as lines of categorized tokens. A typing-mode preset
//! decides which categories the user actually types; applying it yields a
//! filtered line with a regenerated contiguous typing sequence and a
//! char-index-to-token map for the renderer.
//!
//! This is a pure, stateless transform: the sync engine neither calls it
//! nor is called by it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Category assigned to a token by the snippet tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    Parenthesis,
    CurlyBrace,
    SquareBracket,
    AngleBracket,
    Operator,
    Punctuation,
    StringContent,
    StringDelimiter,
    Comment,
    Keyword,
    Identifier,
}

/// One display token within a snippet line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The literal text of the token
    pub text: String,
    /// Raw node type from the tokenizer
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the current preset asks the user to type this token
    pub typeable: bool,
    /// Whether the token is typeable at all (false for whitespace)
    pub base_typeable: bool,
    /// Starting display column
    pub start_col: usize,
    /// Ending display column (exclusive)
    pub end_col: usize,
    /// Categories this token belongs to; may be empty
    #[serde(default)]
    pub categories: Vec<TokenCategory>,
}

/// Maps one character of the typing sequence back to its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharRef {
    /// Index into the typeable subset of `display_tokens`
    pub token_idx: usize,
    /// Display column of the owning token
    pub display_col: usize,
}

/// One line of a snippet, with its typing sequence and char map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub line_number: usize,
    pub indent_level: usize,
    pub display_tokens: Vec<Token>,
    /// Concatenation of the typeable token texts
    pub typing_sequence: String,
    /// Char index within `typing_sequence` to token reference
    pub char_map: BTreeMap<usize, CharRef>,
}

/// The named typing-mode presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypingMode {
    /// Type only keywords and identifiers
    Minimal,
    /// Balanced practice without pinky strain (recommended)
    #[default]
    Standard,
    /// Type everything except whitespace and comments
    Full,
}

/// Exclusion rules for one typing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    /// Token categories the user does not type in this mode
    pub exclude: &'static [TokenCategory],
    /// Literal token texts that stay typeable even when their category
    /// is excluded
    pub include_specific: &'static [&'static str],
}

const MINIMAL: Preset = Preset {
    name: "Minimal",
    description: "Type only keywords and identifiers",
    exclude: &[
        TokenCategory::Parenthesis,
        TokenCategory::CurlyBrace,
        TokenCategory::SquareBracket,
        TokenCategory::AngleBracket,
        TokenCategory::Operator,
        TokenCategory::Punctuation,
        TokenCategory::StringContent,
        TokenCategory::StringDelimiter,
        TokenCategory::Comment,
    ],
    include_specific: &[],
};

const STANDARD: Preset = Preset {
    name: "Standard",
    description: "Balanced practice without pinky strain (recommended)",
    exclude: &[
        TokenCategory::CurlyBrace,
        TokenCategory::SquareBracket,
        TokenCategory::AngleBracket,
        TokenCategory::StringContent,
        TokenCategory::Punctuation,
        TokenCategory::StringDelimiter,
        TokenCategory::Comment,
    ],
    include_specific: &[":", ".", ",", "(", ")"],
};

const FULL: Preset = Preset {
    name: "Full",
    description: "Type everything except whitespace and comments",
    exclude: &[TokenCategory::Comment, TokenCategory::StringContent],
    include_specific: &[],
};

impl TypingMode {
    /// The exclusion rules for this mode.
    pub fn preset(self) -> &'static Preset {
        match self {
            TypingMode::Minimal => &MINIMAL,
            TypingMode::Standard => &STANDARD,
            TypingMode::Full => &FULL,
        }
    }
}

/// User-facing configuration persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    pub preset: TypingMode,
    pub language: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            preset: TypingMode::Standard,
            language: "python".to_string(),
        }
    }
}

/// Apply a typing-mode preset to a line.
///
/// Recomputes each token's `typeable` flag, then regenerates the typing
/// sequence and char map from the surviving tokens. Tokens with no
/// categories stay typeable whenever they are base-typeable; an
/// `include_specific` match overrides any category exclusion.
pub fn apply_exclusion(line: &Line, mode: TypingMode) -> Line {
    let preset = mode.preset();

    let filtered_tokens: Vec<Token> = line
        .display_tokens
        .iter()
        .map(|token| {
            let typeable = token_typeable(token, preset);
            Token {
                typeable,
                ..token.clone()
            }
        })
        .collect();

    let typing_sequence: String = filtered_tokens
        .iter()
        .filter(|t| t.typeable)
        .map(|t| t.text.as_str())
        .collect();

    let mut char_map = BTreeMap::new();
    let mut char_idx = 0;
    for (token_idx, token) in filtered_tokens.iter().filter(|t| t.typeable).enumerate() {
        for _ in token.text.chars() {
            char_map.insert(
                char_idx,
                CharRef {
                    token_idx,
                    display_col: token.start_col,
                },
            );
            char_idx += 1;
        }
    }

    Line {
        line_number: line.line_number,
        indent_level: line.indent_level,
        display_tokens: filtered_tokens,
        typing_sequence,
        char_map,
    }
}

fn token_typeable(token: &Token, preset: &Preset) -> bool {
    if !token.base_typeable {
        return false;
    }
    if token.categories.is_empty() {
        return true;
    }
    if preset.include_specific.contains(&token.text.as_str()) {
        return true;
    }
    !token
        .categories
        .iter()
        .any(|category| preset.exclude.contains(category))
}
