//! Token types — the fungible credit categories traded on the marketplace.
//!
//! Each variant corresponds to one upstream AI provider. The set is a closed
//! enum: routing and capability decisions dispatch on the variant, never on
//! string matching.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CredexError;

/// A category of fungible credit, one per upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Openai,
    Anthropic,
    Google,
    Cohere,
    Mistral,
}

impl TokenType {
    /// All supported token types, in canonical order.
    pub const ALL: [TokenType; 5] = [
        TokenType::Openai,
        TokenType::Anthropic,
        TokenType::Google,
        TokenType::Cohere,
        TokenType::Mistral,
    ];

    /// Canonical lowercase name, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::Cohere => "cohere",
            Self::Mistral => "mistral",
        }
    }

    /// Human-readable catalog entry for this token type.
    #[must_use]
    pub fn info(self) -> TokenInfo {
        let (name, description) = match self {
            Self::Openai => (
                "OpenAI Credits",
                "Credits for OpenAI GPT models and APIs",
            ),
            Self::Anthropic => (
                "Anthropic Credits",
                "Credits for Claude and other Anthropic models",
            ),
            Self::Google => (
                "Google AI Credits",
                "Credits for Google Gemini and AI services",
            ),
            Self::Cohere => ("Cohere Credits", "Credits for Cohere language models"),
            Self::Mistral => ("Mistral Credits", "Credits for Mistral AI models"),
        };
        TokenInfo {
            token: self,
            name,
            description,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = CredexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Self::Openai),
            "anthropic" => Ok(Self::Anthropic),
            "google" => Ok(Self::Google),
            "cohere" => Ok(Self::Cohere),
            "mistral" => Ok(Self::Mistral),
            other => Err(CredexError::Internal(format!(
                "unknown token type: {other}"
            ))),
        }
    }
}

/// Catalog metadata for one token type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub token: TokenType,
    pub name: &'static str,
    pub description: &'static str,
}
