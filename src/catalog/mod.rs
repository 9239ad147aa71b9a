//! Provider catalogs
//!
//! One IR catalog per provider. Every typed contract in [`crate::schemas`] has
//! a definition here under the same name.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::ir::Catalog;

pub mod anthropic;
pub mod googleai;
pub mod ollama;
pub mod openai;

static ANTHROPIC: LazyLock<Catalog> = LazyLock::new(anthropic::catalog);
static OPENAI: LazyLock<Catalog> = LazyLock::new(openai::catalog);
static GOOGLEAI: LazyLock<Catalog> = LazyLock::new(googleai::catalog);
static OLLAMA: LazyLock<Catalog> = LazyLock::new(ollama::catalog);

/// LLM API provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    #[value(name = "openai")]
    OpenAi,
    #[value(name = "googleai", alias = "google")]
    GoogleAi,
    Ollama,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::Anthropic,
        Provider::OpenAi,
        Provider::GoogleAi,
        Provider::Ollama,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::OpenAi => "openai",
            Provider::GoogleAi => "googleai",
            Provider::Ollama => "ollama",
        }
    }

    /// The provider's catalog, built on first use.
    pub fn catalog(&self) -> &'static Catalog {
        match self {
            Provider::Anthropic => &ANTHROPIC,
            Provider::OpenAi => &OPENAI,
            Provider::GoogleAi => &GOOGLEAI,
            Provider::Ollama => &OLLAMA,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" => Ok(Provider::Anthropic),
            "openai" => Ok(Provider::OpenAi),
            "googleai" | "google" => Ok(Provider::GoogleAi),
            "ollama" => Ok(Provider::Ollama),
            _ => Err(SchemaError::UnknownProvider(s.to_string())),
        }
    }
}

/// Log the size of a freshly built catalog.
pub(crate) fn built(catalog: Catalog) -> Catalog {
    tracing::debug!(
        provider = %catalog.provider(),
        definitions = catalog.len(),
        "Built schema catalog"
    );
    catalog
}
