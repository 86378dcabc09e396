//! Theme token source.
//!
//! The built-in token table ships with the binary; `--theme` swaps it for a
//! JSON file holding either `{"colors": {...}}` or a flat name → color spec object.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::palette::TokenMap;

const BUILTIN: &[(&str, &str)] = &[
    ("transparent", "transparent"),
    ("black", "#000000"),
    ("night", "#142533"),
    ("shark", "#2e3945"),
    ("smoke", "#666666"),
    ("dark", "#999999"),
    ("grey", "#a8a8a8"),
    ("fog", "#d8d8d8"),
    ("lightGrey", "#f6f6f6"),
    ("lightFog", "#f9f9f9"),
    ("white", "#ffffff"),
    ("wallet", "#6490f1"),
    ("pearl", "#ff0000"),
    ("alertRed", "#fc3d4f"),
    ("warning", "#fa8c16"),
    ("positiveGreen", "rgba(102, 190, 84, 0.7)"),
    ("identity", "#3b5998"),
    ("lead", "hsl(213, 44%, 15%)"),
];

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("reading theme {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing theme {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ThemeFile {
    Wrapped { colors: TokenMap },
    Flat(TokenMap),
}

/// The token table compiled into the binary.
pub fn builtin_tokens() -> TokenMap {
    BUILTIN
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

pub fn parse_tokens(json: &str) -> Result<TokenMap, serde_json::Error> {
    let file: ThemeFile = serde_json::from_str(json)?;
    Ok(match file {
        ThemeFile::Wrapped { colors } => colors,
        ThemeFile::Flat(map) => map,
    })
}

pub fn load_tokens(path: &Path) -> Result<TokenMap, ThemeError> {
    let json = fs::read_to_string(path).map_err(|source| ThemeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tokens(&json).map_err(|source| ThemeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
