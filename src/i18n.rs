//! Language selection for localization testing.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;

/// Languages offered by the switcher, in button order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Language {
    Fr,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Fr, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    /// Native display name shown on the button.
    pub fn label(self) -> &'static str {
        match self {
            Language::Fr => "français",
            Language::En => "english",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unsupported language `{s}`"))
    }
}

/// The localization subsystem as seen by the overlay: it reports the active
/// language and accepts commands to change it.
pub trait Localizer {
    fn language(&self) -> Language;
    fn change_language(&mut self, lang: Language);
}

/// Chrome strings the overlay itself displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    Languages,
    Palette,
    Usage,
    NoSamples,
    Copied,
    CopyFailed,
    Help,
}

pub fn translate(lang: Language, text: Text) -> &'static str {
    match (lang, text) {
        (Language::En, Text::Languages) => "lang",
        (Language::Fr, Text::Languages) => "langue",
        (Language::En, Text::Palette) => "palette",
        (Language::Fr, Text::Palette) => "palette",
        (Language::En, Text::Usage) => "cpu",
        (Language::Fr, Text::Usage) => "cpu",
        (Language::En, Text::NoSamples) => "no samples yet",
        (Language::Fr, Text::NoSamples) => "aucun échantillon",
        (Language::En, Text::Copied) => "copied",
        (Language::Fr, Text::Copied) => "copié",
        (Language::En, Text::CopyFailed) => "copy failed",
        (Language::Fr, Text::CopyFailed) => "échec de la copie",
        (Language::En, Text::Help) => "[d]ev [1/2]lang [enter]copy [q]uit",
        (Language::Fr, Text::Help) => "[d]ev [1/2]langue [entrée]copier [q]uitter",
    }
}

/// Built-in localizer: holds the active language in memory.
#[derive(Debug, Clone)]
pub struct Catalog {
    current: Language,
}

impl Catalog {
    pub fn new(current: Language) -> Self {
        Self { current }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Language::En)
    }
}

impl Localizer for Catalog {
    fn language(&self) -> Language {
        self.current
    }

    fn change_language(&mut self, lang: Language) {
        self.current = lang;
    }
}
