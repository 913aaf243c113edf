//! Batch-level notices and localized labels.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Language used for notices and UI labels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
pub enum Locale {
    /// Brazilian Portuguese.
    #[default]
    #[strum(serialize = "pt", serialize = "pt-BR", to_string = "pt-BR")]
    #[serde(rename = "pt-BR", alias = "pt")]
    PtBr,
    /// English.
    #[strum(serialize = "en", to_string = "en")]
    #[serde(rename = "en")]
    En,
}

/// Static UI strings for a locale.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub title: &'static str,
    pub show_more: &'static str,
    pub show_less: &'static str,
    pub download: &'static str,
    pub empty: &'static str,
    pub loading: &'static str,
}

impl Locale {
    /// Labels for rendering cards and chrome.
    pub fn labels(self) -> Labels {
        match self {
            Self::PtBr => Labels {
                title: "Upload e Gerar TXT",
                show_more: "Ver Mais",
                show_less: "Ver Menos",
                download: "Baixar TXT Gerado",
                empty: "Nenhum arquivo carregado. Pressione 'a' para abrir arquivos.",
                loading: "Lendo arquivos...",
            },
            Self::En => Labels {
                title: "Upload and Generate TXT",
                show_more: "Show More",
                show_less: "Show Less",
                download: "Download Generated TXT",
                empty: "No files loaded. Press 'a' to open files.",
                loading: "Reading files...",
            },
        }
    }
}

/// The single user-visible message slot, recomputed for every batch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BatchNotice {
    /// Nothing to report; clears any previous message.
    #[default]
    None,
    /// Every selected file was rejected by type.
    NoValidText,
    /// Some files were rejected by type, at least one was accepted.
    SomeIgnored,
    /// Some accepted files could not be read.
    Unreadable { names: Vec<String> },
    /// Both rejected files and unreadable files.
    IgnoredAndUnreadable { names: Vec<String> },
}

impl BatchNotice {
    /// Derive the notice for a completed batch.
    ///
    /// `accepted` counts files that passed the type filter (decoded or not),
    /// `rejected` counts files that did not, and `failed` names accepted
    /// files whose decode failed.
    pub fn from_outcome(accepted: usize, rejected: usize, failed: Vec<String>) -> Self {
        if accepted == 0 && rejected > 0 {
            return Self::NoValidText;
        }
        match (rejected > 0, failed.is_empty()) {
            (true, true) => Self::SomeIgnored,
            (true, false) => Self::IgnoredAndUnreadable { names: failed },
            (false, false) => Self::Unreadable { names: failed },
            (false, true) => Self::None,
        }
    }

    /// Whether the slot is empty.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Render the message; empty string when there is nothing to report.
    pub fn message(&self, locale: Locale) -> String {
        match self {
            Self::None => String::new(),
            Self::NoValidText => no_valid_text(locale).to_string(),
            Self::SomeIgnored => some_ignored(locale).to_string(),
            Self::Unreadable { names } => unreadable(locale, names),
            Self::IgnoredAndUnreadable { names } => {
                format!("{} {}", some_ignored(locale), unreadable(locale, names))
            }
        }
    }
}

fn no_valid_text(locale: Locale) -> &'static str {
    match locale {
        Locale::PtBr => "Nenhum arquivo de texto válido foi selecionado.",
        Locale::En => "No valid text file was selected.",
    }
}

fn some_ignored(locale: Locale) -> &'static str {
    match locale {
        Locale::PtBr => "Alguns arquivos foram ignorados por não serem arquivos de texto.",
        Locale::En => "Some files were ignored because they are not text files.",
    }
}

fn unreadable(locale: Locale, names: &[String]) -> String {
    let names = names.iter().join(", ");
    match locale {
        Locale::PtBr => format!("Não foi possível ler: {names}."),
        Locale::En => format!("Could not read: {names}."),
    }
}
