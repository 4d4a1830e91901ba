//! Localized strings as stored in event settings and question labels.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Text that is either the same in every locale or keyed by locale code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum I18nString {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl I18nString {
    /// Build a localized string from `(locale, text)` pairs, dropping blank texts.
    ///
    /// Returns `None` when every text is blank.
    pub fn from_pairs<I, K, V>(pairs: I) -> Option<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let map: BTreeMap<String, String> = pairs
            .into_iter()
            .filter_map(|(k, v)| {
                let text = v.as_ref().trim();
                (!text.is_empty()).then(|| (k.into(), text.to_string()))
            })
            .collect();
        (!map.is_empty()).then_some(Self::Localized(map))
    }

    /// True when no locale carries any text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Plain(s) => s.trim().is_empty(),
            Self::Localized(map) => map.values().all(|v| v.trim().is_empty()),
        }
    }

    /// Resolve the text for `locale`.
    ///
    /// Tries the exact locale, then its base language (`de` for `de-informal`),
    /// then `fallback`, then the first non-empty entry.
    pub fn localize(&self, locale: &str, fallback: &str) -> String {
        let map = match self {
            Self::Plain(s) => return s.clone(),
            Self::Localized(map) => map,
        };

        let base = locale.split(['-', '_']).next().unwrap_or(locale);
        [locale, base, fallback]
            .into_iter()
            .find_map(|key| map.get(key).filter(|v| !v.is_empty()))
            .or_else(|| map.values().find(|v| !v.is_empty()))
            .cloned()
            .unwrap_or_default()
    }
}

impl From<&str> for I18nString {
    fn from(s: &str) -> Self {
        Self::Plain(s.to_string())
    }
}
