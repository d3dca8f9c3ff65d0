use crate::domain::model::Locale;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::Deserialize;
use std::collections::HashMap;

pub const LANGUAGE_KEY: &str = "language";

const EMBEDDED_ES: &str = include_str!("../../locales/es.toml");
const EMBEDDED_EN: &str = include_str!("../../locales/en.toml");

#[derive(Debug, Deserialize)]
struct LocaleFile {
    strings: HashMap<String, String>,
}

/// The two static locale tables.
#[derive(Debug, Clone)]
pub struct LocaleTables {
    es: HashMap<String, String>,
    en: HashMap<String, String>,
}

impl LocaleTables {
    pub fn embedded() -> Result<Self> {
        Self::from_toml_strs(EMBEDDED_ES, EMBEDDED_EN)
    }

    pub fn from_toml_strs(es: &str, en: &str) -> Result<Self> {
        let es: LocaleFile = toml::from_str(es)?;
        let en: LocaleFile = toml::from_str(en)?;
        Ok(Self {
            es: es.strings,
            en: en.strings,
        })
    }

    pub fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        let table = match locale {
            Locale::Es => &self.es,
            Locale::En => &self.en,
        };
        table.get(key).map(String::as_str)
    }
}

/// An element whose text is driven by a translation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedText {
    pub key: String,
    pub text: String,
}

impl TaggedText {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageToggle {
    pub label: String,
    pub pressed: bool,
}

pub struct Translator<S: Storage> {
    storage: S,
    tables: LocaleTables,
    current: Locale,
}

impl<S: Storage> Translator<S> {
    /// Starts from the stored preference, falling back to Spanish.
    pub async fn load(storage: S, tables: LocaleTables) -> Self {
        let current = match storage.read(LANGUAGE_KEY).await {
            Ok(Some(code)) => code.parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring stored language: {}", e);
                Locale::default()
            }),
            Ok(None) => Locale::default(),
            Err(e) => {
                tracing::warn!("Could not read language preference: {}", e);
                Locale::default()
            }
        };

        Self {
            storage,
            tables,
            current,
        }
    }

    pub fn current(&self) -> Locale {
        self.current
    }

    pub fn translate(&self, key: &str) -> Option<&str> {
        self.tables.lookup(self.current, key)
    }

    /// Rewrite every node whose key the current table knows; returns how many
    /// nodes changed text.
    pub fn apply(&self, nodes: &mut [TaggedText]) -> usize {
        let mut updated = 0;
        for node in nodes.iter_mut() {
            if let Some(text) = self.tables.lookup(self.current, &node.key) {
                if node.text != text {
                    node.text = text.to_string();
                    updated += 1;
                }
            }
        }
        updated
    }

    pub async fn change(&mut self, locale: Locale, nodes: &mut [TaggedText]) -> usize {
        self.current = locale;
        if let Err(e) = self.storage.write(LANGUAGE_KEY, locale.code()).await {
            tracing::warn!("Could not save language preference: {}", e);
        }
        let updated = self.apply(nodes);
        tracing::debug!("Language set to {}, {} elements updated", locale, updated);
        updated
    }

    pub async fn toggle(&mut self, nodes: &mut [TaggedText]) -> Locale {
        let next = self.current.other();
        self.change(next, nodes).await;
        next
    }

    /// Value for the document's `lang` attribute.
    pub fn document_lang(&self) -> &'static str {
        self.current.code()
    }

    pub fn toggle_button(&self) -> LanguageToggle {
        LanguageToggle {
            label: self.current.code().to_uppercase(),
            pressed: self.current == Locale::En,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;

    fn page() -> Vec<TaggedText> {
        vec![
            TaggedText::new("nav.home", "Inicio"),
            TaggedText::new("hero.title", "Elegancia y Estilo en Cada Corte"),
            TaggedText::new("no.such.key", "sin traducir"),
        ]
    }

    #[test]
    fn test_embedded_tables() {
        let tables = LocaleTables::embedded().unwrap();
        assert_eq!(tables.lookup(Locale::Es, "nav.home"), Some("Inicio"));
        assert_eq!(tables.lookup(Locale::En, "nav.home"), Some("Home"));
        assert_eq!(tables.lookup(Locale::En, "no.such.key"), None);
    }

    #[tokio::test]
    async fn test_defaults_to_spanish() {
        let translator = Translator::load(MemoryStorage::new(), LocaleTables::embedded().unwrap()).await;
        assert_eq!(translator.current(), Locale::Es);
        assert_eq!(translator.document_lang(), "es");
        assert_eq!(
            translator.toggle_button(),
            LanguageToggle {
                label: "ES".to_string(),
                pressed: false
            }
        );
    }

    #[tokio::test]
    async fn test_toggle_rewrites_known_keys_only() {
        let storage = MemoryStorage::new();
        let tables = LocaleTables::embedded().unwrap();
        let mut translator = Translator::load(storage.clone(), tables.clone()).await;
        let mut nodes = page();

        let locale = translator.toggle(&mut nodes).await;
        assert_eq!(locale, Locale::En);
        assert_eq!(nodes[0].text, tables.lookup(Locale::En, "nav.home").unwrap());
        assert_eq!(nodes[1].text, tables.lookup(Locale::En, "hero.title").unwrap());
        assert_eq!(nodes[2].text, "sin traducir");
        assert_eq!(storage.read(LANGUAGE_KEY).await.unwrap().as_deref(), Some("en"));
        assert!(translator.toggle_button().pressed);

        translator.toggle(&mut nodes).await;
        assert_eq!(nodes[0].text, "Inicio");
        assert_eq!(nodes[2].text, "sin traducir");
    }

    #[tokio::test]
    async fn test_stored_preference_is_used() {
        let storage = MemoryStorage::new();
        storage.write(LANGUAGE_KEY, "en").await.unwrap();

        let translator = Translator::load(storage, LocaleTables::embedded().unwrap()).await;
        assert_eq!(translator.current(), Locale::En);
        assert_eq!(translator.translate("nav.contact"), Some("Contact"));
    }

    #[tokio::test]
    async fn test_garbage_preference_falls_back() {
        let storage = MemoryStorage::new();
        storage.write(LANGUAGE_KEY, "klingon").await.unwrap();

        let translator = Translator::load(storage, LocaleTables::embedded().unwrap()).await;
        assert_eq!(translator.current(), Locale::Es);
    }

    #[tokio::test]
    async fn test_key_missing_in_target_locale_keeps_text() {
        let tables = LocaleTables::from_toml_strs(
            "[strings]\n\"a\" = \"uno\"\n\"b\" = \"dos\"\n",
            "[strings]\n\"a\" = \"one\"\n",
        )
        .unwrap();
        let mut translator = Translator::load(MemoryStorage::new(), tables).await;
        let mut nodes = vec![TaggedText::new("a", "uno"), TaggedText::new("b", "dos")];

        let updated = translator.change(Locale::En, &mut nodes).await;
        assert_eq!(updated, 1);
        assert_eq!(nodes[0].text, "one");
        assert_eq!(nodes[1].text, "dos");
    }
}
