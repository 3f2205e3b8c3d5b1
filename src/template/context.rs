//! Placeholder values available to templates.

use std::collections::BTreeMap;

use crate::config::ResolvedConfig;
use crate::error::TemplateError;

/// Language codes with a development-guideline string.
pub const SUPPORTED_LANGS: [&str; 12] = [
    "en", "ja", "zh-TW", "zh", "es", "pt", "de", "fr", "ru", "it", "ko", "ar",
];

/// Fixed guidance line injected as `DEV_GUIDELINES` for `lang`.
#[must_use]
pub fn guidelines(lang: &str) -> Option<&'static str> {
    let text = match lang {
        "en" => "- Think in English, generate responses in English",
        "ja" => {
            "- Think in English, but generate responses in Japanese (思考は英語、回答の生成は日本語で行うように)"
        }
        "zh-TW" => {
            "- 以英文思考，但以繁體中文生成回應（Think in English, generate in Traditional Chinese）"
        }
        "zh" => {
            "- 以英文思考，但以简体中文生成回复（Think in English, generate in Simplified Chinese）"
        }
        "es" => {
            "- Think in English, generate responses in Spanish (Piensa en inglés, genera respuestas en español)"
        }
        "pt" => {
            "- Think in English, generate responses in Portuguese (Pense em inglês, gere respostas em português)"
        }
        "de" => {
            "- Think in English, generate responses in German (Denke auf Englisch, formuliere Antworten auf Deutsch)"
        }
        "fr" => {
            "- Think in English, generate responses in French (Pensez en anglais, générez des réponses en français)"
        }
        "ru" => {
            "- Think in English, generate responses in Russian (Думай по-английски, отвечай по-русски)"
        }
        "it" => {
            "- Think in English, generate responses in Italian (Pensa in inglese, genera risposte in italiano)"
        }
        "ko" => {
            "- Think in English, generate responses in Korean (영어로 사고하고, 한국어로 응답을 생성하세요)"
        }
        "ar" => "- Think in English, generate responses in Arabic (فكر بالإنجليزية وأجب بالعربية)",
        _ => return None,
    };
    Some(text)
}

/// Placeholder values available to templates.
///
/// Keys are stable and ordered, so iteration and debug output are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: BTreeMap<String, String>,
}

impl TemplateContext {
    /// Derive the context for a resolved configuration.
    ///
    /// Provides `AGENT`, `LANG_CODE`, `DEV_GUIDELINES`, `KIRO_DIR`,
    /// `AGENT_DIR`, `AGENT_DOC` and `AGENT_COMMANDS_DIR`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnsupportedLanguage`] if `config.lang` has no
    /// guidance string.
    pub fn build(config: &ResolvedConfig) -> Result<Self, TemplateError> {
        let guidance = guidelines(&config.lang)
            .ok_or_else(|| TemplateError::UnsupportedLanguage(config.lang.clone()))?;

        Ok(Self::from_pairs([
            ("AGENT", config.agent.id()),
            ("LANG_CODE", config.lang.as_str()),
            ("DEV_GUIDELINES", guidance),
            ("KIRO_DIR", config.kiro_dir.as_str()),
            ("AGENT_DIR", config.layout.agent_dir.as_str()),
            ("AGENT_DOC", config.layout.doc_file.as_str()),
            ("AGENT_COMMANDS_DIR", config.layout.commands_dir.as_str()),
        ]))
    }

    /// Build a context from explicit key/value pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value for `key`, if defined.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Iterate over all keys and values in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
