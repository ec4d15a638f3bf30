use anyhow::Result;
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

/// Fluent sources compiled into the binary, keyed by language code.
const LOCALE_SOURCES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en/main.ftl")),
    ("fr", include_str!("../locales/fr/main.ftl")),
];

/// Language used when a requested one is not available.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Localization manager for user-facing prompts and status messages
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl std::fmt::Debug for LocalizationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut languages: Vec<&String> = self.bundles.keys().collect();
        languages.sort();
        f.debug_struct("LocalizationManager")
            .field("languages", &languages)
            .finish()
    }
}

impl LocalizationManager {
    /// Create a new localization manager with every bundled locale
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for (locale_str, source) in LOCALE_SOURCES {
            let locale: LanguageIdentifier = locale_str.parse()?;
            let bundle = Self::create_bundle(&locale, source)?;
            bundles.insert(locale_str.to_string(), bundle);
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(
        locale: &LanguageIdentifier,
        source: &str,
    ) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        // Messages end up in plain-text prompts and logs, not bidi-aware views
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            anyhow::anyhow!("Invalid Fluent resource for {}: {:?}", locale, errors)
        })?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow::anyhow!("Duplicate messages for {}: {:?}", locale, errors))?;

        Ok(bundle)
    }

    /// Get a localized message in a specific language
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let bundle = match self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(FALLBACK_LANGUAGE))
        {
            Some(bundle) => bundle,
            None => return format!("Missing translation: {}", key),
        };

        let msg = match bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let mut value = String::new();
        let mut errors = vec![];

        let fluent_args = args.map(|args| {
            FluentArgs::from_iter(args.iter().map(|(k, v)| (*k, FluentValue::from(*v))))
        });

        if bundle
            .write_pattern(&mut value, pattern, fluent_args.as_ref(), &mut errors)
            .is_err()
            || !errors.is_empty()
        {
            tracing::debug!(key = %key, language = %language, errors = ?errors, "Message formatted with errors");
        }

        value
    }

    /// Get a localized message with arguments in a specific language
    pub fn get_message_with_args_in_language(
        &self,
        key: &str,
        language: &str,
        args: &[(&str, &str)],
    ) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message_in_language(key, language, Some(&args_map))
    }

    /// Check if a language is supported
    pub fn is_language_supported(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }

    /// Resolve a platform language tag ("fr-CA", "en_US", "de") to a supported language
    pub fn detect_language(&self, language_code: Option<&str>) -> String {
        if let Some(code) = language_code {
            let lang = code
                .split(['-', '_'])
                .next()
                .unwrap_or(FALLBACK_LANGUAGE)
                .to_lowercase();

            if self.is_language_supported(&lang) {
                return lang;
            }
        }

        FALLBACK_LANGUAGE.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language() {
        let manager = LocalizationManager::new().unwrap();
        assert_eq!(manager.detect_language(Some("fr-CA")), "fr");
        assert_eq!(manager.detect_language(Some("en_US")), "en");
        assert_eq!(manager.detect_language(Some("de")), "en");
        assert_eq!(manager.detect_language(None), "en");
    }
}
