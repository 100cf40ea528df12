use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::warn;
use unic_langid::LanguageIdentifier;

use anyhow::{anyhow, Result};

use crate::config::DEFAULT_LANGUAGE;

/// Languages with a bundled message file
pub const SUPPORTED_LANGUAGES: &[&str] = &["ru", "en"];

fn resource_source(language: &str) -> Option<&'static str> {
    match language {
        "ru" => Some(include_str!("../locales/ru/main.ftl")),
        "en" => Some(include_str!("../locales/en/main.ftl")),
        _ => None,
    }
}

/// Localization manager for the bot
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
    default_language: String,
}

impl LocalizationManager {
    /// Create a manager with all supported languages loaded
    ///
    /// Unsupported `default_language` values fall back to Russian.
    pub fn new(default_language: &str) -> Self {
        let bundles = SUPPORTED_LANGUAGES
            .iter()
            .map(|lang| (lang.to_string(), Self::create_bundle(lang)))
            .collect();

        let default_language = if SUPPORTED_LANGUAGES.contains(&default_language) {
            default_language.to_string()
        } else {
            DEFAULT_LANGUAGE.to_string()
        };

        Self {
            bundles,
            default_language,
        }
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(language: &str) -> FluentBundle<FluentResource> {
        let locale: LanguageIdentifier = language.parse().unwrap_or_default();
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Unicode isolation marks would end up inside links and coordinates
        bundle.set_use_isolating(false);

        if let Some(source) = resource_source(language) {
            let resource = match FluentResource::try_new(source.to_string()) {
                Ok(resource) => resource,
                Err((resource, errors)) => {
                    warn!(language, errors = ?errors, "Fluent resource has syntax errors");
                    resource
                }
            };
            if let Err(errors) = bundle.add_resource(resource) {
                warn!(language, errors = ?errors, "Duplicate fluent messages");
            }
        }

        bundle
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Map a Telegram language code such as `en-US` to a loaded bundle
    pub fn resolve_language(&self, language_code: Option<&str>) -> &str {
        language_code
            .and_then(|code| code.split(['-', '_']).next())
            .map(|primary| primary.to_ascii_lowercase())
            .and_then(|primary| {
                self.bundles
                    .get_key_value(primary.as_str())
                    .map(|(key, _)| key.as_str())
            })
            .unwrap_or(self.default_language.as_str())
    }

    /// Get a localized message in the given language, falling back to the default one
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let language = self.resolve_language(Some(language));
        let found = [language, self.default_language.as_str()]
            .into_iter()
            .filter_map(|lang| self.bundles.get(lang))
            .find_map(|bundle| bundle.get_message(key).map(|msg| (bundle, msg)));

        let (bundle, msg) = match found {
            Some(found) => found,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {key}"),
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, FluentValue::from(*value));
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            warn!(key, errors = ?errors, "Failed to format message");
        }
        value.into_owned()
    }
}

/// Global localization instance
static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();

/// Initialize the global localization manager
pub fn init_localization(default_language: &str) -> Result<()> {
    if !SUPPORTED_LANGUAGES.contains(&default_language) {
        return Err(anyhow!(
            "Unsupported default language {default_language:?}, expected one of {SUPPORTED_LANGUAGES:?}"
        ));
    }
    LOCALIZATION_MANAGER
        .set(LocalizationManager::new(default_language))
        .map_err(|_| anyhow!("Localization manager already initialized"))
}

/// Get the global localization manager, creating a Russian default if it was never initialized
pub fn get_localization_manager() -> &'static LocalizationManager {
    LOCALIZATION_MANAGER.get_or_init(|| LocalizationManager::new(DEFAULT_LANGUAGE))
}

/// Convenience function to get a localized message for a user's language
pub fn t_lang(key: &str, language_code: Option<&str>) -> String {
    let manager = get_localization_manager();
    let language = manager.resolve_language(language_code);
    manager.get_message_in_language(key, language, None)
}

/// Convenience function to get a localized message with arguments
pub fn t_args_lang(key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
    let manager = get_localization_manager();
    let language = manager.resolve_language(language_code);
    let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
    manager.get_message_in_language(key, language, Some(&args_map))
}
