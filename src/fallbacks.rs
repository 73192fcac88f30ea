use std::collections::HashMap;

/// Key of the chain used when no locale-specific chain is configured.
pub const DEFAULT_FALLBACK_KEY: &str = "default";

/// The ordered list of locale keys a message lookup for `locale` visits.
///
/// The chain starts with `locale` itself and its bare language (`zh-SG` then
/// `zh`), followed by the configured chain of the first of those two that has
/// one, or the `default` chain. Each locale appears once.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use trellis_i18n::fallbacks::resolve_fallback_chain;
///
/// let mut fallbacks = HashMap::new();
/// fallbacks.insert("zh".to_string(), vec!["zh-CN".to_string(), "en".to_string()]);
/// fallbacks.insert("default".to_string(), vec!["en".to_string()]);
///
/// assert_eq!(
///     resolve_fallback_chain("zh-TW", &fallbacks),
///     vec!["zh-TW", "zh", "zh-CN", "en"]
/// );
/// assert_eq!(resolve_fallback_chain("de-AT", &fallbacks), vec!["de-AT", "de", "en"]);
/// ```
pub fn resolve_fallback_chain(locale: &str, fallbacks: &HashMap<String, Vec<String>>) -> Vec<String> {
    let mut chain = vec![locale.to_string()];

    let language = language_part(locale);
    if !language.is_empty() && language != locale {
        chain.push(language.to_string());
    }

    let configured = fallbacks
        .get(locale)
        .or_else(|| fallbacks.get(language))
        .or_else(|| fallbacks.get(DEFAULT_FALLBACK_KEY));

    for fallback in configured.into_iter().flatten() {
        if !chain.contains(fallback) {
            chain.push(fallback.clone());
        }
    }

    chain
}

fn language_part(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}
