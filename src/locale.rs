//! Best-match locale negotiation.
//!
//! A requested tag is matched against the locales an application ships by
//! comparing their maximal expansions (`zh` becomes `zh-Hans-CN`, `en-GB`
//! becomes `en-Latn-GB`). An exact language, script and region match wins
//! outright; otherwise the first candidate sharing the script, then the first
//! sharing only the language, is used.

use icu_locale::{Locale, LocaleExpander};
use tracing::{debug, warn};

use crate::error::{I18nError, I18nResult};

/// The maximal expansion of a locale tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedLocale {
    pub language: String,
    pub script: Option<String>,
    pub region: Option<String>,
}

impl std::fmt::Display for ExpandedLocale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.language)?;
        if let Some(script) = &self.script {
            write!(f, "-{}", script)?;
        }
        if let Some(region) = &self.region {
            write!(f, "-{}", region)?;
        }
        Ok(())
    }
}

/// Expand `tag` to its maximal form, adding the likely script and region.
///
/// # Example
///
/// ```
/// use trellis_i18n::locale::expand_locale;
///
/// let expanded = expand_locale("zh-TW").unwrap();
/// assert_eq!(expanded.to_string(), "zh-Hant-TW");
/// ```
///
/// # Errors
/// Returns `I18nError::LocaleExpansion` if `tag` is not a well-formed locale.
pub fn expand_locale(tag: &str) -> I18nResult<ExpandedLocale> {
    expand_with(&LocaleExpander::new_extended(), tag)
}

fn expand_with(expander: &LocaleExpander, tag: &str) -> I18nResult<ExpandedLocale> {
    let mut locale: Locale = tag.parse().map_err(|e| {
        I18nError::LocaleExpansion(format!("Failed to parse locale '{}': {}", tag, e))
    })?;
    expander.maximize(&mut locale.id);

    Ok(ExpandedLocale {
        language: locale.id.language.to_string(),
        script: locale.id.script.map(|script| script.to_string()),
        region: locale.id.region.map(|region| region.to_string()),
    })
}

/// Pick the entry of `supported` that best serves `requested`.
///
/// Returns the supported tag verbatim. Ties go to the earliest entry. When
/// `requested` is malformed, or no supported locale shares its language,
/// `fallback` is returned.
///
/// # Example
///
/// ```
/// use trellis_i18n::locale::resolve_language;
///
/// let supported = ["en", "zh-TW", "zh-CN"];
/// assert_eq!(resolve_language("zh", &supported, "en"), "zh-CN");
/// assert_eq!(resolve_language("zh-HK", &supported, "en"), "zh-TW");
/// assert_eq!(resolve_language("ja", &supported, "en"), "en");
/// ```
pub fn resolve_language<S: AsRef<str>>(requested: &str, supported: &[S], fallback: &str) -> String {
    let expander = LocaleExpander::new_extended();

    let wanted = match expand_with(&expander, requested) {
        Ok(expanded) => expanded,
        Err(e) => {
            debug!(requested, fallback, error = %e, "using fallback language");
            return fallback.to_string();
        }
    };

    let mut script_match: Option<&str> = None;
    let mut language_match: Option<&str> = None;

    for candidate in supported {
        let candidate = candidate.as_ref();
        let expanded = match expand_with(&expander, candidate) {
            Ok(expanded) => expanded,
            Err(e) => {
                warn!(candidate, error = %e, "skipping unparsable supported locale");
                continue;
            }
        };

        if expanded.language != wanted.language {
            continue;
        }

        let is_script_match = expanded.script == wanted.script;
        let is_region_match = expanded.region == wanted.region;

        if is_script_match && is_region_match {
            return candidate.to_string();
        }

        if is_script_match && script_match.is_none() {
            script_match = Some(candidate);
        }

        if language_match.is_none() {
            language_match = Some(candidate);
        }
    }

    script_match
        .or(language_match)
        .unwrap_or(fallback)
        .to_string()
}
