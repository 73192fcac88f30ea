use icu_locale::Locale;
use icu_plurals::{PluralCategory, PluralRuleType, PluralRules};

use crate::error::{I18nError, I18nResult};

/// The cardinal plural category of `count` in `locale`.
///
/// # Errors
/// Returns an error if the locale is invalid or plural rules cannot be loaded.
pub fn plural_category(locale_str: &str, count: i64) -> I18nResult<PluralCategory> {
    let locale: Locale = locale_str.parse().map_err(|e| {
        I18nError::LocaleExpansion(format!("Failed to parse locale '{}': {}", locale_str, e))
    })?;

    let rules = PluralRules::try_new(locale.into(), PluralRuleType::Cardinal.into()).map_err(|e| {
        I18nError::LocaleExpansion(format!(
            "Failed to create PluralRules for locale '{}': {}",
            locale_str, e
        ))
    })?;

    Ok(rules.category_for(count))
}

/// The message key suffix for a plural category: `greeting` with `One`
/// becomes `greeting_one`.
pub fn category_suffix(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        _ => "other",
    }
}

/// `{key}_{category}` for `count` in `locale`, or `None` when no plural
/// rules are available.
pub fn plural_key(locale: &str, key: &str, count: i64) -> Option<String> {
    plural_category(locale, count)
        .ok()
        .map(|category| format!("{}_{}", key, category_suffix(category)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_categories() {
        assert_eq!(plural_category("en", 1).unwrap(), PluralCategory::One);
        assert_eq!(plural_category("en", 0).unwrap(), PluralCategory::Other);
        assert_eq!(plural_category("en", 5).unwrap(), PluralCategory::Other);
    }

    #[test]
    fn test_russian_categories() {
        assert_eq!(plural_category("ru", 1).unwrap(), PluralCategory::One);
        assert_eq!(plural_category("ru", 3).unwrap(), PluralCategory::Few);
        assert_eq!(plural_category("ru", 5).unwrap(), PluralCategory::Many);
        assert_eq!(plural_category("ru", 21).unwrap(), PluralCategory::One);
    }

    #[test]
    fn test_chinese_has_only_other() {
        assert_eq!(plural_category("zh-CN", 1).unwrap(), PluralCategory::Other);
    }

    #[test]
    fn test_plural_key() {
        assert_eq!(plural_key("en", "apples", 1).as_deref(), Some("apples_one"));
        assert_eq!(plural_key("en", "apples", 2).as_deref(), Some("apples_other"));
        assert_eq!(plural_key("ar", "apples", 0).as_deref(), Some("apples_zero"));
        assert_eq!(plural_key("not a locale", "apples", 2), None);
    }
}
