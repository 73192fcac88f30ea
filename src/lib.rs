use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, info};

pub mod ast;
pub mod config;
pub mod error;
pub mod fallbacks;
pub mod html;
pub mod intl;
pub mod loader;
pub mod locale;
pub mod parser;
pub mod plural;
pub mod render;

#[cfg(test)]
mod integration_tests;

// Re-export the types most callers need
pub use ast::{AstNode, AstNodeList, Tag, Variable};
pub use config::I18nConfig;
pub use error::{I18nError, I18nResult};
pub use html::{Element, HtmlNode, HtmlRuntime};
pub use locale::{ExpandedLocale, expand_locale};
pub use parser::Parser;
pub use render::{NodeRuntime, Rendered, Substitution, SubstitutionTable, interpolate};

/// Scalar name used to pick a plural variant of a message.
pub const COUNT_VARIABLE: &str = "count";

static SCALAR_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("valid scalar placeholder pattern"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedMessages(pub HashMap<String, String>);

impl LocalizedMessages {
    pub fn new() -> Self {
        LocalizedMessages(HashMap::new())
    }
    pub fn with_message(&mut self, key: &str, message: &str) -> &mut Self {
        self.0.insert(key.to_owned(), message.to_owned());
        self
    }
    pub fn get_message(&self, key: &str) -> Option<&String> {
        self.0.get(key)
    }
    pub fn get_messages(&self) -> &HashMap<String, String> {
        &self.0
    }
    /// The message for `key`, or the key itself.
    pub fn get(&self, key: &str) -> String {
        self.0.get(key).unwrap_or(&key.to_string()).to_string()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Adds every message of `other`, replacing existing keys.
    pub fn extend(&mut self, other: LocalizedMessages) -> &mut Self {
        self.0.extend(other.0);
        self
    }
}

/// Outcome of [`I18n::change_language`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageChange {
    /// The resolved locale is already active.
    Unchanged,
    /// The active language is now the given locale.
    Changed(String),
    /// The given locale was resolved but has no bundle yet. Register one
    /// with [`I18n::add_resource_bundle`] and call again.
    BundleRequired(String),
}

pub struct I18n {
    // Keyed by locale and then by message key
    // e.g. messages["en"]["greeting"] = "Hello, {{name}}!"
    //      messages["zh-CN"]["greeting"] = "你好，{{name}}！"
    messages: HashMap<String, LocalizedMessages>,
    // Locales in the order their bundles were registered
    registered: Vec<String>,
    language: String,
    config: I18nConfig,
}

impl Default for I18n {
    fn default() -> Self {
        I18n::new()
    }
}

impl I18n {
    pub fn new() -> Self {
        let config = I18nConfig::default();
        I18n {
            messages: HashMap::new(),
            registered: Vec::new(),
            language: config.language.clone(),
            config,
        }
    }

    /// Replaces the configuration and makes its `language` active.
    pub fn with_config(&mut self, config: I18nConfig) -> &mut Self {
        self.language = config.language.clone();
        self.config = config;
        self
    }

    pub fn config(&self) -> &I18nConfig {
        &self.config
    }

    /// The active language.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn with_messages_for_locale(
        &mut self,
        locale: &str,
        messages: LocalizedMessages,
    ) -> &mut Self {
        debug!(locale, count = messages.len(), "registering message bundle");
        if !self.registered.iter().any(|registered| registered == locale) {
            self.registered.push(locale.to_string());
        }
        self.messages.insert(locale.to_string(), messages);
        self
    }

    /// Adds `messages` to the bundle of `locale`, creating it if needed.
    pub fn add_resource_bundle(&mut self, locale: &str, messages: LocalizedMessages) -> &mut Self {
        match self.messages.get_mut(locale) {
            Some(bundle) => {
                bundle.extend(messages);
                self
            }
            None => self.with_messages_for_locale(locale, messages),
        }
    }

    /// Registers every bundle of a locale directory, see
    /// [`loader::load_all_messages_from_dir`].
    pub fn with_messages_from_dir(&mut self, dir: &Path) -> I18nResult<&mut Self> {
        for (locale, messages) in loader::load_all_messages_from_dir(dir)? {
            self.add_resource_bundle(&locale, messages);
        }
        Ok(self)
    }

    pub fn has_resource_bundle(&self, locale: &str) -> bool {
        self.messages.contains_key(locale)
    }

    /// The configured supported languages, or the registered locales when
    /// none are configured.
    pub fn supported_locales(&self) -> &[String] {
        if self.config.supported_languages.is_empty() {
            &self.registered
        } else {
            &self.config.supported_languages
        }
    }

    /// The supported locale that best matches `requested`.
    pub fn resolve_language(&self, requested: &str) -> String {
        locale::resolve_language(
            requested,
            self.supported_locales(),
            self.config.fallback_language(),
        )
    }

    pub fn change_language(&mut self, requested: &str) -> LanguageChange {
        let resolved = self.resolve_language(requested);
        if resolved == self.language {
            return LanguageChange::Unchanged;
        }
        if !self.has_resource_bundle(&resolved) {
            debug!(requested, resolved = %resolved, "no bundle loaded for resolved language");
            return LanguageChange::BundleRequired(resolved);
        }
        info!(from = %self.language, to = %resolved, "changing language");
        self.language = resolved.clone();
        LanguageChange::Changed(resolved)
    }

    /// The raw message for `key` in `locale`, following the fallback chain.
    /// Returns the key itself when no locale has it.
    pub fn get_message(&self, locale: &str, key: &str) -> String {
        self.lookup(locale, key, None)
            .unwrap_or_else(|| key.to_string())
    }

    /// The message for `key` in `locale` with scalar placeholders replaced.
    ///
    /// A `count` scalar holding an integer selects the plural variant
    /// `{key}_{category}` when one exists.
    pub fn localize(&self, locale: &str, key: &str, scalars: &[(&str, &str)]) -> String {
        let message = self.plural_message(locale, key, scalars);
        self.substitute_scalars(&message, scalars)
    }

    /// [`I18n::localize`] in the active language.
    pub fn translate(&self, key: &str, scalars: &[(&str, &str)]) -> String {
        self.localize(&self.language, key, scalars)
    }

    /// Translates `key` in the active language and renders it against
    /// `table`. `Value` entries of the table are substituted as scalars,
    /// node and factory entries fill the remaining placeholders.
    ///
    /// Scalars are inserted into the parsed message, so placeholder syntax
    /// inside a value stays literal text.
    pub fn t<R: NodeRuntime>(
        &self,
        runtime: &R,
        key: &str,
        table: &SubstitutionTable<'_, R::Node>,
    ) -> Rendered<R::Node> {
        let scalars: Vec<(&str, &str)> = table.scalars().collect();
        let message = self.plural_message(&self.language, key, &scalars);
        let ast = self.substitute_ast(Parser::new(&message).parse(), &scalars);
        render::render_ast(runtime, &ast, table)
    }

    fn plural_message(&self, locale: &str, key: &str, scalars: &[(&str, &str)]) -> String {
        let count = scalars
            .iter()
            .find(|(name, _)| *name == COUNT_VARIABLE)
            .and_then(|(_, value)| value.trim().parse::<i64>().ok());

        self.lookup(locale, key, count)
            .unwrap_or_else(|| key.to_string())
    }

    fn lookup(&self, locale: &str, key: &str, count: Option<i64>) -> Option<String> {
        let chain = fallbacks::resolve_fallback_chain(locale, &self.config.fallback_languages);

        for candidate in &chain {
            let Some(bundle) = self.messages.get(candidate) else {
                continue;
            };

            let plural = count.and_then(|count| plural::plural_key(candidate, key, count));
            let found = plural
                .as_deref()
                .and_then(|plural_key| bundle.get_message(plural_key))
                .or_else(|| bundle.get_message(key));

            if let Some(message) = found {
                if candidate != locale {
                    debug!(key, locale, fallback = %candidate, "message found in fallback locale");
                }
                return Some(message.clone());
            }
        }

        debug!(key, locale, "missing message key");
        None
    }

    // Caller scalars win over the configured default variables.
    fn scalar(&self, name: &str, scalars: &[(&str, &str)]) -> Option<String> {
        scalars
            .iter()
            .find(|(scalar, _)| *scalar == name)
            .map(|(_, value)| value.to_string())
            .or_else(|| self.config.default_variables.get(name).cloned())
    }

    fn substitute_scalars(&self, message: &str, scalars: &[(&str, &str)]) -> String {
        SCALAR_PLACEHOLDER
            .replace_all(message, |caps: &Captures| {
                self.scalar(caps[1].trim(), scalars)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    fn substitute_ast(&self, ast: AstNodeList, scalars: &[(&str, &str)]) -> AstNodeList {
        let mut substituted = AstNodeList::new();
        for node in ast {
            match node {
                // `{{ name }}` with inner spaces is not a variable node
                AstNode::Text(text) => substituted.push_text(&self.substitute_scalars(&text, scalars)),
                AstNode::Variable(variable) => match self.scalar(&variable.name, scalars) {
                    Some(value) => substituted.push_text(&value),
                    None => substituted.push(AstNode::Variable(variable)),
                },
                AstNode::Tag(tag) => substituted.push(AstNode::Tag(Tag {
                    children: self.substitute_ast(tag.children, scalars),
                    ..tag
                })),
            }
        }
        substituted
    }
}
