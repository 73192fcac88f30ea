use crate::LocalizedMessages;
use crate::error::{I18nError, I18nResult};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Files ending with this stem suffix are translation templates, not locales.
const TEMPLATE_SUFFIX: &str = "-tpl";

/// Parse a JSON message bundle.
///
/// The bundle is an object whose string values are messages. Nested objects
/// are flattened into dotted keys, keys starting with `@` are skipped:
/// ```json
/// {
///     "@metadata": { ... },
///     "greeting": "Hello, {{name}}!",
///     "home": { "title": "Welcome to <b>{{APP_NAME}}</b>" }
/// }
/// ```
/// yields the keys `greeting` and `home.title`.
pub fn parse_messages(json: &str) -> I18nResult<LocalizedMessages> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| I18nError::Load(format!("Failed to parse JSON: {}", e)))?;

    let obj = value
        .as_object()
        .ok_or_else(|| I18nError::Load("Invalid JSON: root must be an object".to_string()))?;

    let mut messages = LocalizedMessages::new();
    flatten_into(&mut messages, None, obj);
    Ok(messages)
}

fn flatten_into(messages: &mut LocalizedMessages, prefix: Option<&str>, obj: &Map<String, Value>) {
    for (key, value) in obj {
        // Skip metadata
        if key.starts_with('@') {
            continue;
        }

        let full_key = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };

        match value {
            Value::String(message) => {
                messages.with_message(&full_key, message);
            }
            Value::Object(nested) => flatten_into(messages, Some(&full_key), nested),
            _ => warn!(key = %full_key, "message is not a string, skipping"),
        }
    }
}

/// Load messages from a single JSON file
///
/// # Errors
/// - File not found
/// - Invalid JSON
/// - File read errors
pub fn load_messages_from_file(path: &Path) -> I18nResult<LocalizedMessages> {
    let content = fs::read_to_string(path)
        .map_err(|e| I18nError::Load(format!("Failed to read file '{}': {}", path.display(), e)))?;

    parse_messages(&content).map_err(|e| match e {
        I18nError::Load(msg) => I18nError::Load(format!("{} ('{}')", msg, path.display())),
        other => other,
    })
}

/// Load all messages from a directory of JSON files
///
/// Every `*.json` file is loaded except templates (`*-tpl.json`). The
/// filename without extension is the locale key: `en.json` -> `"en"`,
/// `zh-CN.json` -> `"zh-CN"`. Bundles are returned sorted by locale key.
///
/// # Errors
/// - Directory not found
/// - File read/parse errors
pub fn load_all_messages_from_dir(dir: &Path) -> I18nResult<Vec<(String, LocalizedMessages)>> {
    if !dir.is_dir() {
        return Err(I18nError::Load(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    let entries = fs::read_dir(dir)
        .map_err(|e| I18nError::Load(format!("Failed to read directory '{}': {}", dir.display(), e)))?;

    let mut bundles = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| I18nError::Load(format!("Error reading directory entry: {}", e)))?;
        let path = entry.path();

        // Only process JSON files
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }

        let locale = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| I18nError::Load(format!("Invalid filename: {}", path.display())))?
            .to_string();

        if locale.ends_with(TEMPLATE_SUFFIX) {
            debug!(path = %path.display(), "skipping translation template");
            continue;
        }

        let messages = load_messages_from_file(&path)?;
        bundles.push((locale, messages));
    }

    if bundles.is_empty() {
        warn!(dir = %dir.display(), "no message bundles found");
    }

    bundles.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(bundles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "trellis-i18n-loader-{}-{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_flattens_nested_keys() {
        let messages = parse_messages(
            r#"{
                "@metadata": { "authors": ["someone"] },
                "greeting": "Hello, {{name}}!",
                "home": { "title": "Welcome", "nav": { "back": "Back" } },
                "count": 3
            }"#,
        )
        .unwrap();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages.get("greeting"), "Hello, {{name}}!");
        assert_eq!(messages.get("home.title"), "Welcome");
        assert_eq!(messages.get("home.nav.back"), "Back");
        assert!(messages.get_message("count").is_none());
        assert!(messages.get_message("@metadata").is_none());
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(matches!(parse_messages("[1, 2]"), Err(I18nError::Load(_))));
        assert!(matches!(parse_messages("{ nope"), Err(I18nError::Load(_))));
    }

    #[test]
    fn test_load_dir_skips_templates_and_sorts() {
        let dir = fixture_dir("sorted");
        fs::write(dir.join("zh-CN.json"), r#"{ "hello": "你好" }"#).unwrap();
        fs::write(dir.join("en.json"), r#"{ "hello": "Hello" }"#).unwrap();
        fs::write(dir.join("en-tpl.json"), r#"{ "hello": "" }"#).unwrap();
        fs::write(dir.join("notes.txt"), "not a bundle").unwrap();

        let bundles = load_all_messages_from_dir(&dir).unwrap();
        let locales: Vec<&str> = bundles.iter().map(|(locale, _)| locale.as_str()).collect();
        assert_eq!(locales, vec!["en", "zh-CN"]);
        assert_eq!(bundles[1].1.get("hello"), "你好");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_dir_reports_bad_file() {
        let dir = fixture_dir("broken");
        fs::write(dir.join("en.json"), "{ broken").unwrap();

        let err = load_all_messages_from_dir(&dir).unwrap_err();
        assert!(err.to_string().contains("en.json"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_dir() {
        assert!(load_all_messages_from_dir(Path::new("/nonexistent/locales")).is_err());
        assert!(load_messages_from_file(Path::new("/nonexistent/en.json")).is_err());
    }
}
