use std::fs;
use std::path::{Path, PathBuf};

use crate::html::{Element, HtmlNode, HtmlRuntime};
use crate::render::{Rendered, SubstitutionTable};
use crate::{I18n, I18nConfig, LanguageChange, LocalizedMessages};

fn locale_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "trellis-i18n-integration-{}-{}",
        std::process::id(),
        name
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();

    fs::write(
        dir.join("en.json"),
        r#"{
            "@metadata": { "authors": [] },
            "welcome": "Welcome to <b>{{APP_NAME}}</b>, {{name}}!",
            "inbox": {
                "unread_one": "You have {{count}} unread <link>message</link>",
                "unread_other": "You have {{count}} unread <link>messages</link>"
            },
            "avatar": "{{avatar}} {{name}}",
            "terms": "I accept the <terms>terms of service</terms>{{br}}and nothing else"
        }"#,
    )
    .unwrap();
    fs::write(
        dir.join("zh-CN.json"),
        r#"{
            "welcome": "欢迎来到<b>{{APP_NAME}}</b>，{{name}}！",
            "inbox": { "unread": "您有 {{count}} 条未读<link>消息</link>" }
        }"#,
    )
    .unwrap();
    fs::write(dir.join("en-tpl.json"), r#"{ "welcome": "" }"#).unwrap();

    dir
}

fn app(dir: &Path) -> I18n {
    let mut config = I18nConfig::default();
    config
        .default_variables
        .insert("APP_NAME".to_string(), "Trellis".to_string());

    let mut i18n = I18n::new();
    i18n.with_config(config).with_messages_from_dir(dir).unwrap();
    i18n
}

fn html(rendered: Rendered<HtmlNode>) -> String {
    HtmlNode::from(rendered).to_string()
}

#[test]
fn test_render_with_default_variables_and_factory() {
    let dir = locale_dir("welcome");
    let i18n = app(&dir);

    let mut table: SubstitutionTable<HtmlNode> = SubstitutionTable::new();
    table
        .with_value("name", "Ada")
        .with_factory("b", |children| {
            Element::new("strong").with_child(children.into()).into()
        });

    assert_eq!(
        html(i18n.t(&HtmlRuntime, "welcome", &table)),
        "Welcome to <strong>Trellis</strong>, Ada!"
    );
    assert_eq!(i18n.supported_locales(), ["en", "zh-CN"]);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_render_plural_with_element_node() {
    let dir = locale_dir("plural");
    let i18n = app(&dir);

    let mut table: SubstitutionTable<HtmlNode> = SubstitutionTable::new();
    table
        .with_value("count", 1)
        .with_node("link", Element::new("a").with_attribute("href", "/inbox").into());
    assert_eq!(
        html(i18n.t(&HtmlRuntime, "inbox.unread", &table)),
        "You have 1 unread <a href=\"/inbox\">message</a>"
    );

    table.with_value("count", 4);
    assert_eq!(
        html(i18n.t(&HtmlRuntime, "inbox.unread", &table)),
        "You have 4 unread <a href=\"/inbox\">messages</a>"
    );

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_change_language_then_render() {
    let dir = locale_dir("change");
    let mut i18n = app(&dir);

    assert_eq!(
        i18n.change_language("zh-SG"),
        LanguageChange::Changed("zh-CN".to_string())
    );

    let mut table: SubstitutionTable<HtmlNode> = SubstitutionTable::new();
    table
        .with_value("name", "Ada")
        .with_value("count", 3)
        .with_node("b", Element::new("b").into())
        .with_node("link", Element::new("a").with_attribute("href", "/inbox").into());

    assert_eq!(
        html(i18n.t(&HtmlRuntime, "welcome", &table)),
        "欢迎来到<b>Trellis</b>，Ada！"
    );
    // Chinese has no plural variants, the base key is used.
    assert_eq!(
        html(i18n.t(&HtmlRuntime, "inbox.unread", &table)),
        "您有 3 条未读<a href=\"/inbox\">消息</a>"
    );
    // Missing in zh-CN, found in en.
    assert_eq!(
        html(i18n.t(&HtmlRuntime, "terms", &table)),
        "I accept the terms of service{{br}}and nothing else"
    );

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_text_only_render_stays_text() {
    let dir = locale_dir("text");
    let i18n = app(&dir);

    let mut table: SubstitutionTable<HtmlNode> = SubstitutionTable::new();
    table.with_value("name", "Ada");

    let rendered = i18n.t(&HtmlRuntime, "welcome", &table);
    assert_eq!(rendered.as_text(), Some("Welcome to Trellis, Ada!"));

    let rendered = i18n.t(&HtmlRuntime, "no.such.key", &table);
    assert_eq!(rendered.as_text(), Some("no.such.key"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_void_element_and_node_variable() {
    let dir = locale_dir("void");
    let i18n = app(&dir);

    let mut table: SubstitutionTable<HtmlNode> = SubstitutionTable::new();
    table
        .with_node("br", Element::new("br").into())
        .with_node("terms", Element::new("a").with_attribute("href", "/tos").into())
        .with_node("avatar", Element::new("img").with_attribute("src", "/ada.png").into())
        .with_value("name", "Ada");

    assert_eq!(
        html(i18n.t(&HtmlRuntime, "terms", &table)),
        "I accept the <a href=\"/tos\">terms of service</a><br>and nothing else"
    );
    assert_eq!(
        html(i18n.t(&HtmlRuntime, "avatar", &table)),
        "<img src=\"/ada.png\"> Ada"
    );

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_scalar_markup_is_escaped_in_html() {
    let mut messages = LocalizedMessages::new();
    messages.with_message("hello", "Hello, <b>{{name}}</b>");
    let mut i18n = I18n::new();
    i18n.with_messages_for_locale("en", messages);

    let mut table: SubstitutionTable<HtmlNode> = SubstitutionTable::new();
    table
        .with_value("name", "<script>")
        .with_node("b", Element::new("b").into());

    assert_eq!(
        html(i18n.t(&HtmlRuntime, "hello", &table)),
        "Hello, <b>&lt;script&gt;</b>"
    );
}

#[test]
fn test_scalar_values_are_not_parsed_as_placeholders() {
    let mut messages = LocalizedMessages::new();
    messages
        .with_message("hello", "Hello, {{name}}")
        .with_message("spaced", "Hello, {{ name }}")
        .with_message("wrapped", "Hello, <b>{{name}}</b>");
    let mut i18n = I18n::new();
    i18n.with_messages_for_locale("en", messages);

    let mut table: SubstitutionTable<HtmlNode> = SubstitutionTable::new();
    table
        .with_value("name", "<b>Mallory</b> {{avatar}}")
        .with_node("b", Element::new("marquee").into())
        .with_node("avatar", Element::new("img").with_attribute("src", "/admin.png").into());

    let rendered = i18n.t(&HtmlRuntime, "hello", &table);
    assert_eq!(rendered.as_text(), Some("Hello, <b>Mallory</b> {{avatar}}"));
    assert_eq!(
        html(rendered),
        "Hello, &lt;b&gt;Mallory&lt;/b&gt; {{avatar}}"
    );

    let rendered = i18n.t(&HtmlRuntime, "spaced", &table);
    assert_eq!(rendered.as_text(), Some("Hello, <b>Mallory</b> {{avatar}}"));

    assert_eq!(
        html(i18n.t(&HtmlRuntime, "wrapped", &table)),
        "Hello, <marquee>&lt;b&gt;Mallory&lt;/b&gt; {{avatar}}</marquee>"
    );
}
