use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use trellis_i18n::intl::{ListStyle, ListType, format_list};
use trellis_i18n::{
    Element, HtmlNode, HtmlRuntime, I18n, I18nConfig, LanguageChange, SubstitutionTable,
    expand_locale, loader,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("trellis-i18n")
        .version("0.1.0")
        .about("Resolve locales and render localized messages")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log output (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("resolve")
                .about("Pick the supported locale that best matches a requested one")
                .arg(
                    Arg::new("locale")
                        .help("Requested locale (e.g. zh-SG)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("supported")
                        .long("supported")
                        .short('s')
                        .help("Comma-separated supported locales, in priority order")
                        .value_delimiter(','),
                )
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .short('d')
                        .help("Use the bundles of a locale directory as supported locales")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("fallback")
                        .long("fallback")
                        .short('f')
                        .help("Locale returned when nothing matches")
                        .default_value("en"),
                ),
        )
        .subcommand(
            Command::new("render")
                .about("Render a message from a locale directory as HTML")
                .arg(Arg::new("key").help("Message key").required(true).index(1))
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .short('d')
                        .help("Directory of <locale>.json bundles")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("locale")
                        .long("locale")
                        .short('l')
                        .help("Requested locale (default: the configured language)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("JSON configuration file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("var")
                        .long("var")
                        .help("Scalar value, as name=value")
                        .value_parser(parse_pair)
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("element")
                        .long("element")
                        .help("Substitute an empty element, as name=tag")
                        .value_parser(parse_pair)
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("wrap")
                        .long("wrap")
                        .help("Wrap tag content in an element, as name=tag")
                        .value_parser(parse_pair)
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("Join items the way a locale writes lists")
                .arg(
                    Arg::new("items")
                        .help("Items to join")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                )
                .arg(
                    Arg::new("locale")
                        .long("locale")
                        .short('l')
                        .default_value("en"),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .short('t')
                        .value_parser(["conjunction", "disjunction", "unit"])
                        .default_value("conjunction"),
                )
                .arg(
                    Arg::new("style")
                        .long("style")
                        .value_parser(["long", "short", "narrow"])
                        .default_value("long"),
                ),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("resolve", sub)) => resolve(sub),
        Some(("render", sub)) => render(sub),
        Some(("list", sub)) => {
            list(sub);
            Ok(())
        }
        _ => unreachable!("a subcommand is required"),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn parse_pair(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got '{}'", value))
}

fn pairs<'m>(matches: &'m ArgMatches, id: &str) -> impl Iterator<Item = &'m (String, String)> {
    matches
        .get_many::<(String, String)>(id)
        .into_iter()
        .flatten()
}

fn resolve(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let requested = matches.get_one::<String>("locale").unwrap();
    let fallback = matches.get_one::<String>("fallback").unwrap();

    let mut supported: Vec<String> = matches
        .get_many::<String>("supported")
        .into_iter()
        .flatten()
        .cloned()
        .collect();
    if let Some(dir) = matches.get_one::<PathBuf>("dir") {
        supported.extend(
            loader::load_all_messages_from_dir(dir)?
                .into_iter()
                .map(|(locale, _)| locale),
        );
    }

    match expand_locale(requested) {
        Ok(expanded) => info!(requested = %requested, expanded = %expanded, "expanded requested locale"),
        Err(e) => warn!(error = %e, "requested locale cannot be expanded"),
    }

    println!(
        "{}",
        trellis_i18n::locale::resolve_language(requested, &supported, fallback)
    );
    Ok(())
}

fn render(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let key = matches.get_one::<String>("key").unwrap();
    let dir = matches.get_one::<PathBuf>("dir").unwrap();

    let mut i18n = I18n::new();
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        i18n.with_config(I18nConfig::from_file(path)?);
    }
    i18n.with_messages_from_dir(dir)?;

    if let Some(locale) = matches.get_one::<String>("locale") {
        match i18n.change_language(locale) {
            LanguageChange::BundleRequired(resolved) => {
                return Err(format!("no bundle for '{}' in {}", resolved, dir.display()).into());
            }
            LanguageChange::Changed(resolved) => info!(locale = %resolved, "rendering"),
            LanguageChange::Unchanged => {}
        }
    }

    let mut table: SubstitutionTable<HtmlNode> = SubstitutionTable::new();
    for (name, value) in pairs(matches, "var") {
        table.with_value(name, value);
    }
    for (name, tag) in pairs(matches, "element") {
        table.with_node(name, Element::new(tag).into());
    }
    for (name, tag) in pairs(matches, "wrap") {
        let tag = tag.clone();
        table.with_factory(name, move |children| {
            Element::new(&tag).with_child(children.into()).into()
        });
    }

    let rendered = i18n.t(&HtmlRuntime, key, &table);
    println!("{}", HtmlNode::from(rendered));
    Ok(())
}

fn list(matches: &ArgMatches) {
    let items: Vec<&String> = matches.get_many::<String>("items").unwrap().collect();
    let locale = matches.get_one::<String>("locale").unwrap();

    let list_type = match matches.get_one::<String>("type").map(String::as_str) {
        Some("disjunction") => ListType::Disjunction,
        Some("unit") => ListType::Unit,
        _ => ListType::Conjunction,
    };
    let style = match matches.get_one::<String>("style").map(String::as_str) {
        Some("short") => ListStyle::Short,
        Some("narrow") => ListStyle::Narrow,
        _ => ListStyle::Long,
    };

    println!("{}", format_list(&items, locale, list_type, style));
}
