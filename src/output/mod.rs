pub mod card;

use colored::Colorize;
use serde::Serialize;

use crate::engine::{DirectoryEngine, Selection, Stats, CONVERTED_KEY};
use crate::links::LinkTemplates;
use crate::store::ConvertedStore;

pub use card::{build_cards, CardRecord};

pub const CONVERTED_LABEL: &str = "✅ الشركات المحولة";
pub const PICK_CATEGORY_PROMPT: &str = "اختر تصنيف لعرض الشركات";
pub const COMPANIES_UNIT: &str = "شركة";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    Warn,
    Error,
}

pub fn notice_line(level: Notice, message: &str) -> String {
    let tag = match level {
        Notice::Warn => "WRN".bold().yellow(),
        Notice::Error => "ERR".bold().red(),
    };
    format!(
        "{}{}{} {}",
        "[".bold().white(),
        tag,
        "]".bold().white(),
        message.bold().white()
    )
}

pub fn print_notice(level: Notice, message: &str) {
    eprintln!("{}", notice_line(level, message));
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    let mut out = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    out.push('\n');
    out
}

// one row of the category list
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub key: String,
    pub label: String,
    pub count: usize,
    pub converted: bool,
}

/// The converted pseudo-category comes first, and only when something has
/// been marked.
pub fn category_entries<S: ConvertedStore>(engine: &DirectoryEngine<S>) -> Vec<CategoryEntry> {
    let mut entries = Vec::new();
    let converted = engine.converted_ids().len();
    if converted > 0 {
        entries.push(CategoryEntry {
            key: CONVERTED_KEY.to_string(),
            label: CONVERTED_LABEL.to_string(),
            count: converted,
            converted: true,
        });
    }
    for (name, count) in engine.category_counts() {
        entries.push(CategoryEntry {
            key: name.to_string(),
            label: name.to_string(),
            count,
            converted: false,
        });
    }
    entries
}

pub fn render_categories(entries: &[CategoryEntry], format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return to_json(entries);
    }
    let mut out = String::new();
    for entry in entries {
        let label = if entry.converted {
            entry.label.bold().green()
        } else {
            entry.label.bold().white()
        };
        out.push_str(&format!(
            "  {} {}\n",
            label,
            format!("({} {COMPANIES_UNIT})", entry.count).dimmed()
        ));
    }
    out
}

pub fn title(selection: Option<&Selection>, count: usize) -> String {
    match selection {
        None => PICK_CATEGORY_PROMPT.to_string(),
        Some(Selection::Converted) => format!("{CONVERTED_LABEL} ({count} {COMPANIES_UNIT})"),
        Some(Selection::Category(name)) => format!("{name} ({count} {COMPANIES_UNIT})"),
    }
}

#[derive(Serialize)]
struct SelectionView<'a> {
    selection: Option<&'a str>,
    search: &'a str,
    title: String,
    companies: Vec<CardRecord<'a>>,
}

/// Title line followed by one card per visible record.
pub fn render_selection<S: ConvertedStore>(
    engine: &DirectoryEngine<S>,
    links: &LinkTemplates,
    format: OutputFormat,
) -> String {
    let cards = build_cards(engine, links);
    let heading = title(engine.selected(), cards.len());

    if format == OutputFormat::Json {
        let selection = engine.selected().map(|s| match s {
            Selection::Converted => CONVERTED_KEY,
            Selection::Category(name) => name.as_str(),
        });
        return to_json(&SelectionView {
            selection,
            search: engine.search_term(),
            title: heading,
            companies: cards,
        });
    }

    let mut out = format!("{}\n", heading.bold().cyan());
    if !engine.search_term().is_empty() {
        out.push_str(&format!(
            "{} {}\n",
            "search ::".bold().white(),
            engine.search_term().bold().blue()
        ));
    }
    out.push('\n');
    out.push_str(&card::render_cards(&cards, engine.selected().is_some()));
    out
}

pub fn render_stats(stats: &Stats, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return to_json(stats);
    }
    format!(
        ":: {:<18}: {}\n:: {:<18}: {}\n:: {:<18}: {}\n",
        "companies",
        stats.total,
        "with location link",
        stats.with_location_link,
        "converted",
        stats.converted
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback_catalog;
    use crate::store::MemoryStore;

    #[test]
    fn output_format_parse() {
        assert_eq!(OutputFormat::parse(" JSON "), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("txt"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("xml"), None);
    }

    #[test]
    fn converted_entry_only_when_marked() {
        let mut engine = DirectoryEngine::new(fallback_catalog(), MemoryStore::new());
        let entries = category_entries(&engine);
        assert_eq!(entries.len(), 5);
        assert!(entries.iter().all(|e| !e.converted));

        engine.mark_converted(1);
        let entries = category_entries(&engine);
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].key, CONVERTED_KEY);
        assert_eq!(entries[0].count, 1);
        assert_eq!(entries[1].label, "Goo.gl Links");
    }

    #[test]
    fn titles() {
        assert_eq!(title(None, 0), PICK_CATEGORY_PROMPT);
        assert_eq!(
            title(Some(&Selection::Category("No Links".into())), 0),
            "No Links (0 شركة)"
        );
        assert_eq!(
            title(Some(&Selection::Converted), 2),
            "✅ الشركات المحولة (2 شركة)"
        );
    }

    #[test]
    fn stats_as_json() {
        let stats = Stats {
            total: 6,
            with_location_link: 5,
            converted: 1,
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_stats(&stats, OutputFormat::Json)).unwrap();
        assert_eq!(value["total"], 6);
        assert_eq!(value["with_location_link"], 5);
        assert_eq!(value["converted"], 1);
    }

    #[test]
    fn selection_as_json_lists_visible_cards() {
        let mut engine = DirectoryEngine::new(fallback_catalog(), MemoryStore::new());
        engine.select_category("Goo.gl Links");
        let raw = render_selection(&engine, &LinkTemplates::default(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["selection"], "Goo.gl Links");
        assert_eq!(value["companies"][0]["id"], 1);
        assert_eq!(value["companies"][0]["converted"], false);
        assert_eq!(
            value["companies"][0]["company_url"],
            "https://bluepages.com.sa/companies/1"
        );
    }

    #[test]
    fn category_list_as_json() {
        let engine = DirectoryEngine::new(fallback_catalog(), MemoryStore::with_ids([1]));
        let raw = render_categories(&category_entries(&engine), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["key"], "converted");
        assert_eq!(value[1]["count"], 1);
    }
}
