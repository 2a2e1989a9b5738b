use colored::Colorize;
use serde::Serialize;

use crate::catalog::Record;
use crate::engine::DirectoryEngine;
use crate::links::LinkTemplates;
use crate::store::ConvertedStore;

const NOT_SET: &str = "غير محدد";
const NO_RESULTS: &str = "لا توجد شركات في هذا التصنيف";

#[derive(Clone, Debug, Serialize)]
pub struct CardRecord<'a> {
    #[serde(flatten)]
    pub record: &'a Record,
    pub converted: bool,
    pub company_url: String,
    pub dashboard_url: String,
}

pub fn build_cards<'a, S: ConvertedStore>(
    engine: &'a DirectoryEngine<S>,
    links: &LinkTemplates,
) -> Vec<CardRecord<'a>> {
    engine
        .visible()
        .into_iter()
        .map(|record| CardRecord {
            record,
            converted: engine.is_converted(record.id),
            company_url: links.company_url(record.id),
            dashboard_url: links.dashboard_url(record.id),
        })
        .collect()
}

fn or_not_set(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(NOT_SET)
}

fn detail(label: &str, value: &str) -> String {
    format!("    {} {}\n", format!("{label:<9}").dimmed(), value)
}

pub fn render_card(card: &CardRecord<'_>) -> String {
    let record = card.record;
    let mut out = String::new();

    out.push_str(&format!(
        "{}{}{} {}  {}\n",
        "[".bold().white(),
        record.id.to_string().bold().cyan(),
        "]".bold().white(),
        record.name_en.bold().white(),
        record.name_ar.bold().white()
    ));
    if card.converted {
        out.push_str(&format!("    {}\n", "✔ تم تحويل الرابط".bold().green()));
    }

    out.push_str(&detail("email", or_not_set(Some(record.email.as_str()))));
    out.push_str(&detail("phone", or_not_set(record.phone.as_deref())));
    out.push_str(&detail("website", or_not_set(record.website.as_deref())));
    out.push_str(&detail(
        "plan",
        &format!("خطة الاشتراك: {}", record.subscription_plan_id),
    ));
    out.push_str(&detail(
        "verified",
        if record.verified { "موثق: نعم" } else { "موثق: لا" },
    ));
    if record.has_location_link() {
        out.push_str(&detail(
            "location",
            &format!(
                "رابط الموقع: {}",
                record.location_link.as_deref().unwrap_or_default().blue()
            ),
        ));
    }

    out.push_str(&detail("view", &format!("عرض الشركة {}", card.company_url)));
    out.push_str(&detail("dashboard", &format!("لوحة التحكم {}", card.dashboard_url)));
    let action = if card.converted {
        format!("إلغاء :: unmark {}", record.id).yellow()
    } else {
        format!("تم :: mark {}", record.id).green()
    };
    out.push_str(&detail("action", &action.to_string()));
    out
}

/// Cards separated by blank lines, or the empty-category notice.
pub fn render_cards(cards: &[CardRecord<'_>], has_selection: bool) -> String {
    if !has_selection || cards.is_empty() {
        return format!("  {}\n", NO_RESULTS.dimmed());
    }
    cards
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n")
}
