use chrono::{NaiveDate, NaiveTime};

use crate::category::CategoryAggregate;
use crate::entities::summary;
use crate::model::SummaryDetail;

const CHART_WIDTH: usize = 40;

fn has_text(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

/// ISO dates and times get a readable label; anything else is shown as stored.
pub fn format_when(date: &str, time: &str) -> String {
    let date_label = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|parsed| parsed.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string());
    let time_label = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map(|parsed| parsed.format("%-I:%M %p").to_string())
        .unwrap_or_else(|_| time.to_string());
    if has_text(&time_label) {
        format!("{date_label} at {time_label}")
    } else {
        date_label
    }
}

pub fn format_summary_table(rows: &[summary::Model]) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:<24} {:<10} {:<5} {:>10} {:>10} {:>10}\n",
        "TITLE", "DATE", "TIME", "BUDGET", "SPENT", "REMAINING"
    ));
    for row in rows {
        output.push_str(&format!(
            "{:<24} {:<10} {:<5} {:>10} {:>10} {:>10}\n",
            row.title,
            row.date,
            row.time,
            format_amount(row.budget),
            format_amount(row.total_spent),
            format_amount(row.remaining)
        ));
    }
    output.trim_end().to_string()
}

pub fn format_summary_detail(detail: &SummaryDetail) -> String {
    let summary = &detail.summary;
    let mut output = String::new();
    output.push_str(&format!("Title: {}\n", summary.title));
    output.push_str(&format!("Date: {}\n", summary.date));
    output.push_str(&format!("Time: {}\n", summary.time));
    output.push_str(&format!(
        "Completed: {}\n",
        format_when(&summary.date, &summary.time)
    ));
    output.push_str(&format!("Budget: {}\n", format_amount(summary.budget)));
    output.push_str(&format!(
        "Total Spent: {}\n",
        format_amount(summary.total_spent)
    ));
    output.push_str(&format!("Remaining: {}\n", format_amount(summary.remaining)));
    if let Some(drift) = detail.balance_drift() {
        output.push_str(&format!(
            "Note: budget - spent - remaining = {} (stored values disagree)\n",
            format_amount(drift)
        ));
    }
    if has_text(&summary.description) {
        output.push_str(&format!("Description: {}\n", summary.description));
    }
    output.push('\n');
    output.push_str(&format_category_table(&detail.categories));
    output.push_str("\n\n");
    output.push_str(&format_pie_chart(&detail.categories));
    output.trim_end().to_string()
}

pub fn format_category_table(categories: &CategoryAggregate) -> String {
    if categories.is_empty() {
        return "Categories: (none)".to_string();
    }
    let mut output = String::new();
    output.push_str("Categories:\n");
    for entry in categories.entries() {
        output.push_str(&format!(
            "- {}: {}\n",
            entry.name,
            format_amount(entry.amount)
        ));
    }
    output.push_str(&format!("Total: {}", format_amount(categories.total())));
    output
}

/// Text rendering of the per-category pie: one labelled bar per slice.
pub fn format_pie_chart(categories: &CategoryAggregate) -> String {
    let slices = categories.slices();
    if slices.is_empty() {
        return "Spending breakdown: (no categories)".to_string();
    }
    let name_width = slices
        .iter()
        .map(|slice| slice.name.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = vec!["Spending breakdown:".to_string()];
    for slice in slices {
        let line = match slice.percent {
            Some(percent) => {
                let filled = ((percent / 100.0) * CHART_WIDTH as f64).round() as usize;
                let filled = filled.min(CHART_WIDTH);
                format!(
                    "{:<name_width$} {:>6} |{}{}|",
                    slice.name,
                    format!("{percent:.1}%"),
                    "#".repeat(filled),
                    " ".repeat(CHART_WIDTH - filled),
                    name_width = name_width
                )
            }
            None => format!(
                "{:<name_width$} {:>6} |",
                slice.name,
                "n/a",
                name_width = name_width
            ),
        };
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}
