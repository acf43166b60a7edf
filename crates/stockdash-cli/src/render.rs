//! Terminal rendering of categories, stock lists and the analysis lifecycle

use chrono::{DateTime, Local};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table};
use std::time::Duration;
use stockdash_core::{
    AnalysisError, AnalysisLifecycle, AnalysisResult, Category, FetchError, LifecycleState, Stock,
};

pub fn categories(categories: &[Category], current: Option<&str>) -> String {
    let mut output = String::from("Categories:\n");
    for category in categories {
        let marker = if current == Some(category.key) { "▶" } else { " " };
        output.push_str(&format!(
            " {marker} {:<12} {} ({} stocks)\n",
            category.key,
            category.title,
            category.members.len()
        ));
    }
    output
}

/// Stock table; rows without a provider quote show `n/a` instead of zeros
pub fn stocks(
    title: &str,
    stocks: &[Stock],
    selected: Option<&str>,
    loaded_at: Option<DateTime<Local>>,
) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "", "Symbol", "Name", "Price", "Change", "Change %"]);

    for (index, stock) in stocks.iter().enumerate() {
        let marker = if selected == Some(stock.symbol.as_str()) { "▶" } else { "" };
        let mut row = vec![
            Cell::new(index + 1),
            Cell::new(marker),
            Cell::new(&stock.symbol),
            Cell::new(&stock.name),
        ];

        if stock.is_unquoted() {
            row.extend((0..3).map(|_| Cell::new("n/a").set_alignment(CellAlignment::Right)));
        } else {
            let color = if stock.change < 0.0 { Color::Red } else { Color::Green };
            row.push(Cell::new(format!("{:.2}", stock.price)).set_alignment(CellAlignment::Right));
            row.push(
                Cell::new(format!("{:+.2}", stock.change))
                    .fg(color)
                    .set_alignment(CellAlignment::Right),
            );
            row.push(
                Cell::new(format!("{:+.2}%", stock.change_percent))
                    .fg(color)
                    .set_alignment(CellAlignment::Right),
            );
        }
        table.add_row(row);
    }

    let mut output = format!("{title}\n{table}");
    if let Some(at) = loaded_at {
        output.push_str(&format!("\nas of {}", at.format("%H:%M:%S")));
    }
    output
}

pub fn fetch_error(category: &str, error: &FetchError) -> String {
    format!("Could not load '{category}': {error}\n(no stocks to show)")
}

pub fn lifecycle(lifecycle: &AnalysisLifecycle, deadline: Duration) -> String {
    let selected = lifecycle.selected();
    let label = selected
        .map(|s| format!("{} ({})", s.symbol, s.name))
        .unwrap_or_default();

    match lifecycle.state() {
        LifecycleState::Idle => "No stock selected. Use `select <symbol>`.".to_string(),
        LifecycleState::Selected => format!("Selected {label}. Run `analyze` to request an analysis."),
        LifecycleState::Loading => format!(
            "Analyzing {label}... (gives up after {}s, `cancel` to abandon)",
            deadline.as_secs()
        ),
        LifecycleState::Success => match lifecycle.result() {
            Some(result) => analysis(result),
            None => format!("Analysis of {label} finished."),
        },
        LifecycleState::Failed => match lifecycle.error() {
            Some(error) => failure(&label, error),
            None => format!("Analysis of {label} failed."),
        },
    }
}

fn failure(label: &str, error: &AnalysisError) -> String {
    format!(
        "✗ Analysis of {label} failed\n  {}\n  detail: {error}\nRun `analyze` to retry.",
        error.user_message()
    )
}

pub fn analysis(result: &AnalysisResult) -> String {
    let technical = &result.technical_analysis;
    let semantic = &result.semantic_analysis;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Technical", "", "Sentiment", ""])
        .add_row(vec![
            "Trend",
            technical.trend.as_str(),
            "Sentiment",
            semantic.sentiment.as_str(),
        ])
        .add_row(vec![
            "Support".to_string(),
            format!("{:.2}", technical.support),
            "News score".to_string(),
            format!("{:.1}/10", semantic.news_score),
        ])
        .add_row(vec![
            "Resistance".to_string(),
            format!("{:.2}", technical.resistance),
            "Social buzz".to_string(),
            semantic.social_media_buzz.clone(),
        ])
        .add_row(vec![
            "RSI".to_string(),
            format!("{:.1}", technical.rsi),
            "Analyst rating".to_string(),
            semantic.analyst_rating.clone(),
        ])
        .add_row(vec!["MACD", technical.macd.as_str(), "", ""]);

    format!(
        "✓ Analysis of {} @ {:.2}\n{table}\nAI insight:\n  {}",
        result.stock.symbol, result.stock.price, result.ai_insight
    )
}
