//! Terminal rendering for the `explab` report and watch output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use explab_core::{ExperimentSummary, StatusKind, ViewState};

const PROMPT_EXCERPT_CHARS: usize = 48;

pub fn status_color(status: &str) -> Color {
    match StatusKind::classify(status) {
        StatusKind::Succeeded => Color::Green,
        StatusKind::Running => Color::Cyan,
        StatusKind::Pending => Color::Yellow,
        StatusKind::Failed => Color::Red,
        StatusKind::Other => Color::White,
    }
}

pub fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let cut: String = flat.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn header(label: &str) -> Cell {
    Cell::new(label)
        .set_alignment(CellAlignment::Center)
        .add_attribute(Attribute::Bold)
}

fn optional(value: &Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "—".to_string(),
    }
}

pub fn experiments_table(experiments: &[ExperimentSummary]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            header("ID"),
            header("Status"),
            header("AI Client"),
            header("Model"),
            header("Prompt"),
        ]);

    for exp in experiments {
        table.add_row(vec![
            Cell::new(format!("#{}", exp.id)).set_alignment(CellAlignment::Right),
            Cell::new(&exp.status)
                .set_alignment(CellAlignment::Center)
                .fg(status_color(&exp.status)),
            Cell::new(optional(&exp.ai_client)),
            Cell::new(optional(&exp.model)),
            Cell::new(exp.prompt.as_deref().map(|p| excerpt(p, PROMPT_EXCERPT_CHARS)).unwrap_or_else(|| "—".into())),
        ]);
    }
    table
}

/// Lines to print when the watched view moves from `prev` to `next`.
///
/// Transcript growth prints only the appended blocks; any other transcript change
/// reprints it in full.
pub fn watch_delta(prev: &ViewState, next: &ViewState) -> Vec<String> {
    let mut lines = Vec::new();

    if next.status != prev.status {
        if let Some(status) = &next.status {
            lines.push(format!("── status: {}", status));
        }
    }

    if next.transcript != prev.transcript {
        let appended = if prev.transcript.is_empty() {
            None
        } else {
            next.transcript.strip_prefix(prev.transcript.as_str())
        };
        match appended {
            Some(tail) => {
                let tail = tail.trim_start_matches('\n');
                if !tail.is_empty() {
                    lines.push(tail.to_string());
                }
            }
            None if !next.transcript.is_empty() => lines.push(next.transcript.clone()),
            None => {}
        }
    }

    if next.error != prev.error {
        if let Some(err) = &next.error {
            lines.push(format!("!! {} failed: {}", err.operation, err.message));
        }
    }

    lines
}
