use dioxus::prelude::*;

use crate::core::format;
use crate::pipeline::Analysis;
use crate::t;

use super::{preview_cell, preview_columns, total_missing, MAX_CORRELATIONS};

#[component]
pub fn StatsPanel(analysis: Analysis) -> Element {
    let stats = &analysis.stats;
    let rows = format::format_count(stats.basic_info.row_count);
    let columns = format::format_count(stats.column_count() as u64);
    let missing = format::format_count(total_missing(stats));

    let numeric: Vec<(String, [String; 4])> = stats
        .numeric_stats
        .iter()
        .map(|(name, summary)| {
            let cells = [
                format::format_optional(summary.min, 2),
                format::format_optional(summary.mean, 2),
                format::format_optional(summary.median, 2),
                format::format_optional(summary.max, 2),
            ];
            (name.clone(), cells)
        })
        .collect();

    let correlations: Vec<(String, f64)> = stats
        .strongest_correlations()
        .into_iter()
        .take(MAX_CORRELATIONS)
        .map(|(label, value)| (label.to_string(), value))
        .collect();

    let preview_cols = preview_columns(&analysis.preview);
    let preview_rows = analysis.preview.clone();

    rsx! {
        section { class: "narrator-card stats",
            div { class: "narrator-card__header",
                h2 { {t!("stats-title")} }
                span { class: "narrator-card__meta", "{analysis.report_type}" }
            }

            div { class: "stats-highlights",
                div { class: "stats-highlight",
                    span { class: "stats-highlight__label", {t!("stats-rows")} }
                    strong { class: "stats-highlight__value", "{rows}" }
                }
                div { class: "stats-highlight",
                    span { class: "stats-highlight__label", {t!("stats-columns")} }
                    strong { class: "stats-highlight__value", "{columns}" }
                }
                div { class: "stats-highlight",
                    span { class: "stats-highlight__label", {t!("stats-missing")} }
                    strong { class: "stats-highlight__value", "{missing}" }
                }
                div { class: "stats-highlight",
                    span { class: "stats-highlight__label", {t!("stats-plots")} }
                    strong { class: "stats-highlight__value", "{analysis.plots.len()}" }
                }
            }

            if !numeric.is_empty() {
                h3 { {t!("stats-numeric-title")} }
                table { class: "stats-table",
                    thead {
                        tr {
                            th { {t!("stats-col-column")} }
                            th { {t!("stats-col-min")} }
                            th { {t!("stats-col-mean")} }
                            th { {t!("stats-col-median")} }
                            th { {t!("stats-col-max")} }
                        }
                    }
                    tbody {
                        for (name, cells) in numeric {
                            tr { key: "{name}",
                                td { "{name}" }
                                for cell in cells {
                                    td { "{cell}" }
                                }
                            }
                        }
                    }
                }
            }

            if !correlations.is_empty() {
                h3 { {t!("stats-correlations-title")} }
                ul { class: "stats-correlations",
                    for (label, value) in correlations {
                        li { key: "{label}", class: "stats-correlation",
                            span { class: "stats-correlation__label", "{label}" }
                            span { class: "stats-correlation__bar",
                                span {
                                    class: if value < 0.0 { "stats-correlation__fill stats-correlation__fill--negative" } else { "stats-correlation__fill" },
                                    style: "width: {format::coefficient_width(value)}%",
                                }
                            }
                            span { class: "stats-correlation__value", "{format::format_coefficient(value)}" }
                        }
                    }
                }
            }

            if !preview_rows.is_empty() {
                h3 { {t!("stats-preview-title")} }
                div { class: "stats-preview",
                    table { class: "stats-table",
                        thead {
                            tr {
                                for col in preview_cols.iter() {
                                    th { key: "{col}", "{col}" }
                                }
                            }
                        }
                        tbody {
                            for (idx, row) in preview_rows.iter().enumerate() {
                                tr { key: "{idx}",
                                    for col in preview_cols.iter() {
                                        td { key: "{col}", "{preview_cell(row, col)}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
