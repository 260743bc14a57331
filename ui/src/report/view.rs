use dioxus::prelude::*;

use super::blocks::{parse_blocks, plain_text, Block};
use crate::t;

#[component]
pub fn ReportPanel(document: String, report_type: String) -> Element {
    let blocks = parse_blocks(&document);

    rsx! {
        section { class: "narrator-card report",
            div { class: "narrator-card__header",
                h2 { {t!("report-title")} }
                if !report_type.is_empty() {
                    span { class: "report__badge", "{report_type}" }
                }
            }

            article { class: "report__body",
                {blocks.into_iter().map(render_block)}
            }
        }
    }
}

fn render_block(block: Block) -> Element {
    match block {
        Block::Heading { level, text } => {
            let text = plain_text(&text);
            match level {
                1 => rsx! { h1 { class: "report__heading", "{text}" } },
                2 => rsx! { h2 { class: "report__heading", "{text}" } },
                3 => rsx! { h3 { class: "report__heading", "{text}" } },
                _ => rsx! { h4 { class: "report__heading", "{text}" } },
            }
        }
        Block::Image { alt, url } => rsx! {
            figure { class: "report__figure",
                img { src: "{url}", alt: "{alt}", loading: "lazy" }
                figcaption { "{alt}" }
            }
        },
        Block::Bullet(text) => {
            let text = plain_text(&text);
            rsx! { p { class: "report__bullet", "• {text}" } }
        }
        Block::Paragraph(text) => {
            let text = plain_text(&text);
            rsx! { p { class: "report__paragraph", "{text}" } }
        }
    }
}
