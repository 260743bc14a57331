//! Merges the generated narrative with the backend's chart images.
//!
//! Placement keys off two numbered headings the narrative prompt asks for:
//!
//! ```text
//! ## 2. Deep Dive: Metrics & Distributions   <- distribution charts go here
//! ...                                        <- category charts end the section
//! ## 3. Correlation & Logic Analysis         <- correlation charts go here
//! ```
//!
//! Charts whose anchor heading is missing are dropped. Headings worded or
//! numbered differently do not match; that is a known limitation of relying
//! on model output, not something to paper over here.
//!
//! `assemble` is not idempotent: the headings survive in its output, so
//! feeding the output back in inserts every image a second time. Call it once
//! per freshly generated narrative.

use api::{Plot, PlotKind};
use once_cell::sync::Lazy;
use regex::Regex;

// Matches stop before the line terminator, so `\n` and `\r\n` narratives
// both anchor on the heading text.
static DEEP_DIVE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*#{1,6}[ \t]*2\.?[ \t]*Deep Dive[^\r\n]*")
        .expect("valid deep dive heading pattern")
});

static CORRELATION_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*#{1,6}[ \t]*3\.?[ \t]*Correlation[^\r\n]*")
        .expect("valid correlation heading pattern")
});

/// Pure, deterministic merge of `narrative` and `plots` into one markdown document.
pub fn assemble(narrative: &str, plots: &[Plot]) -> String {
    if narrative.is_empty() || plots.is_empty() {
        return narrative.to_string();
    }

    let correlation = images_of(plots, PlotKind::Correlation);
    let distribution = images_of(plots, PlotKind::Distribution);
    let category = images_of(plots, PlotKind::Category);
    let eol = line_ending(narrative);

    let correlation_heading = CORRELATION_HEADING.find(narrative).map(|m| m.range());
    let deep_dive_heading = DEEP_DIVE_HEADING.find(narrative).map(|m| m.range());

    let mut insertions: Vec<(usize, String)> = Vec::new();

    if let Some(heading) = &correlation_heading {
        if !correlation.is_empty() {
            insertions.push((heading.end, after_heading(&correlation, eol)));
        }
        if !category.is_empty() {
            let preceding = &narrative[..heading.start];
            insertions.push((heading.start, before_heading(&category, preceding, eol)));
        }
    }

    if let Some(heading) = &deep_dive_heading {
        let mut block = distribution;
        if correlation_heading.is_none() {
            block.extend(category);
        }
        if !block.is_empty() {
            insertions.push((heading.end, after_heading(&block, eol)));
        }
    }

    insertions.sort_by_key(|(offset, _)| *offset);

    let extra: usize = insertions.iter().map(|(_, text)| text.len()).sum();
    let mut document = String::with_capacity(narrative.len() + extra);
    let mut cursor = 0;
    for (offset, text) in insertions {
        document.push_str(&narrative[cursor..offset]);
        document.push_str(&text);
        cursor = offset;
    }
    document.push_str(&narrative[cursor..]);
    document
}

/// Markdown image directive; the URL is embedded verbatim.
pub fn image_directive(plot: &Plot) -> String {
    format!("![{}]({})", plot.title, plot.url)
}

fn images_of(plots: &[Plot], kind: PlotKind) -> Vec<String> {
    plots
        .iter()
        .filter(|plot| plot.kind == kind)
        .map(image_directive)
        .collect()
}

fn line_ending(narrative: &str) -> &'static str {
    if narrative.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

fn after_heading(images: &[String], eol: &str) -> String {
    let gap = eol.repeat(2);
    format!("{gap}{}{eol}", images.join(&gap))
}

/// Images placed right before a heading. A blank line is opened first when
/// needed, otherwise the images would continue the preceding list item.
fn before_heading(images: &[String], preceding: &str, eol: &str) -> String {
    let gap = eol.repeat(2);
    let opens_block = preceding.is_empty()
        || preceding.ends_with("\n\n")
        || preceding.ends_with("\r\n\r\n");
    let lead = if opens_block { "" } else { eol };
    format!("{lead}{}{gap}", images.join(&gap))
}
