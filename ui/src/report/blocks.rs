//! Line-level split of an assembled report into displayable blocks.
//!
//! Only the shapes the report prompt produces are recognised: ATX headings,
//! standalone image lines, bullet items and plain paragraphs. Everything else
//! is kept as paragraph text.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,6})[ \t]+(.+?)[ \t#]*$").expect("valid heading pattern"));

static IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^!\[([^\]]*)\]\(([^)\s]+)\)$").expect("valid image pattern"));

static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*+]|\d+\.)[ \t]+(.*)$").expect("valid bullet pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Image { alt: String, url: String },
    Bullet(String),
    Paragraph(String),
}

pub fn parse_blocks(document: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();

    for raw in document.lines() {
        let line = raw.trim();
        if line.is_empty() {
            flush(&mut paragraph, &mut blocks);
            continue;
        }

        if let Some(caps) = HEADING.captures(line) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::Heading {
                level: caps[1].len() as u8,
                text: caps[2].to_string(),
            });
        } else if let Some(caps) = IMAGE.captures(line) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::Image {
                alt: caps[1].to_string(),
                url: caps[2].to_string(),
            });
        } else if let Some(caps) = BULLET.captures(line) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::Bullet(caps[1].to_string()));
        } else {
            paragraph.push(line);
        }
    }
    flush(&mut paragraph, &mut blocks);
    blocks
}

fn flush(paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph(paragraph.join(" ")));
        paragraph.clear();
    }
}

/// Drops `**` emphasis markers; the panel renders plain text.
pub fn plain_text(text: &str) -> String {
    text.replace("**", "")
}
