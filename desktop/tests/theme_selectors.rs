#![cfg(test)]
/*!
Theme selector lint for the desktop build.

Checks that the selectors the shared components render are still present in
the unified theme (`ui/assets/theme/main.css`), which packaged desktop builds
embed at compile time. A plain substring check is enough for an early warning.

When a component's class names change, update REQUIRED_SELECTORS with it.
*/

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".page {",
    ".page-workspace",
    ".workspace__column",
    // Buttons
    ".button {",
    ".button--primary",
    ".button--accent",
    ".button--ghost",
    // Cards
    ".narrator-card",
    ".narrator-card__header",
    ".narrator-card__meta",
    ".narrator-card__meta--error",
    ".narrator-card__placeholder",
    // Pipeline
    ".backend-status--ok",
    ".backend-status--down",
    ".pipeline__step",
    ".pipeline__instruction",
    ".pipeline__status--failed",
    // Stats
    ".stats-highlights",
    ".stats-highlight__value",
    ".stats-table",
    ".stats-correlation__fill",
    ".stats-correlation__fill--negative",
    ".stats-preview",
    // Report & export
    ".report__body",
    ".report__figure",
    ".report__heading",
    ".report-export__actions",
    // Chat
    ".chat__log",
    ".chat__message--user",
    ".chat__message--assistant",
    ".chat__composer",
    // Responsive block
    "@media (max-width: 720px)",
];

#[test]
fn unified_theme_contains_required_selectors() {
    let missing: Vec<&str> = REQUIRED_SELECTORS
        .iter()
        .copied()
        .filter(|sel| !THEME_CSS.contains(sel))
        .collect();

    assert!(
        missing.is_empty(),
        "Missing {} required CSS selectors/tokens in unified theme:\n{}",
        missing.len(),
        missing.join("\n")
    );
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 4_000,
        "Embedded theme appears unexpectedly small ({non_ws_len} non-whitespace chars)"
    );
}

#[test]
fn chat_roles_are_styled_in_pairs() {
    let has_user = THEME_CSS.contains(".chat__message--user");
    let has_assistant = THEME_CSS.contains(".chat__message--assistant");
    assert!(
        has_user && has_assistant,
        "Chat role selectors missing (user: {has_user}, assistant: {has_assistant})"
    );
}
