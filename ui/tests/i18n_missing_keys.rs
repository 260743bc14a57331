use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

/// Every non-fallback locale provides at least the keys of `en-US/narrator-ui.ftl`,
/// and no locale defines the same key twice.
///
/// Keys are read line by line (`key = ...`); comments, attributes and
/// continuation lines are skipped.
#[test]
fn all_locales_have_all_fallback_keys() {
    const EN_US: &str = include_str!("../i18n/en-US/narrator-ui.ftl");
    const ES_ES: &str = include_str!("../i18n/es-ES/narrator-ui.ftl");

    let fallback_keys = extract_keys(EN_US);

    assert!(
        !fallback_keys.is_empty(),
        "Fallback (en-US) contains no keys."
    );
    assert_no_dup_keys(EN_US, "en-US");

    let locales: &[(&str, &str)] = &[("es-ES", ES_ES)];

    let mut failures = Vec::new();

    for (locale, src) in locales {
        assert_no_dup_keys(src, locale);

        let keys = extract_keys(src);
        let mut missing: BTreeSet<String> = BTreeSet::new();

        for k in &fallback_keys {
            if !keys.contains(k) {
                missing.insert(k.clone());
            }
        }

        if !missing.is_empty() {
            failures.push(format!(
                "Locale {locale} is missing {} key(s):\n  {}",
                missing.len(),
                missing.into_iter().collect::<Vec<_>>().join("\n  ")
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "Translation completeness check failed:\n\n{}\n\nHint: copy the missing keys from en-US, then translate.",
            failures.join("\n\n")
        );
    }
}

/// Every fallback key is looked up somewhere under `src/` through `t!`, and
/// every key looked up exists in the fallback.
#[test]
fn fallback_keys_match_source_lookups() {
    const EN_US: &str = include_str!("../i18n/en-US/narrator-ui.ftl");

    let fallback_keys = extract_keys(EN_US);
    let mut referenced = HashSet::new();
    collect_lookups(
        &Path::new(env!("CARGO_MANIFEST_DIR")).join("src"),
        &mut referenced,
    );
    assert!(!referenced.is_empty(), "No t!(\"...\") lookups found under src/.");

    let undefined: BTreeSet<_> = referenced.difference(&fallback_keys).collect();
    assert!(
        undefined.is_empty(),
        "Keys looked up but missing from en-US:\n  {}",
        undefined.into_iter().cloned().collect::<Vec<_>>().join("\n  ")
    );

    let unused: BTreeSet<_> = fallback_keys.difference(&referenced).collect();
    assert!(
        unused.is_empty(),
        "en-US keys never looked up from src/:\n  {}",
        unused.into_iter().cloned().collect::<Vec<_>>().join("\n  ")
    );
}

/// Gather the literal key of every `t!("key"...)` call in `.rs` files under `dir`.
fn collect_lookups(dir: &Path, keys: &mut HashSet<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_lookups(&path, keys);
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            continue;
        }
        let src = fs::read_to_string(&path).unwrap_or_default();
        for (idx, _) in src.match_indices("t!(") {
            // Skip `format!(`, `assert!(` and friends.
            let preceded_by_ident = src[..idx]
                .chars()
                .next_back()
                .is_some_and(|ch| ch.is_alphanumeric() || ch == '_');
            if preceded_by_ident {
                continue;
            }
            let rest = src[idx + 3..].trim_start();
            let Some(rest) = rest.strip_prefix('"') else {
                continue;
            };
            if let Some(end) = rest.find('"') {
                let key = &rest[..end];
                if !key.is_empty()
                    && key
                        .chars()
                        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
                {
                    keys.insert(key.to_string());
                }
            }
        }
    }
}

/// Extract message keys from a Fluent file (simple heuristic).
fn extract_keys(src: &str) -> HashSet<String> {
    let mut keys = HashSet::new();

    for line in src.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Skip attribute or continuation lines (start with '.' or indent).
        if line.starts_with('.') {
            continue;
        }
        // Basic pattern: key [space]* '='
        if let Some(eq_pos) = line.find('=') {
            let (left, _right) = line.split_at(eq_pos);
            let key = left.trim();
            if !key.is_empty()
                && !key.contains(' ')
                && !key.contains('\t')
                && !key.starts_with('[')
                && !key.starts_with('@')
            {
                keys.insert(key.to_string());
            }
        }
    }

    keys
}

/// Assert no duplicate key definitions in a single FTL file (rudimentary).
fn assert_no_dup_keys(src: &str, locale: &str) {
    let mut seen = HashSet::new();
    let mut dups = BTreeSet::new();

    for line in src.lines() {
        let raw = line;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('.') {
            continue;
        }
        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            if !key.is_empty()
                && !key.contains(' ')
                && !key.contains('\t')
                && !key.starts_with('[')
                && !key.starts_with('@')
            {
                if !seen.insert(key.to_string()) {
                    dups.insert(format!("{key}  (line: \"{raw}\")"));
                }
            }
        }
    }

    if !dups.is_empty() {
        panic!(
            "Duplicate key definitions in {locale}:\n  {}",
            dups.into_iter().collect::<Vec<_>>().join("\n  ")
        );
    }
}
