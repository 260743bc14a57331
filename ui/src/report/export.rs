use std::rc::Rc;

use api::Stats;
use dioxus::logger::tracing::warn;
use dioxus::prelude::*;

use crate::t;

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working,
    Done(String),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExportKind {
    Markdown,
    Clipboard,
    StatsJson,
}

#[component]
pub fn ReportExportPanel(document: String, stats: Rc<Stats>) -> Element {
    let status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);

    let feedback = match status() {
        ExportStatus::Idle => None,
        ExportStatus::Working => Some(("narrator-card__meta".to_string(), t!("export-working"))),
        ExportStatus::Done(message) => Some((
            "narrator-card__meta narrator-card__meta--success".to_string(),
            format!("✅ {message}"),
        )),
        ExportStatus::Error(err) => Some((
            "narrator-card__meta narrator-card__meta--error".to_string(),
            format!("⚠️ {err}"),
        )),
    };

    let trigger = use_callback(move |kind: ExportKind| {
        let mut busy = busy;
        let mut status = status;
        if busy() {
            return;
        }
        busy.set(true);
        status.set(ExportStatus::Working);
        let document = document.clone();
        let stats = Rc::clone(&stats);
        spawn(async move {
            let outcome = match kind {
                ExportKind::Markdown => export_markdown(document).await,
                ExportKind::Clipboard => copy_markdown(document).await,
                ExportKind::StatsJson => export_stats(&stats).await,
            };
            match outcome {
                Ok(message) => status.set(ExportStatus::Done(message)),
                Err(err) => {
                    warn!(?kind, error = %err, "export failed");
                    status.set(ExportStatus::Error(err));
                }
            }
            busy.set(false);
        });
    });

    rsx! {
        section { class: "narrator-card report-export",
            div { class: "narrator-card__header",
                h2 { {t!("export-title")} }
            }
            div { class: "report-export__actions",
                button {
                    r#type: "button",
                    class: "button button--primary",
                    disabled: busy(),
                    onclick: move |_| trigger.call(ExportKind::Markdown),
                    {t!("export-markdown")}
                }
                button {
                    r#type: "button",
                    class: "button",
                    disabled: busy(),
                    onclick: move |_| trigger.call(ExportKind::Clipboard),
                    {t!("export-copy")}
                }
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    disabled: busy(),
                    onclick: move |_| trigger.call(ExportKind::StatsJson),
                    {t!("export-stats")}
                }
            }
            if let Some((class_name, message)) = feedback {
                p { class: "{class_name}", "{message}" }
            }
        }
    }
}

async fn export_markdown(document: String) -> Result<String, String> {
    let filename = export_filename("report", "md", &timestamp_slug());
    let delivery = download_bytes(&filename, "text/markdown", document.into_bytes()).await?;
    Ok(match delivery {
        Some(path) => t!("export-saved", path = path),
        None => t!("export-download-started"),
    })
}

async fn copy_markdown(document: String) -> Result<String, String> {
    copy_to_clipboard(document).await?;
    Ok(t!("export-copied"))
}

async fn export_stats(stats: &Stats) -> Result<String, String> {
    let json = stats_json(stats)?;
    let filename = export_filename("stats", "json", &timestamp_slug());
    let delivery = download_bytes(&filename, "application/json", json.into_bytes()).await?;
    Ok(match delivery {
        Some(path) => t!("export-saved", path = path),
        None => t!("export-download-started"),
    })
}

/// Pretty JSON using the backend's field names, so the file can be posted back as-is.
fn stats_json(stats: &Stats) -> Result<String, String> {
    serde_json::to_string_pretty(stats).map_err(|err| err.to_string())
}

fn export_filename(kind: &str, extension: &str, slug: &str) -> String {
    format!("datanarrator-{kind}-{slug}.{extension}")
}

fn timestamp_slug() -> String {
    use time::{macros::format_description, OffsetDateTime};

    OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "export".into())
}

async fn copy_to_clipboard(payload: String) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;

        let window = web_sys::window().ok_or("window unavailable")?;
        let document = window
            .document()
            .ok_or("document unavailable")?
            .dyn_into::<web_sys::HtmlDocument>()
            .map_err(|_| "Document cast failed")?;
        let body = document.body().ok_or("missing body")?;

        let textarea = document
            .create_element("textarea")
            .map_err(|_| "Unable to create textarea")?
            .dyn_into::<web_sys::HtmlTextAreaElement>()
            .map_err(|_| "Textarea cast failed")?;
        textarea.set_value(&payload);
        let style = textarea.style();
        style.set_property("position", "fixed").ok();
        style.set_property("opacity", "0").ok();

        body.append_child(&textarea).ok();
        textarea.select();
        let copied = document.exec_command("copy").unwrap_or(false);
        textarea.remove();
        if copied {
            Ok(())
        } else {
            Err("Clipboard copy blocked".into())
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use arboard::Clipboard;

        let mut clipboard = Clipboard::new().map_err(|err| err.to_string())?;
        clipboard.set_text(payload).map_err(|err| err.to_string())
    }
}

async fn download_bytes(
    filename: &str,
    mime: &str,
    bytes: Vec<u8>,
) -> Result<Option<String>, String> {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let array = js_sys::Uint8Array::from(bytes.as_slice());
        let parts = js_sys::Array::new();
        parts.push(&array.buffer());

        let opts = BlobPropertyBag::new();
        opts.set_type(mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|_| "Failed to create blob".to_string())?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| "Unable to create download".to_string())?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("Document unavailable")?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| "Unable to create anchor")?
            .dyn_into()
            .map_err(|_| "Anchor cast failed")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or("Missing body")?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Url::revoke_object_url(&url).ok();

        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::fs;

        let _ = mime;
        let dir = export_dir()?;
        fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let path = dir.join(filename);
        fs::write(&path, bytes).map_err(|err| err.to_string())?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn export_dir() -> Result<std::path::PathBuf, String> {
    let dirs = directories::ProjectDirs::from("com", "DataNarrator", "DataNarrator")
        .ok_or("Unable to determine export directory")?;
    Ok(dirs.data_dir().join("exports"))
}
