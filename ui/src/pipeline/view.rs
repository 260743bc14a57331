use std::rc::Rc;

use api::{BackendGateway, ACCEPTED_UPLOAD_EXTENSIONS};
use dioxus::logger::tracing::{debug, warn};
use dioxus::prelude::*;
use futures_util::StreamExt;

use crate::core::format;
use crate::t;

use super::engine::{PipelineState, PipelineStateMachine};
use super::PipelineJob;

/// Runs accepted jobs one at a time and settles them into `machine`.
///
/// Lives in the caller's scope, so a remount of the views that feed it does
/// not drop a request in flight. Views reach it with
/// `use_coroutine_handle::<PipelineJob>()`.
pub(crate) fn use_pipeline_worker(
    machine: Signal<PipelineStateMachine>,
    gateway: Rc<dyn BackendGateway>,
) -> Coroutine<PipelineJob> {
    use_coroutine(move |mut rx: UnboundedReceiver<PipelineJob>| {
        let gateway = gateway.clone();
        let mut machine = machine;
        async move {
            while let Some(job) = rx.next().await {
                let outcome = job.run(&*gateway).await;
                machine.with_mut(|m| outcome.settle(m));
            }
        }
    })
}

/// Upload, analyze and generate controls driving a shared machine.
#[component]
pub fn PipelineView(machine: Signal<PipelineStateMachine>) -> Element {
    let gateway = use_context::<Rc<dyn BackendGateway>>();
    let worker = use_coroutine_handle::<PipelineJob>();

    // Triggers are accepted or refused on click, before the next render.
    let on_analyze = move |_: MouseEvent| {
        let mut machine = machine;
        if let Ok(request) = machine.with_mut(|m| m.begin_analyze()) {
            worker.send(PipelineJob::Analyze(request));
        }
    };
    let on_generate = move |_: MouseEvent| {
        let mut machine = machine;
        if let Ok(request) = machine.with_mut(|m| m.begin_generate()) {
            worker.send(PipelineJob::Generate(request));
        }
    };

    let health = {
        let gateway = gateway.clone();
        use_resource(move || {
            let gateway = gateway.clone();
            async move { gateway.health().await }
        })
    };

    let on_file = move |evt: FormEvent| async move {
        let Some(engine) = evt.files() else {
            return;
        };
        let Some(name) = engine.files().into_iter().next() else {
            return;
        };
        match engine.read_file(&name).await {
            Some(bytes) => {
                debug!(file = %name, len = bytes.len(), "file read");
                let mut machine = machine;
                machine.with_mut(|m| m.select_file(api::UploadFile::new(name, bytes)));
            }
            None => warn!(file = %name, "unable to read selected file"),
        }
    };

    let on_instruction = move |evt: FormEvent| {
        let mut machine = machine;
        machine.with_mut(|m| m.set_instruction(evt.value()));
    };

    let snapshot = machine.read();
    let state = snapshot.state();
    let file_label = snapshot
        .file()
        .map(|file| format!("{} · {}", file.name, format::format_bytes(file.bytes.len())));
    let instruction = snapshot.instruction().to_string();
    let can_analyze = snapshot.can_analyze();
    let can_generate = snapshot.can_generate();
    let has_narrative = snapshot.narrative().is_some();
    let error_message = snapshot.error().map(|err| err.to_string());
    drop(snapshot);

    let generate_label = if has_narrative {
        t!("pipeline-regenerate")
    } else {
        t!("pipeline-generate")
    };

    let health_badge = match &*health.read() {
        None => ("backend-status backend-status--pending", t!("backend-checking")),
        Some(Ok(status)) if status.is_ok() => {
            ("backend-status backend-status--ok", t!("backend-online"))
        }
        Some(_) => ("backend-status backend-status--down", t!("backend-offline")),
    };

    rsx! {
        section { class: "narrator-card pipeline",
            div { class: "narrator-card__header",
                h2 { {t!("pipeline-title")} }
                span { class: "{health_badge.0}", "{health_badge.1}" }
            }

            div { class: "pipeline__step",
                label { class: "pipeline__label", r#for: "dataset-file", {t!("pipeline-upload-label")} }
                input {
                    id: "dataset-file",
                    r#type: "file",
                    accept: ACCEPTED_UPLOAD_EXTENSIONS,
                    disabled: state.is_busy(),
                    onchange: on_file,
                }
                if let Some(label) = file_label {
                    span { class: "pipeline__file", "{label}" }
                }
                button {
                    r#type: "button",
                    class: "button button--primary",
                    disabled: !can_analyze,
                    onclick: on_analyze,
                    if state == PipelineState::Uploading {
                        {t!("pipeline-analyzing")}
                    } else {
                        {t!("pipeline-analyze")}
                    }
                }
            }

            div { class: "pipeline__step",
                label { class: "pipeline__label", r#for: "report-instruction", {t!("pipeline-instruction-label")} }
                textarea {
                    id: "report-instruction",
                    class: "pipeline__instruction",
                    rows: "3",
                    placeholder: t!("pipeline-instruction-placeholder"),
                    value: "{instruction}",
                    disabled: state.is_busy(),
                    oninput: on_instruction,
                }
                button {
                    r#type: "button",
                    class: "button button--accent",
                    disabled: !can_generate,
                    onclick: on_generate,
                    if state == PipelineState::Generating {
                        {t!("pipeline-generating")}
                    } else {
                        "{generate_label}"
                    }
                }
            }

            p { class: "pipeline__status pipeline__status--{state.as_str()}",
                {state_label(state)}
            }

            if let Some(message) = error_message {
                p { class: "narrator-card__meta narrator-card__meta--error", role: "alert", "⚠️ {message}" }
            }
        }
    }
}

fn state_label(state: PipelineState) -> String {
    match state {
        PipelineState::Idle => t!("state-idle"),
        PipelineState::Uploading => t!("state-uploading"),
        PipelineState::Analyzed => t!("state-analyzed"),
        PipelineState::Generating => t!("state-generating"),
        PipelineState::Done => t!("state-done"),
        PipelineState::Failed => t!("state-failed"),
    }
}
