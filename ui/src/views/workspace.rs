use std::rc::Rc;

use api::{BackendGateway, HttpGateway};
use dioxus::logger::tracing::info;
use dioxus::prelude::*;

use crate::chat::{use_chat_worker, ChatPanel, ConversationSession};
use crate::pipeline::{use_pipeline_worker, PipelineStateMachine, PipelineView};
use crate::report::{ReportExportPanel, ReportPanel};
use crate::stats::StatsPanel;

/// The run and the conversation behind the workspace page.
///
/// Launchers remount their routed subtree when the locale changes, so this
/// state and the workers that settle requests into it are created above the
/// router with [`use_workspace_provider`], and `Workspace` only reads them.
#[derive(Clone, Copy, PartialEq)]
pub struct WorkspaceState {
    pub machine: Signal<PipelineStateMachine>,
    pub session: Signal<ConversationSession>,
}

/// Call once from the launcher's root component, outside any keyed subtree.
pub fn use_workspace_provider() -> WorkspaceState {
    use_workspace_with(|| {
        let gateway = HttpGateway::from_env();
        info!(base_url = gateway.config().base_url(), "backend gateway ready");
        Rc::new(gateway) as Rc<dyn BackendGateway>
    })
}

pub(crate) fn use_workspace_with(
    gateway: impl FnOnce() -> Rc<dyn BackendGateway>,
) -> WorkspaceState {
    let gateway = use_context_provider(gateway);
    let machine = use_signal(PipelineStateMachine::new);
    let session = use_signal(ConversationSession::new);

    use_pipeline_worker(machine, Rc::clone(&gateway));
    use_chat_worker(session, gateway);

    // A new analysis starts a fresh conversation.
    use_effect(move || {
        let stats = machine.read().chat_stats();
        let mut session = session;
        session.with_mut(|s| s.bind(stats));
    });

    use_context_provider(|| WorkspaceState { machine, session })
}

/// Upload, report and conversation on one page, sharing a single pipeline.
#[component]
pub fn Workspace() -> Element {
    let WorkspaceState { machine, session } = use_context::<WorkspaceState>();

    let snapshot = machine.read();
    let analysis = snapshot.analysis().cloned();
    let report_type = analysis
        .as_ref()
        .map(|a| a.report_type.clone())
        .unwrap_or_default();
    let report = snapshot
        .report_document()
        .map(str::to_string)
        .zip(snapshot.stats());
    drop(snapshot);

    rsx! {
        section { class: "page page-workspace",
            div { class: "workspace__column workspace__column--controls",
                PipelineView { machine }
                if let Some(analysis) = analysis {
                    StatsPanel { analysis }
                }
            }
            div { class: "workspace__column workspace__column--report",
                if let Some((document, stats)) = report {
                    ReportPanel {
                        document: document.clone(),
                        report_type,
                    }
                    ReportExportPanel { document, stats }
                } else {
                    div { class: "narrator-card",
                        p { class: "narrator-card__placeholder", {crate::t!("report-placeholder")} }
                    }
                }
                ChatPanel { session }
            }
        }
    }
}
