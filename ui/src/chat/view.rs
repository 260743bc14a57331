use std::rc::Rc;

use api::{BackendGateway, Role};
use dioxus::prelude::*;
use futures_util::StreamExt;

use crate::t;

use super::session::{ChatRequest, ConversationSession};

/// Sends accepted exchanges and settles the replies into `session`. Owned by
/// the caller's scope so a pending reply outlives a remount of `ChatPanel`.
pub(crate) fn use_chat_worker(
    session: Signal<ConversationSession>,
    gateway: Rc<dyn BackendGateway>,
) -> Coroutine<ChatRequest> {
    use_coroutine(move |mut rx: UnboundedReceiver<ChatRequest>| {
        let gateway = gateway.clone();
        let mut session = session;
        async move {
            while let Some(request) = rx.next().await {
                let outcome = request.send(&*gateway).await;
                session.with_mut(|s| s.finish_send(request.exchange_id, outcome));
            }
        }
    })
}

#[component]
pub fn ChatPanel(session: Signal<ConversationSession>) -> Element {
    let worker = use_coroutine_handle::<ChatRequest>();
    let mut draft = use_signal(String::new);

    let mut submit = move || {
        let content = draft();
        let mut session = session;
        if let Some(request) = session.with_mut(|s| s.begin_send(&content)) {
            draft.set(String::new());
            worker.send(request);
        }
    };

    let snapshot = session.read();
    let available = snapshot.is_available();
    let in_flight = snapshot.is_in_flight();
    let messages = snapshot.messages().to_vec();
    drop(snapshot);

    if !available {
        return rsx! {};
    }

    rsx! {
        section { class: "narrator-card chat",
            div { class: "narrator-card__header",
                h2 { {t!("chat-title")} }
            }

            div { class: "chat__log",
                if messages.is_empty() {
                    p { class: "narrator-card__placeholder", {t!("chat-empty")} }
                }
                for (idx, message) in messages.into_iter().enumerate() {
                    div {
                        key: "{idx}",
                        class: match message.role {
                            Role::User => "chat__message chat__message--user",
                            Role::Assistant => "chat__message chat__message--assistant",
                        },
                        "{message.content}"
                    }
                }
                if in_flight {
                    div { class: "chat__message chat__message--pending", {t!("chat-thinking")} }
                }
            }

            form {
                class: "chat__composer",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    submit();
                },
                input {
                    r#type: "text",
                    class: "chat__input",
                    placeholder: t!("chat-placeholder"),
                    value: "{draft}",
                    disabled: in_flight,
                    oninput: move |evt: FormEvent| draft.set(evt.value()),
                }
                button {
                    r#type: "submit",
                    class: "button button--primary",
                    disabled: in_flight,
                    {t!("chat-send")}
                }
            }
        }
    }
}
