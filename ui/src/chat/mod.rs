mod session;
pub use session::{ChatRequest, ConversationSession, CHAT_FAILURE_MESSAGE};

mod view;
pub(crate) use view::use_chat_worker;
pub use view::ChatPanel;
