//! In-memory gateway for driving the machines without a backend.

use std::cell::RefCell;
use std::collections::VecDeque;

use api::{AnalyzeResponse, BackendGateway, GatewayError, GatewayResult, Message, Stats, UploadFile};
use async_trait::async_trait;

#[derive(Default)]
pub(crate) struct FakeGateway {
    analyze: RefCell<VecDeque<GatewayResult<AnalyzeResponse>>>,
    generate: RefCell<VecDeque<GatewayResult<String>>>,
    chat: RefCell<VecDeque<GatewayResult<String>>>,
    uploads: RefCell<Vec<String>>,
    instructions: RefCell<Vec<String>>,
    histories: RefCell<Vec<Vec<Message>>>,
}

impl FakeGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_analyze(&self, outcome: GatewayResult<AnalyzeResponse>) {
        self.analyze.borrow_mut().push_back(outcome);
    }

    pub(crate) fn push_generate(&self, outcome: GatewayResult<String>) {
        self.generate.borrow_mut().push_back(outcome);
    }

    pub(crate) fn push_chat(&self, outcome: GatewayResult<String>) {
        self.chat.borrow_mut().push_back(outcome);
    }

    pub(crate) fn uploads(&self) -> Vec<String> {
        self.uploads.borrow().clone()
    }

    pub(crate) fn instructions(&self) -> Vec<String> {
        self.instructions.borrow().clone()
    }

    pub(crate) fn chat_histories(&self) -> Vec<Vec<Message>> {
        self.histories.borrow().clone()
    }
}

fn unscripted<T>() -> GatewayResult<T> {
    Err(GatewayError::Transport("no scripted response".into()))
}

#[async_trait(?Send)]
impl BackendGateway for FakeGateway {
    async fn analyze(&self, file: &UploadFile) -> GatewayResult<AnalyzeResponse> {
        self.uploads.borrow_mut().push(file.name.clone());
        self.analyze
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn generate(&self, _stats: &Stats, instruction: &str) -> GatewayResult<String> {
        self.instructions.borrow_mut().push(instruction.to_string());
        self.generate
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(unscripted)
    }

    async fn chat(&self, _stats: &Stats, history: &[Message]) -> GatewayResult<String> {
        self.histories.borrow_mut().push(history.to_vec());
        self.chat.borrow_mut().pop_front().unwrap_or_else(unscripted)
    }
}
