//! Upload → analyze → generate state machine.
//!
//! The machine is synchronous. A trigger (`begin_analyze`, `begin_generate`)
//! validates the current state and hands back a request; the caller awaits the
//! gateway and feeds the settlement to the matching `finish_*`. Every request
//! carries the `run_id` current when it was issued, so a response that settles
//! after the user picked another file is discarded instead of landing on the
//! new run.

use std::fmt;
use std::rc::Rc;

use api::{AnalyzeResponse, GatewayError, Plot, Stats, UploadFile};
use dioxus::logger::tracing::{debug, warn};
use serde_json::{Map, Value};

use crate::report::assemble;

pub const ANALYZE_FALLBACK_MESSAGE: &str = "Upload failed";
pub const GENERATE_FALLBACK_MESSAGE: &str = "Generation failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Uploading,
    Analyzed,
    Generating,
    Done,
    Failed,
}

impl PipelineState {
    pub fn is_busy(self) -> bool {
        matches!(self, PipelineState::Uploading | PipelineState::Generating)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Uploading => "uploading",
            PipelineState::Analyzed => "analyzed",
            PipelineState::Generating => "generating",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        }
    }
}

/// Everything one successful analyze call produced. Set all at once.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub stats: Rc<Stats>,
    pub plots: Vec<Plot>,
    pub report_type: String,
    pub preview: Vec<Map<String, Value>>,
}

impl From<AnalyzeResponse> for Analysis {
    fn from(response: AnalyzeResponse) -> Self {
        Self {
            stats: Rc::new(response.stats),
            plots: response.plots,
            report_type: response.report_type,
            preview: response.preview,
        }
    }
}

/// A generated narrative together with its assembled document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    /// Markdown exactly as the model returned it.
    pub markdown: String,
    /// `markdown` with the chart images merged in. Display only; never re-assembled.
    pub document: String,
}

impl Narrative {
    fn assemble(markdown: String, plots: &[Plot]) -> Self {
        let document = assemble::assemble(&markdown, plots);
        Self { markdown, document }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Analyze(String),
    Generate(String),
}

impl PipelineError {
    pub fn message(&self) -> &str {
        match self {
            PipelineError::Analyze(message) | PipelineError::Generate(message) => message,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Why a trigger was refused. The machine is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoFile,
    NoStats,
    Busy,
    NotAllowed(PipelineState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub run_id: u64,
    pub file: UploadFile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub run_id: u64,
    pub stats: Rc<Stats>,
    pub instruction: String,
}

/// Result of feeding a gateway response back into the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Applied(PipelineState),
    Stale,
}

#[derive(Debug, Clone, PartialEq, Default)]
enum Stage {
    #[default]
    Idle,
    Uploading,
    Analyzed {
        analysis: Analysis,
    },
    Generating {
        analysis: Analysis,
        previous: Option<Narrative>,
    },
    Done {
        analysis: Analysis,
        narrative: Narrative,
    },
    Failed {
        error: PipelineError,
        analysis: Option<Analysis>,
        narrative: Option<Narrative>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct PipelineStateMachine {
    file: Option<UploadFile>,
    stage: Stage,
    instruction: String,
    run_id: u64,
    reached_done: bool,
}

impl PipelineStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PipelineState {
        match &self.stage {
            Stage::Idle => PipelineState::Idle,
            Stage::Uploading => PipelineState::Uploading,
            Stage::Analyzed { .. } => PipelineState::Analyzed,
            Stage::Generating { .. } => PipelineState::Generating,
            Stage::Done { .. } => PipelineState::Done,
            Stage::Failed { .. } => PipelineState::Failed,
        }
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn set_instruction(&mut self, instruction: impl Into<String>) {
        self.instruction = instruction.into();
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        match &self.stage {
            Stage::Idle | Stage::Uploading => None,
            Stage::Analyzed { analysis }
            | Stage::Generating { analysis, .. }
            | Stage::Done { analysis, .. } => Some(analysis),
            Stage::Failed { analysis, .. } => analysis.as_ref(),
        }
    }

    pub fn stats(&self) -> Option<Rc<Stats>> {
        self.analysis().map(|analysis| Rc::clone(&analysis.stats))
    }

    pub fn plots(&self) -> &[Plot] {
        self.analysis()
            .map(|analysis| analysis.plots.as_slice())
            .unwrap_or(&[])
    }

    /// Latest narrative, including one retained across a failed regeneration.
    pub fn narrative(&self) -> Option<&Narrative> {
        match &self.stage {
            Stage::Done { narrative, .. } => Some(narrative),
            Stage::Generating { previous, .. } => previous.as_ref(),
            Stage::Failed { narrative, .. } => narrative.as_ref(),
            _ => None,
        }
    }

    /// The assembled report, shown only once generation has finished.
    pub fn report_document(&self) -> Option<&str> {
        match &self.stage {
            Stage::Done { narrative, .. } => Some(narrative.document.as_str()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match &self.stage {
            Stage::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state().is_busy()
    }

    pub fn can_analyze(&self) -> bool {
        self.file.is_some() && matches!(self.stage, Stage::Idle | Stage::Failed { .. })
    }

    pub fn can_generate(&self) -> bool {
        !self.is_busy() && self.analysis().is_some()
    }

    /// Stats handle for the conversation, once this analysis produced a report.
    pub fn chat_stats(&self) -> Option<Rc<Stats>> {
        if self.reached_done {
            self.stats()
        } else {
            None
        }
    }

    /// A fresh selection always resets to `Idle`; nothing from the previous
    /// file survives, and responses still in flight for it become stale.
    pub fn select_file(&mut self, file: UploadFile) {
        debug!(file = %file.name, from = self.state().as_str(), "file selected");
        self.file = Some(file);
        self.stage = Stage::Idle;
        self.reached_done = false;
        self.run_id = self.run_id.wrapping_add(1);
    }

    pub fn begin_analyze(&mut self) -> Result<AnalyzeRequest, Rejection> {
        let state = self.state();
        if state.is_busy() {
            return Err(self.reject("analyze", Rejection::Busy));
        }
        if !matches!(state, PipelineState::Idle | PipelineState::Failed) {
            return Err(self.reject("analyze", Rejection::NotAllowed(state)));
        }
        let Some(file) = self.file.clone() else {
            return Err(self.reject("analyze", Rejection::NoFile));
        };

        self.run_id = self.run_id.wrapping_add(1);
        self.stage = Stage::Uploading;
        self.reached_done = false;
        debug!(run_id = self.run_id, file = %file.name, "analyze started");

        Ok(AnalyzeRequest {
            run_id: self.run_id,
            file,
        })
    }

    pub fn finish_analyze(
        &mut self,
        run_id: u64,
        outcome: Result<AnalyzeResponse, GatewayError>,
    ) -> Settlement {
        if run_id != self.run_id || !matches!(self.stage, Stage::Uploading) {
            warn!(run_id, current = self.run_id, "discarding stale analyze response");
            return Settlement::Stale;
        }

        self.stage = match outcome {
            Ok(response) => Stage::Analyzed {
                analysis: Analysis::from(response),
            },
            Err(err) => {
                warn!(run_id, error = %err, "analyze failed");
                Stage::Failed {
                    error: PipelineError::Analyze(err.user_message(ANALYZE_FALLBACK_MESSAGE)),
                    analysis: None,
                    narrative: None,
                }
            }
        };
        debug!(run_id, state = self.state().as_str(), "analyze settled");
        Settlement::Applied(self.state())
    }

    pub fn begin_generate(&mut self) -> Result<GenerateRequest, Rejection> {
        let state = self.state();
        if state.is_busy() {
            return Err(self.reject("generate", Rejection::Busy));
        }

        let (analysis, previous) = match std::mem::take(&mut self.stage) {
            Stage::Analyzed { analysis } => (analysis, None),
            Stage::Done {
                analysis,
                narrative,
            } => (analysis, Some(narrative)),
            Stage::Failed {
                analysis: Some(analysis),
                narrative,
                ..
            } => (analysis, narrative),
            other => {
                self.stage = other;
                let rejection = if state == PipelineState::Failed {
                    Rejection::NoStats
                } else {
                    Rejection::NotAllowed(state)
                };
                return Err(self.reject("generate", rejection));
            }
        };

        self.run_id = self.run_id.wrapping_add(1);
        let request = GenerateRequest {
            run_id: self.run_id,
            stats: Rc::clone(&analysis.stats),
            instruction: self.instruction.clone(),
        };
        self.stage = Stage::Generating { analysis, previous };
        debug!(run_id = self.run_id, from = state.as_str(), "generate started");

        Ok(request)
    }

    pub fn finish_generate(
        &mut self,
        run_id: u64,
        outcome: Result<String, GatewayError>,
    ) -> Settlement {
        if run_id != self.run_id || !matches!(self.stage, Stage::Generating { .. }) {
            warn!(run_id, current = self.run_id, "discarding stale generate response");
            return Settlement::Stale;
        }

        let Stage::Generating { analysis, previous } = std::mem::take(&mut self.stage) else {
            return Settlement::Stale;
        };

        self.stage = match outcome {
            Ok(markdown) => {
                let narrative = Narrative::assemble(markdown, &analysis.plots);
                self.reached_done = true;
                Stage::Done {
                    analysis,
                    narrative,
                }
            }
            Err(err) => {
                warn!(run_id, error = %err, "generate failed");
                Stage::Failed {
                    error: PipelineError::Generate(err.user_message(GENERATE_FALLBACK_MESSAGE)),
                    analysis: Some(analysis),
                    narrative: previous,
                }
            }
        };
        debug!(run_id, state = self.state().as_str(), "generate settled");
        Settlement::Applied(self.state())
    }

    fn reject(&self, trigger: &str, rejection: Rejection) -> Rejection {
        debug!(trigger, state = self.state().as_str(), ?rejection, "trigger rejected");
        rejection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{BasicInfo, PlotKind};

    fn file(name: &str) -> UploadFile {
        UploadFile::new(name, b"a,b\n1,2\n".to_vec())
    }

    fn response(rows: u64) -> AnalyzeResponse {
        AnalyzeResponse {
            stats: Stats {
                basic_info: BasicInfo {
                    row_count: rows,
                    column_names: vec!["a".into(), "b".into()],
                    ..BasicInfo::default()
                },
                ..Stats::default()
            },
            report_type: "General Performance Analysis".into(),
            plots: vec![Plot::new(PlotKind::Correlation, "Correlation Matrix", "heat.png")],
            preview: Vec::new(),
        }
    }

    fn analyzed() -> PipelineStateMachine {
        let mut machine = PipelineStateMachine::new();
        machine.select_file(file("sales.csv"));
        let request = machine.begin_analyze().unwrap();
        machine.finish_analyze(request.run_id, Ok(response(10)));
        machine
    }

    fn done(report: &str) -> PipelineStateMachine {
        let mut machine = analyzed();
        let request = machine.begin_generate().unwrap();
        machine.finish_generate(request.run_id, Ok(report.to_string()));
        machine
    }

    #[test]
    fn starts_idle_and_needs_a_file() {
        let mut machine = PipelineStateMachine::new();
        assert_eq!(machine.state(), PipelineState::Idle);
        assert_eq!(machine.begin_analyze(), Err(Rejection::NoFile));
        assert_eq!(machine.state(), PipelineState::Idle);
    }

    #[test]
    fn successful_analyze_stores_everything_together() {
        let mut machine = PipelineStateMachine::new();
        machine.select_file(file("sales.csv"));
        let request = machine.begin_analyze().unwrap();
        assert_eq!(machine.state(), PipelineState::Uploading);
        assert_eq!(request.file.name, "sales.csv");
        assert!(machine.analysis().is_none());

        let settled = machine.finish_analyze(request.run_id, Ok(response(42)));
        assert_eq!(settled, Settlement::Applied(PipelineState::Analyzed));
        let analysis = machine.analysis().unwrap();
        assert_eq!(analysis.stats.basic_info.row_count, 42);
        assert_eq!(analysis.plots.len(), 1);
        assert_eq!(analysis.report_type, "General Performance Analysis");
        assert!(machine.chat_stats().is_none());
    }

    #[test]
    fn failed_analyze_stores_no_data_and_prefers_backend_message() {
        let mut machine = PipelineStateMachine::new();
        machine.select_file(file("broken.csv"));
        let request = machine.begin_analyze().unwrap();
        machine.finish_analyze(
            request.run_id,
            Err(GatewayError::Backend("File is empty.".into())),
        );
        assert_eq!(machine.state(), PipelineState::Failed);
        assert!(machine.analysis().is_none());
        assert_eq!(
            machine.error(),
            Some(&PipelineError::Analyze("File is empty.".into()))
        );

        let retry = machine.begin_analyze().unwrap();
        assert_eq!(machine.state(), PipelineState::Uploading);
        assert!(machine.error().is_none());
        machine.finish_analyze(retry.run_id, Err(GatewayError::Transport("refused".into())));
        assert_eq!(machine.error().unwrap().message(), ANALYZE_FALLBACK_MESSAGE);
    }

    #[test]
    fn generate_assembles_the_report_once() {
        let machine = done("## 3. Correlation & Logic Analysis\nbody\n");
        assert_eq!(machine.state(), PipelineState::Done);
        let narrative = machine.narrative().unwrap();
        assert_eq!(narrative.markdown, "## 3. Correlation & Logic Analysis\nbody\n");
        assert_eq!(
            machine.report_document().unwrap(),
            "## 3. Correlation & Logic Analysis\n\n![Correlation Matrix](heat.png)\n\nbody\n"
        );
        assert!(machine.chat_stats().is_some());
    }

    #[test]
    fn generate_sends_instruction_and_stats() {
        let mut machine = analyzed();
        machine.set_instruction("Write for executives");
        let request = machine.begin_generate().unwrap();
        assert_eq!(request.instruction, "Write for executives");
        assert_eq!(request.stats.basic_info.row_count, 10);
        assert_eq!(machine.state(), PipelineState::Generating);
    }

    #[test]
    fn regeneration_replaces_narrative_but_keeps_data() {
        let mut machine = done("first");
        let stats_before = machine.stats().unwrap();
        let plots_before = machine.plots().to_vec();

        let request = machine.begin_generate().unwrap();
        assert_eq!(machine.narrative().unwrap().markdown, "first");
        machine.finish_generate(request.run_id, Ok("second".into()));

        assert_eq!(machine.narrative().unwrap().markdown, "second");
        assert!(Rc::ptr_eq(&stats_before, &machine.stats().unwrap()));
        assert_eq!(machine.plots(), plots_before.as_slice());
    }

    #[test]
    fn failed_regeneration_retains_stats_and_plots() {
        let mut machine = done("first");
        let stats_before = machine.stats().unwrap();
        let plots_before = machine.plots().to_vec();

        let request = machine.begin_generate().unwrap();
        machine.finish_generate(request.run_id, Err(GatewayError::Transport("timeout".into())));

        assert_eq!(machine.state(), PipelineState::Failed);
        assert_eq!(
            machine.error(),
            Some(&PipelineError::Generate(GENERATE_FALLBACK_MESSAGE.into()))
        );
        assert_eq!(*machine.stats().unwrap(), *stats_before);
        assert_eq!(machine.plots(), plots_before.as_slice());
        assert!(machine.report_document().is_none());
        assert!(machine.chat_stats().is_some());

        let retry = machine.begin_generate().unwrap();
        assert_eq!(machine.state(), PipelineState::Generating);
        assert!(machine.error().is_none());
        machine.finish_generate(retry.run_id, Ok("third".into()));
        assert_eq!(machine.narrative().unwrap().markdown, "third");
    }

    #[test]
    fn triggers_outside_the_table_are_rejected() {
        let mut machine = PipelineStateMachine::new();
        assert_eq!(
            machine.begin_generate(),
            Err(Rejection::NotAllowed(PipelineState::Idle))
        );

        machine.select_file(file("a.csv"));
        machine.begin_analyze().unwrap();
        assert_eq!(machine.begin_generate(), Err(Rejection::Busy));
        assert_eq!(machine.begin_analyze(), Err(Rejection::Busy));
        assert_eq!(machine.state(), PipelineState::Uploading);

        let mut analyzed = analyzed();
        assert_eq!(
            analyzed.begin_analyze(),
            Err(Rejection::NotAllowed(PipelineState::Analyzed))
        );
        analyzed.begin_generate().unwrap();
        assert_eq!(analyzed.begin_generate(), Err(Rejection::Busy));

        let mut finished = done("report");
        assert_eq!(
            finished.begin_analyze(),
            Err(Rejection::NotAllowed(PipelineState::Done))
        );
    }

    #[test]
    fn generate_retry_after_analyze_failure_has_no_stats() {
        let mut machine = PipelineStateMachine::new();
        machine.select_file(file("a.csv"));
        let request = machine.begin_analyze().unwrap();
        machine.finish_analyze(request.run_id, Err(GatewayError::Backend("bad".into())));
        assert_eq!(machine.begin_generate(), Err(Rejection::NoStats));
        assert_eq!(machine.state(), PipelineState::Failed);
    }

    #[test]
    fn settlements_without_a_pending_call_are_ignored() {
        let mut machine = analyzed();
        let run_id = machine.run_id();
        assert_eq!(
            machine.finish_generate(run_id, Ok("nobody asked".into())),
            Settlement::Stale
        );
        assert_eq!(
            machine.finish_analyze(run_id, Ok(response(1))),
            Settlement::Stale
        );
        assert_eq!(machine.state(), PipelineState::Analyzed);
    }

    #[test]
    fn selecting_a_file_resets_and_orphans_pending_calls() {
        let mut machine = done("report");
        let request = machine.begin_generate().unwrap();

        machine.select_file(file("other.csv"));
        assert_eq!(machine.state(), PipelineState::Idle);
        assert!(machine.analysis().is_none());
        assert!(machine.narrative().is_none());
        assert!(machine.chat_stats().is_none());

        assert_eq!(
            machine.finish_generate(request.run_id, Ok("late".into())),
            Settlement::Stale
        );
        assert_eq!(machine.state(), PipelineState::Idle);

        let upload = machine.begin_analyze().unwrap();
        machine.select_file(file("third.csv"));
        assert_eq!(
            machine.finish_analyze(upload.run_id, Ok(response(5))),
            Settlement::Stale
        );
        assert_eq!(machine.state(), PipelineState::Idle);
        assert_eq!(machine.file().unwrap().name, "third.csv");
    }
}
