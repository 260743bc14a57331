mod engine;
pub use engine::{
    Analysis, AnalyzeRequest, GenerateRequest, Narrative, PipelineError, PipelineState,
    PipelineStateMachine, Rejection, Settlement, ANALYZE_FALLBACK_MESSAGE,
    GENERATE_FALLBACK_MESSAGE,
};

mod view;
pub(crate) use view::use_pipeline_worker;
pub use view::PipelineView;

use api::{AnalyzeResponse, BackendGateway, GatewayResult};

/// An accepted trigger, handed to the background worker for its network call.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineJob {
    Analyze(AnalyzeRequest),
    Generate(GenerateRequest),
}

/// A gateway response still tagged with the run that asked for it.
#[derive(Debug)]
pub enum PipelineOutcome {
    Analyze {
        run_id: u64,
        result: GatewayResult<AnalyzeResponse>,
    },
    Generate {
        run_id: u64,
        result: GatewayResult<String>,
    },
}

impl PipelineJob {
    pub async fn run<G>(self, gateway: &G) -> PipelineOutcome
    where
        G: BackendGateway + ?Sized,
    {
        match self {
            Self::Analyze(request) => PipelineOutcome::Analyze {
                run_id: request.run_id,
                result: gateway.analyze(&request.file).await,
            },
            Self::Generate(request) => PipelineOutcome::Generate {
                run_id: request.run_id,
                result: gateway
                    .generate(&request.stats, &request.instruction)
                    .await,
            },
        }
    }
}

impl PipelineOutcome {
    pub fn settle(self, machine: &mut PipelineStateMachine) -> Settlement {
        match self {
            Self::Analyze { run_id, result } => machine.finish_analyze(run_id, result),
            Self::Generate { run_id, result } => machine.finish_generate(run_id, result),
        }
    }
}
