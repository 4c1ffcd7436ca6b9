//! Session start: render the prompt once and hand it to the agent runtime.

use crate::error::VoiceError;
use crate::pipeline::PipelineConfig;
use crate::room::RoomAccess;
use kotai_prompt::{Clock, InstructionStrategy, PromptAssembler, SystemClock};
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

/// Everything the agent runtime needs to run one conversation.
///
/// `instructions` is frozen for the whole session.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSpec {
    pub instructions: String,
    pub model_label: String,
    /// Speak first as soon as the agent enters the session.
    pub greet_on_enter: bool,
    pub pipeline: PipelineConfig,
    pub room: Option<RoomAccess>,
}

/// The external real-time agent runtime.
pub trait AgentRuntime {
    /// Starts a session. Called once per conversation.
    fn start(&mut self, spec: AgentSpec) -> Result<(), VoiceError>;
}

/// Builds an [`AgentSpec`] and starts the runtime with it.
#[derive(Debug, Clone)]
pub struct SessionConfigurator<C = SystemClock> {
    pipeline: PipelineConfig,
    assembler: PromptAssembler,
    clock: C,
    greet_on_enter: bool,
}

impl SessionConfigurator<SystemClock> {
    /// Uses the given assembler, the local clock and greets on enter.
    pub fn new(pipeline: PipelineConfig, assembler: PromptAssembler) -> Self {
        Self {
            pipeline,
            assembler,
            clock: SystemClock::local(),
            greet_on_enter: true,
        }
    }
}

impl<C: Clock> SessionConfigurator<C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> SessionConfigurator<C2> {
        SessionConfigurator {
            pipeline: self.pipeline,
            assembler: self.assembler,
            clock,
            greet_on_enter: self.greet_on_enter,
        }
    }

    pub fn with_greeting(mut self, greet_on_enter: bool) -> Self {
        self.greet_on_enter = greet_on_enter;
        self
    }

    /// Starts a session using the thread RNG.
    ///
    /// # Errors
    ///
    /// See [`start_with_rng`](Self::start_with_rng).
    pub fn start<R: AgentRuntime + ?Sized>(
        &self,
        strategy: &InstructionStrategy,
        room: Option<RoomAccess>,
        runtime: &mut R,
    ) -> Result<(), VoiceError> {
        self.start_with_rng(strategy, room, runtime, &mut rand::thread_rng())
    }

    /// Validates the pipeline, renders the prompt once and starts the runtime.
    ///
    /// The runtime is not called if anything before it fails.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::Config`] for an invalid pipeline,
    /// [`VoiceError::Prompt`] if the prompt cannot be composed, or whatever
    /// the runtime returns.
    pub fn start_with_rng<R, G>(
        &self,
        strategy: &InstructionStrategy,
        room: Option<RoomAccess>,
        runtime: &mut R,
        rng: &mut G,
    ) -> Result<(), VoiceError>
    where
        R: AgentRuntime + ?Sized,
        G: Rng + ?Sized,
    {
        self.pipeline.validate()?;

        let model_label = self.pipeline.llm.display_name.clone();
        let instructions = strategy.render_with(&self.assembler, &model_label, &self.clock, rng)?;

        if room.is_none() {
            warn!("no LiveKit room configured; the runtime must supply its own");
        }

        info!(
            strategy = strategy.kind(),
            model = %self.pipeline.llm.model,
            vad = ?self.pipeline.vad.model,
            turn_detection = ?self.pipeline.turn_detection.model,
            greet_on_enter = self.greet_on_enter,
            "starting agent session"
        );

        runtime.start(AgentSpec {
            instructions,
            model_label,
            greet_on_enter: self.greet_on_enter,
            pipeline: self.pipeline.clone(),
            room,
        })
    }
}
