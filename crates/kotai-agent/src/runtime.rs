use kotai_voice::{AgentRuntime, AgentSpec, VoiceError};
use std::io::Write;
use tracing::info;

/// Hands the session plan to the agent runtime as pretty-printed JSON.
#[derive(Debug)]
pub struct JsonPlanRuntime<W> {
    writer: W,
}

impl<W: Write> JsonPlanRuntime<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> AgentRuntime for JsonPlanRuntime<W> {
    fn start(&mut self, spec: AgentSpec) -> Result<(), VoiceError> {
        serde_json::to_writer_pretty(&mut self.writer, &spec)
            .map_err(|e| VoiceError::Runtime(format!("failed to encode session plan: {e}")))?;
        writeln!(self.writer)
            .and_then(|()| self.writer.flush())
            .map_err(|e| VoiceError::Runtime(format!("failed to write session plan: {e}")))?;

        info!(
            room = spec.room.as_ref().map(|r| r.room.as_str()).unwrap_or("<none>"),
            instructions_len = spec.instructions.len(),
            "session plan handed to agent runtime"
        );
        Ok(())
    }
}
