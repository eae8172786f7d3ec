mod orchestrator;
mod runtime;
mod shutdown;
mod startup;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use orchestrator::{Components, GifcamOrchestrator};
pub use state::{Mode, SystemState};
pub use types::{ShutdownHandle, ShutdownReason, TickOutcome};
