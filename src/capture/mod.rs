mod assemble;
mod metadata;
pub mod mock;
mod sequencer;
mod session;
mod staging;

pub use assemble::{
    gif_delay_centiseconds, GraphicsMagickAssembler, ImageAssembler, NativeGifAssembler,
};
pub use metadata::CaptureMetadata;
pub use sequencer::CaptureSequencer;
pub use session::{generate_session_id, Artifact, CaptureSession, SESSION_ID_LEN};
pub use staging::FrameStage;

use crate::config::{AssemblerKind, CaptureConfig};

/// Pick the assembler named by `config.assembler`
pub fn build_assembler(config: &CaptureConfig) -> Box<dyn ImageAssembler> {
    match config.assembler {
        AssemblerKind::Native => Box::new(NativeGifAssembler::new()),
        AssemblerKind::Graphicsmagick => {
            Box::new(GraphicsMagickAssembler::new(&config.graphicsmagick_command))
        }
    }
}
