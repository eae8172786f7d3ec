use super::orchestrator::{Components, GifcamOrchestrator};
use crate::camera::build_frame_source;
use crate::capture::build_assembler;
use crate::config::{GifcamConfig, GpioConfig};
use crate::connectivity::TcpProbe;
use crate::controls::ControlInput;
use crate::error::{GifcamError, Result};
use crate::feedback::{FeedbackState, Indicators};
use crate::upload::DropboxUploader;
use tracing::{error, info, warn};

type GpioDevices = (Indicators, Box<dyn ControlInput>, Box<dyn ControlInput>);

#[cfg(all(target_os = "linux", feature = "gpio"))]
fn open_gpio(config: &GpioConfig) -> Result<GpioDevices> {
    use crate::controls::GpioButton;
    use crate::feedback::GpioIndicator;
    use rppal::gpio::Gpio;

    let gpio = Gpio::new()
        .map_err(|e| GifcamError::component("gpio", &format!("Failed to open GPIO: {}", e)))?;
    let dim = config.dim_frequency_hz;

    let indicators = Indicators {
        busy: Box::new(GpioIndicator::new(
            &gpio,
            "busy",
            config.busy_led_pin,
            config.busy_pulse_hz,
            dim,
        )?),
        ready: Box::new(GpioIndicator::new(
            &gpio,
            "ready",
            config.ready_led_pin,
            config.ready_pulse_hz,
            dim,
        )?),
        connectivity: Box::new(GpioIndicator::new(
            &gpio,
            "connectivity",
            config.connectivity_led_pin,
            config.ready_pulse_hz,
            dim,
        )?),
        upload: Box::new(GpioIndicator::new(
            &gpio,
            "upload",
            config.upload_led_pin,
            config.upload_pulse_hz,
            dim,
        )?),
    };

    let shutter = Box::new(GpioButton::new(&gpio, "shutter", config.shutter_pin)?);
    let upload = Box::new(GpioButton::new(&gpio, "upload", config.upload_pin)?);

    Ok((indicators, shutter, upload))
}

#[cfg(not(all(target_os = "linux", feature = "gpio")))]
fn open_gpio(_config: &GpioConfig) -> Result<GpioDevices> {
    Err(GifcamError::system(
        "Buttons and LEDs need the `gpio` feature on Linux",
    ))
}

impl GifcamOrchestrator {
    /// Open the hardware described by `config` and build the orchestrator
    pub async fn new(config: GifcamConfig) -> Result<Self> {
        config.validate()?;

        let camera = build_frame_source(&config.camera)?;
        let assembler = build_assembler(&config.capture);
        let uploader = Box::new(DropboxUploader::new(&config.upload)?);
        let probe = Box::new(TcpProbe::from_config(&config.network));
        let (indicators, shutter, upload_button) = open_gpio(&config.gpio)?;

        if config.upload.access_token.is_empty() {
            warn!("No upload access token configured; uploads will fail");
        }

        Ok(Self::from_components(
            config,
            Components {
                camera,
                assembler,
                uploader,
                probe,
                indicators,
                shutter,
                upload_button,
            },
        ))
    }

    /// Start the camera and show the ready pattern
    pub async fn start(&mut self) -> Result<()> {
        info!("Starting gifcam system");

        self.sequencer.start().await.map_err(|e| {
            error!("Failed to start camera: {}", e);
            e
        })?;

        self.feedback.enter(FeedbackState::Ready);
        self.feedback.show_connectivity(false);

        info!("System up and ready");
        Ok(())
    }
}
