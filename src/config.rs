use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GifcamConfig {
    pub camera: CameraConfig,
    pub capture: CaptureConfig,
    pub upload: UploadConfig,
    pub network: NetworkConfig,
    pub gpio: GpioConfig,
    pub control: ControlConfig,
    pub feedback: FeedbackConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CameraConfig {
    /// Frame source implementation
    #[serde(default = "default_camera_backend")]
    pub backend: CameraBackend,

    /// Still resolution (width, height)
    #[serde(default = "default_camera_resolution")]
    pub resolution: (u32, u32),

    /// Rotation applied to every still
    #[serde(default = "default_camera_rotation")]
    pub rotation: Option<Rotation>,

    /// JPEG quality for stills (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Executable used by the still-command backend
    #[serde(default = "default_still_command")]
    pub still_command: String,

    /// Upper bound on a single frame grab
    #[serde(default = "default_frame_timeout_ms")]
    pub frame_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CaptureConfig {
    /// Number of stills per session
    #[serde(default = "default_frame_count")]
    pub frame_count: u32,

    /// Playback delay between animation frames
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: u32,

    /// Append the reversed sequence for a ping-pong loop
    #[serde(default = "default_rebound")]
    pub rebound: bool,

    /// Where finished artifacts are written
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Scratch directory for transient frames
    #[serde(default = "default_work_dir")]
    pub work_dir: String,

    #[serde(default = "default_assembler")]
    pub assembler: AssemblerKind,

    #[serde(default = "default_graphicsmagick_command")]
    pub graphicsmagick_command: String,

    /// Write a JSON sidecar per session
    #[serde(default = "default_save_metadata")]
    pub save_metadata: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    /// Dropbox access token
    #[serde(default)]
    pub access_token: String,

    /// Remote folder artifacts are uploaded into
    #[serde(default = "default_remote_folder")]
    pub remote_folder: String,

    #[serde(default = "default_upload_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NetworkConfig {
    /// Well-known host:port used as the reachability target
    #[serde(default = "default_probe_address")]
    pub probe_address: String,

    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Minimum spacing between probes
    #[serde(default = "default_check_interval_seconds")]
    pub check_interval_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GpioConfig {
    #[serde(default = "default_shutter_pin")]
    pub shutter_pin: u8,
    #[serde(default = "default_upload_pin")]
    pub upload_pin: u8,
    #[serde(default = "default_busy_led_pin")]
    pub busy_led_pin: u8,
    #[serde(default = "default_ready_led_pin")]
    pub ready_led_pin: u8,
    #[serde(default = "default_connectivity_led_pin")]
    pub connectivity_led_pin: u8,
    #[serde(default = "default_upload_led_pin")]
    pub upload_led_pin: u8,
    #[serde(default = "default_busy_pulse_hz")]
    pub busy_pulse_hz: f64,
    #[serde(default = "default_ready_pulse_hz")]
    pub ready_pulse_hz: f64,
    #[serde(default = "default_upload_pulse_hz")]
    pub upload_pulse_hz: f64,
    /// PWM frequency used for steady partial intensity
    #[serde(default = "default_dim_frequency_hz")]
    pub dim_frequency_hz: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ControlConfig {
    /// Idle sleep between loop iterations
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Minimum spacing between two accepted presses
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_shutter_trigger")]
    pub shutter_trigger: TriggerMode,

    #[serde(default = "default_upload_trigger")]
    pub upload_trigger: TriggerMode,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FeedbackConfig {
    #[serde(default = "default_short_blink_ms")]
    pub short_blink_ms: u64,
    #[serde(default = "default_long_blink_ms")]
    pub long_blink_ms: u64,
    /// How long the ready indicator stays raised after a completed capture
    #[serde(default = "default_capture_ack_ms")]
    pub capture_ack_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_file_prefix")]
    pub file_prefix: String,
    /// Rotated files kept on disk
    #[serde(default = "default_log_max_files")]
    pub max_files: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Rotation {
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::Rotate90 => 90,
            Rotation::Rotate180 => 180,
            Rotation::Rotate270 => 270,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CameraBackend {
    Gstreamer,
    StillCommand,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssemblerKind {
    Native,
    Graphicsmagick,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Fires once per press
    Edge,
    /// Fires on every poll while held
    Level,
}

/// Configuration file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "gifcam.toml";

impl GifcamConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            // Start with default values
            .set_default("camera.backend", "gstreamer")?
            .set_default(
                "camera.resolution",
                vec![default_camera_resolution().0, default_camera_resolution().1],
            )?
            .set_default("camera.rotation", "Rotate90")?
            .set_default("camera.jpeg_quality", default_jpeg_quality() as i64)?
            .set_default("camera.still_command", default_still_command())?
            .set_default("camera.frame_timeout_ms", default_frame_timeout_ms())?
            .set_default("capture.frame_count", default_frame_count())?
            .set_default("capture.frame_delay_ms", default_frame_delay_ms())?
            .set_default("capture.rebound", default_rebound())?
            .set_default("capture.output_dir", default_output_dir())?
            .set_default("capture.work_dir", default_work_dir())?
            .set_default("capture.assembler", "native")?
            .set_default(
                "capture.graphicsmagick_command",
                default_graphicsmagick_command(),
            )?
            .set_default("capture.save_metadata", default_save_metadata())?
            .set_default("upload.access_token", "")?
            .set_default("upload.remote_folder", default_remote_folder())?
            .set_default("upload.endpoint", default_upload_endpoint())?
            .set_default(
                "upload.request_timeout_seconds",
                default_request_timeout_seconds(),
            )?
            .set_default("network.probe_address", default_probe_address())?
            .set_default("network.probe_timeout_ms", default_probe_timeout_ms())?
            .set_default(
                "network.check_interval_seconds",
                default_check_interval_seconds(),
            )?
            .set_default("gpio.shutter_pin", default_shutter_pin() as i64)?
            .set_default("gpio.upload_pin", default_upload_pin() as i64)?
            .set_default("gpio.busy_led_pin", default_busy_led_pin() as i64)?
            .set_default("gpio.ready_led_pin", default_ready_led_pin() as i64)?
            .set_default(
                "gpio.connectivity_led_pin",
                default_connectivity_led_pin() as i64,
            )?
            .set_default("gpio.upload_led_pin", default_upload_led_pin() as i64)?
            .set_default("gpio.busy_pulse_hz", default_busy_pulse_hz())?
            .set_default("gpio.ready_pulse_hz", default_ready_pulse_hz())?
            .set_default("gpio.upload_pulse_hz", default_upload_pulse_hz())?
            .set_default("gpio.dim_frequency_hz", default_dim_frequency_hz())?
            .set_default("control.tick_interval_ms", default_tick_interval_ms())?
            .set_default("control.debounce_ms", default_debounce_ms())?
            .set_default("control.shutter_trigger", "edge")?
            .set_default("control.upload_trigger", "level")?
            .set_default("feedback.short_blink_ms", default_short_blink_ms())?
            .set_default("feedback.long_blink_ms", default_long_blink_ms())?
            .set_default("feedback.capture_ack_ms", default_capture_ack_ms())?
            .set_default("logging.directory", default_log_directory())?
            .set_default("logging.file_prefix", default_log_file_prefix())?
            .set_default("logging.max_files", default_log_max_files() as i64)?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // GIFCAM_CAPTURE__FRAME_COUNT=12 style overrides
            .add_source(
                Environment::with_prefix("GIFCAM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: GifcamConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.camera.resolution.0 == 0 || self.camera.resolution.1 == 0 {
            return Err(ConfigError::Message(
                "Camera resolution must be greater than 0".to_string(),
            ));
        }

        if self.camera.jpeg_quality == 0 || self.camera.jpeg_quality > 100 {
            return Err(ConfigError::Message(
                "Camera jpeg_quality must be between 1 and 100".to_string(),
            ));
        }

        if self.capture.frame_count == 0 {
            return Err(ConfigError::Message(
                "Capture frame_count must be at least 1".to_string(),
            ));
        }

        if self.capture.output_dir.is_empty() || self.capture.work_dir.is_empty() {
            return Err(ConfigError::Message(
                "Capture output_dir and work_dir must be set".to_string(),
            ));
        }

        if self.capture.output_dir == self.capture.work_dir {
            return Err(ConfigError::Message(
                "Capture work_dir must differ from output_dir".to_string(),
            ));
        }

        if self.network.probe_timeout_ms == 0 || self.network.probe_timeout_ms > 2000 {
            return Err(ConfigError::Message(
                "Network probe_timeout_ms must be between 1 and 2000".to_string(),
            ));
        }

        if self.network.check_interval_seconds == 0 {
            return Err(ConfigError::Message(
                "Network check_interval_seconds must be greater than 0".to_string(),
            ));
        }

        if self.control.tick_interval_ms == 0 {
            return Err(ConfigError::Message(
                "Control tick_interval_ms must be greater than 0".to_string(),
            ));
        }

        let frequencies = [
            self.gpio.busy_pulse_hz,
            self.gpio.ready_pulse_hz,
            self.gpio.upload_pulse_hz,
            self.gpio.dim_frequency_hz,
        ];
        if frequencies.iter().any(|hz| *hz <= 0.0) {
            return Err(ConfigError::Message(
                "GPIO PWM frequencies must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for GifcamConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig {
                backend: default_camera_backend(),
                resolution: default_camera_resolution(),
                rotation: default_camera_rotation(),
                jpeg_quality: default_jpeg_quality(),
                still_command: default_still_command(),
                frame_timeout_ms: default_frame_timeout_ms(),
            },
            capture: CaptureConfig {
                frame_count: default_frame_count(),
                frame_delay_ms: default_frame_delay_ms(),
                rebound: default_rebound(),
                output_dir: default_output_dir(),
                work_dir: default_work_dir(),
                assembler: default_assembler(),
                graphicsmagick_command: default_graphicsmagick_command(),
                save_metadata: default_save_metadata(),
            },
            upload: UploadConfig {
                access_token: String::new(),
                remote_folder: default_remote_folder(),
                endpoint: default_upload_endpoint(),
                request_timeout_seconds: default_request_timeout_seconds(),
            },
            network: NetworkConfig {
                probe_address: default_probe_address(),
                probe_timeout_ms: default_probe_timeout_ms(),
                check_interval_seconds: default_check_interval_seconds(),
            },
            gpio: GpioConfig {
                shutter_pin: default_shutter_pin(),
                upload_pin: default_upload_pin(),
                busy_led_pin: default_busy_led_pin(),
                ready_led_pin: default_ready_led_pin(),
                connectivity_led_pin: default_connectivity_led_pin(),
                upload_led_pin: default_upload_led_pin(),
                busy_pulse_hz: default_busy_pulse_hz(),
                ready_pulse_hz: default_ready_pulse_hz(),
                upload_pulse_hz: default_upload_pulse_hz(),
                dim_frequency_hz: default_dim_frequency_hz(),
            },
            control: ControlConfig {
                tick_interval_ms: default_tick_interval_ms(),
                debounce_ms: default_debounce_ms(),
                shutter_trigger: default_shutter_trigger(),
                upload_trigger: default_upload_trigger(),
            },
            feedback: FeedbackConfig {
                short_blink_ms: default_short_blink_ms(),
                long_blink_ms: default_long_blink_ms(),
                capture_ack_ms: default_capture_ack_ms(),
            },
            logging: LoggingConfig {
                directory: default_log_directory(),
                file_prefix: default_log_file_prefix(),
                max_files: default_log_max_files(),
            },
        }
    }
}

// Default value functions
fn default_camera_backend() -> CameraBackend {
    CameraBackend::Gstreamer
}
fn default_camera_resolution() -> (u32, u32) {
    (540, 405)
}
fn default_camera_rotation() -> Option<Rotation> {
    Some(Rotation::Rotate90)
}
fn default_jpeg_quality() -> u8 {
    85
}
fn default_still_command() -> String {
    "rpicam-still".to_string()
}
fn default_frame_timeout_ms() -> u64 {
    5000
}

fn default_frame_count() -> u32 {
    10
}
fn default_frame_delay_ms() -> u32 {
    50
}
fn default_rebound() -> bool {
    false
}
fn default_output_dir() -> String {
    "/home/pi/gifcam/gifs".to_string()
}
fn default_work_dir() -> String {
    "/tmp/gifcam".to_string()
}
fn default_assembler() -> AssemblerKind {
    AssemblerKind::Native
}
fn default_graphicsmagick_command() -> String {
    "gm".to_string()
}
fn default_save_metadata() -> bool {
    false
}

fn default_remote_folder() -> String {
    "/gifcam".to_string()
}
fn default_upload_endpoint() -> String {
    "https://content.dropboxapi.com/2/files/upload".to_string()
}
fn default_request_timeout_seconds() -> u64 {
    120
}

fn default_probe_address() -> String {
    "1.1.1.1:53".to_string()
}
fn default_probe_timeout_ms() -> u64 {
    2000
}
fn default_check_interval_seconds() -> u64 {
    10
}

fn default_shutter_pin() -> u8 {
    19
}
fn default_upload_pin() -> u8 {
    17
}
fn default_busy_led_pin() -> u8 {
    12
}
fn default_ready_led_pin() -> u8 {
    21
}
fn default_connectivity_led_pin() -> u8 {
    16
}
fn default_upload_led_pin() -> u8 {
    26
}
fn default_busy_pulse_hz() -> f64 {
    10.0
}
fn default_ready_pulse_hz() -> f64 {
    2.0
}
fn default_upload_pulse_hz() -> f64 {
    10.0
}
fn default_dim_frequency_hz() -> f64 {
    200.0
}

fn default_tick_interval_ms() -> u64 {
    50
}
fn default_debounce_ms() -> u64 {
    50
}
fn default_shutter_trigger() -> TriggerMode {
    TriggerMode::Edge
}
fn default_upload_trigger() -> TriggerMode {
    TriggerMode::Level
}

fn default_short_blink_ms() -> u64 {
    200
}
fn default_long_blink_ms() -> u64 {
    600
}
fn default_capture_ack_ms() -> u64 {
    500
}

fn default_log_directory() -> String {
    "/home/pi/gifcam/logs".to_string()
}
fn default_log_file_prefix() -> String {
    "gifcam.log".to_string()
}
fn default_log_max_files() -> usize {
    3
}
