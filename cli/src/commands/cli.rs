use catpoint_core::api::{ArmingStatus, SensorType};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catpoint", version, about = "Catpoint home security console")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Load configuration from this file instead of the default locations.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep state in memory only; nothing is read from or written to disk.
    #[arg(long, global = true, default_value_t = false)]
    pub ephemeral: bool,
}

/// Parser for one line typed into the interactive shell.
#[derive(Parser, Debug)]
#[command(name = "catpoint", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmMode {
    Home,
    Away,
}

impl From<ArmMode> for ArmingStatus {
    fn from(mode: ArmMode) -> Self {
        match mode {
            ArmMode::Home => ArmingStatus::ArmedHome,
            ArmMode::Away => ArmingStatus::ArmedAway,
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Door,
    Window,
    Motion,
}

impl From<SensorKind> for SensorType {
    fn from(kind: SensorKind) -> Self {
        match kind {
            SensorKind::Door => SensorType::Door,
            SensorKind::Window => SensorType::Window,
            SensorKind::Motion => SensorType::Motion,
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ArmArgs {
    #[arg(value_enum)]
    pub mode: ArmMode,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SensorAddArgs {
    pub name: String,

    #[arg(long = "type", value_enum)]
    pub sensor_type: SensorKind,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SensorRef {
    /// Sensor id, or its exact name.
    pub sensor: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ScanArgs {
    /// Camera image to classify. Without a path the frame counts as missing.
    pub path: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SensorCommand {
    Add(SensorAddArgs),
    Remove(SensorRef),
    Activate(SensorRef),
    Deactivate(SensorRef),
    List,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show arming status, alarm status and sensors.
    Status,
    Arm(ArmArgs),
    Disarm,
    #[command(subcommand)]
    Sensor(SensorCommand),
    /// Classify a camera frame.
    Scan(ScanArgs),
    /// Read commands from stdin against one long-lived engine.
    Shell,
}
