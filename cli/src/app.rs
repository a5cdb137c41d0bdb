//! Command dispatch and the interactive shell over one engine instance.

use crate::commands::cli::{Commands, SensorCommand, ShellLine};
use crate::listener::camera_header;
use crate::utils::split_line;
use catpoint_core::api::{AppConfig, ArmingStatus, CliError, SecurityService, Sensor};
use clap::{CommandFactory, Parser};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const PROMPT: &str = "catpoint> ";

pub fn premium_notice(max_sensors: usize) -> String {
    format!("To add more than {max_sensors} sensors, please subscribe to our Premium Membership!")
}

pub struct App {
    service: SecurityService,
    max_sensors: usize,
}

impl App {
    pub fn new(service: SecurityService, cfg: &AppConfig) -> Self {
        Self {
            service,
            max_sensors: cfg.ui.max_sensors,
        }
    }

    pub fn service(&self) -> &SecurityService {
        &self.service
    }

    #[tracing::instrument(name = "cli.execute", skip(self, out))]
    pub async fn execute<W: Write>(&self, cmd: Commands, out: &mut W) -> Result<(), CliError> {
        match cmd {
            Commands::Status => self.print_status(out).await?,
            Commands::Arm(arm) => {
                self.service
                    .set_arming_status(ArmingStatus::from(arm.mode))
                    .await;
                self.print_arming(out).await?;
            }
            Commands::Disarm => {
                self.service.set_arming_status(ArmingStatus::Disarmed).await;
                self.print_arming(out).await?;
            }
            Commands::Sensor(sensor_cmd) => self.execute_sensor(sensor_cmd, out).await?,
            Commands::Scan(scan) => {
                let image = match &scan.path {
                    Some(path) => Some(tokio::fs::read(path).await?),
                    None => None,
                };
                self.service.process_image(image.as_deref()).await;
                writeln!(out, "{}", camera_header(self.service.is_cat_detected().await))?;
            }
            Commands::Shell => {
                return Err(CliError::Command("already in the shell".to_string()));
            }
        }
        Ok(())
    }

    async fn execute_sensor<W: Write>(
        &self,
        cmd: SensorCommand,
        out: &mut W,
    ) -> Result<(), CliError> {
        match cmd {
            SensorCommand::Add(add) => {
                if self.service.sensors().await.len() >= self.max_sensors {
                    return Err(CliError::Command(premium_notice(self.max_sensors)));
                }
                let sensor = Sensor::new(add.name.trim(), add.sensor_type.into());
                if sensor.name().is_empty() {
                    return Err(CliError::Command("sensor name must not be empty".to_string()));
                }
                self.service.add_sensor(sensor.clone()).await;
                writeln!(out, "Added {} [{}]", sensor, sensor.sensor_id())?;
            }
            SensorCommand::Remove(r) => {
                let sensor = self.lookup(&r.sensor).await?;
                self.service.remove_sensor(&sensor).await;
                writeln!(out, "Removed {}", sensor.name())?;
            }
            SensorCommand::Activate(r) => {
                let mut sensor = self.lookup(&r.sensor).await?;
                self.service.change_sensor_activation(&mut sensor, true).await;
                writeln!(out, "{sensor}")?;
            }
            SensorCommand::Deactivate(r) => {
                let mut sensor = self.lookup(&r.sensor).await?;
                self.service
                    .change_sensor_activation(&mut sensor, false)
                    .await;
                writeln!(out, "{sensor}")?;
            }
            SensorCommand::List => self.print_sensors(out).await?,
        }
        Ok(())
    }

    async fn lookup(&self, key: &str) -> Result<Sensor, CliError> {
        self.service
            .find_sensor(key)
            .await
            .ok_or_else(|| CliError::Command(format!("unknown sensor: {key}")))
    }

    async fn print_arming<W: Write>(&self, out: &mut W) -> Result<(), CliError> {
        match self.service.arming_status().await {
            Some(s) => writeln!(out, "System status: {} ({})", s.description(), s)?,
            None => writeln!(out, "System status: unknown")?,
        }
        Ok(())
    }

    async fn print_status<W: Write>(&self, out: &mut W) -> Result<(), CliError> {
        self.print_arming(out).await?;
        match self.service.alarm_status().await {
            Some(s) => writeln!(out, "Alarm status: {} ({})", s.description(), s)?,
            None => writeln!(out, "Alarm status: unknown")?,
        }
        self.print_sensors(out).await
    }

    async fn print_sensors<W: Write>(&self, out: &mut W) -> Result<(), CliError> {
        let sensors = self.service.sensors().await;
        if sensors.is_empty() {
            writeln!(out, "No sensors")?;
        }
        for sensor in sensors {
            writeln!(out, "  {} [{}]", sensor, sensor.sensor_id())?;
        }
        Ok(())
    }

    /// Line-oriented loop; a failing command is reported and the loop goes on.
    pub async fn run_shell<R, W>(&self, input: R, out: &mut W) -> Result<(), CliError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;
            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };

            let words = match split_line(&line) {
                Ok(words) => words,
                Err(e) => {
                    writeln!(out, "error: {e}")?;
                    continue;
                }
            };
            match words.first().map(String::as_str) {
                None => continue,
                Some("quit") | Some("exit") => break,
                Some("help") if words.len() == 1 => {
                    writeln!(out, "{}", ShellLine::command().render_help())?;
                    writeln!(out, "Type `quit` or `exit` to leave.")?;
                    continue;
                }
                Some(_) => {}
            }

            let parsed = match ShellLine::try_parse_from(&words) {
                Ok(parsed) => parsed,
                Err(e) => {
                    write!(out, "{}", e.render())?;
                    continue;
                }
            };
            tracing::debug!(command = ?parsed.command, "shell command");
            if let Err(e) = self.execute(parsed.command, out).await {
                writeln!(out, "error: {e}")?;
            }
        }
        Ok(())
    }
}
