use std::process::Command;

use anyhow::{bail, Context, Result};

use super::{LevelDisplay, OutputSink};

fn percent(level: u32, max_level: u32) -> u32 {
    if max_level == 0 {
        return 0;
    }
    (u64::from(level.min(max_level)) * 100 / u64::from(max_level)) as u32
}

/// Logs level changes instead of touching any device.
#[derive(Debug, Default)]
pub struct LogSink {
    last: Option<u32>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputSink for LogSink {
    fn set_level(&mut self, level: u32, max_level: u32) -> Result<()> {
        if self.last != Some(level) {
            tracing::info!("Output level {}/{}", level, max_level);
            self.last = Some(level);
        }
        Ok(())
    }
}

/// Sets the system volume by running a mixer command.
///
/// Arguments may contain `{percent}` and `{level}` placeholders, e.g.
/// `pactl set-sink-volume @DEFAULT_SINK@ {percent}%`. The command only runs
/// when the level changes.
#[derive(Debug)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
    last: Option<u32>,
}

impl CommandSink {
    pub const PACTL: &'static str = "pactl set-sink-volume @DEFAULT_SINK@ {percent}%";

    /// Parse a whitespace-separated command line.
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let Some(program) = parts.next() else {
            bail!("Volume command is empty");
        };

        tracing::info!("Volume command: {}", command_line);

        Ok(Self {
            program,
            args: parts.collect(),
            last: None,
        })
    }

    fn render_args(&self, level: u32, max_level: u32) -> Vec<String> {
        let percent = percent(level, max_level).to_string();
        let level = level.to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{percent}", &percent).replace("{level}", &level))
            .collect()
    }
}

impl OutputSink for CommandSink {
    fn set_level(&mut self, level: u32, max_level: u32) -> Result<()> {
        if self.last == Some(level) {
            return Ok(());
        }

        let args = self.render_args(level, max_level);
        tracing::debug!("Running {} {:?}", self.program, args);

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .with_context(|| format!("Failed to run volume command {}", self.program))?;

        if !status.success() {
            bail!("Volume command {} exited with {}", self.program, status);
        }

        self.last = Some(level);
        Ok(())
    }
}

/// Text meter for the current level, written to the log on change.
#[derive(Debug)]
pub struct MeterDisplay {
    width: usize,
    last: Option<u32>,
}

impl MeterDisplay {
    pub fn new(width: usize) -> Self {
        Self { width, last: None }
    }

    pub fn render(&self, level: u32, max_level: u32) -> String {
        let filled = if max_level == 0 {
            0
        } else {
            (u64::from(level.min(max_level)) * self.width as u64 / u64::from(max_level)) as usize
        };
        format!(
            "[{}{}] {}/{}",
            "#".repeat(filled),
            ".".repeat(self.width - filled),
            level,
            max_level
        )
    }
}

impl Default for MeterDisplay {
    fn default() -> Self {
        Self::new(20)
    }
}

impl LevelDisplay for MeterDisplay {
    fn show(&mut self, level: u32, max_level: u32) {
        if self.last != Some(level) {
            tracing::info!("Volume {}", self.render(level, max_level));
            self.last = Some(level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_of_level() {
        assert_eq!(percent(0, 15), 0);
        assert_eq!(percent(15, 15), 100);
        assert_eq!(percent(6, 15), 40);
        assert_eq!(percent(20, 15), 100);
        assert_eq!(percent(3, 0), 0);
    }

    #[test]
    fn placeholders_are_substituted() {
        let sink = CommandSink::parse(CommandSink::PACTL).unwrap();
        assert_eq!(sink.program, "pactl");
        assert_eq!(
            sink.render_args(9, 15),
            vec!["set-sink-volume", "@DEFAULT_SINK@", "60%"]
        );

        let sink = CommandSink::parse("amixer set Master {level}").unwrap();
        assert_eq!(sink.render_args(9, 15), vec!["set", "Master", "9"]);
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(CommandSink::parse("   ").is_err());
    }

    #[test]
    fn missing_program_reports_error() {
        let mut sink = CommandSink::parse("hand-volume-no-such-mixer {percent}").unwrap();
        assert!(sink.set_level(3, 15).is_err());
    }

    #[test]
    fn meter_rendering() {
        let meter = MeterDisplay::new(10);
        assert_eq!(meter.render(0, 15), "[..........] 0/15");
        assert_eq!(meter.render(15, 15), "[##########] 15/15");
        assert_eq!(meter.render(6, 15), "[####......] 6/15");
        assert_eq!(meter.render(4, 0), "[..........] 4/0");
    }
}
