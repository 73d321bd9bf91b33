//! The step that pushes an updated locale dictionary into the application.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use enum_dispatch::enum_dispatch;

/// Receives `(locale code, dictionary path)` after a dictionary was saved.
#[enum_dispatch]
pub trait LocaleApplier {
    fn apply_locale(&self, code: &str, dictionary_path: &Path) -> Result<()>;
}

/// Runs an external program with the locale code and dictionary path appended.
///
/// `["python", "_all_langs_apply.py"]` runs
/// `python _all_langs_apply.py ko ./_ko_dict.json`.
#[derive(Debug, Clone)]
pub struct CommandApplier {
    program: String,
    args: Vec<String>,
}

impl CommandApplier {
    /// `None` for an empty argv.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl LocaleApplier for CommandApplier {
    fn apply_locale(&self, code: &str, dictionary_path: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(code)
            .arg(dictionary_path)
            .output()
            .with_context(|| format!("Failed to run '{}'", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            match output.status.code() {
                Some(code) if stderr.is_empty() => {
                    bail!("'{}' exited with status {}", self.program, code)
                }
                Some(code) => bail!("'{}' exited with status {}: {}", self.program, code, stderr),
                None => bail!("'{}' was terminated by a signal", self.program),
            }
        }
        Ok(())
    }
}

/// Used when no apply command is configured or the run is a dry run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipApply;

impl LocaleApplier for SkipApply {
    fn apply_locale(&self, _code: &str, _dictionary_path: &Path) -> Result<()> {
        Ok(())
    }
}

#[enum_dispatch(LocaleApplier)]
#[derive(Debug, Clone)]
pub enum Applier {
    Command(CommandApplier),
    Skip(SkipApply),
}

impl Applier {
    pub fn from_config(apply_command: &[String]) -> Self {
        match CommandApplier::from_argv(apply_command) {
            Some(command) => Applier::Command(command),
            None => Applier::Skip(SkipApply),
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Applier::Skip(_))
    }
}
