use std::fs;
use std::path::{Path, PathBuf};

use arrow::datatypes::Schema;
use serde::Deserialize;

use slicesim_core::bucket::Tick;

use crate::error::OutputError;
use crate::tables::attempts::AttemptTrace;
use crate::tables::status::StatusTrace;

#[derive(Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputType {
    AttemptTrace,
    StatusTrace,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OutputSettings {
    pub output_interval: Tick,
    pub output_path: String,
    pub outputs: Vec<Outputs>,
    pub scenario_id: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Outputs {
    pub output_type: OutputType,
    pub output_filename: String,
}

impl OutputSettings {
    /// Directory the result files of this scenario go into, relative to <code>base</code>.
    pub fn output_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.output_path)
            .join(self.scenario_id.to_string())
            .join("files")
    }

    fn file_of(&self, output_type: OutputType) -> Option<&Outputs> {
        self.outputs
            .iter()
            .filter(|output| output.output_type == output_type)
            .last()
    }
}

pub trait ResultWriter {
    fn schema() -> Schema;
    fn write_to_file(&mut self) -> Result<(), OutputError>;
    fn close_file(self) -> Result<(), OutputError>;
}

#[derive(Debug, Default)]
pub struct Results {
    pub attempts: Option<AttemptTrace>,
    pub status: Option<StatusTrace>,
}

impl Results {
    pub fn new(output_settings: &OutputSettings, base: &Path) -> Result<Self, OutputError> {
        let output_path = output_settings.output_dir(base);
        if !output_path.exists() {
            fs::create_dir_all(&output_path).map_err(|e| OutputError::io(&output_path, e))?;
        }

        let attempts = output_settings
            .file_of(OutputType::AttemptTrace)
            .map(|settings| AttemptTrace::new(&output_path.join(&settings.output_filename)))
            .transpose()?;
        let status = output_settings
            .file_of(OutputType::StatusTrace)
            .map(|settings| StatusTrace::new(&output_path.join(&settings.output_filename)))
            .transpose()?;
        Ok(Self { attempts, status })
    }

    /// Results that are never written anywhere.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn write_to_file(&mut self) -> Result<(), OutputError> {
        if let Some(writer) = &mut self.attempts {
            writer.write_to_file()?;
        }
        if let Some(writer) = &mut self.status {
            writer.write_to_file()?;
        }
        Ok(())
    }

    pub fn close_files(self) -> Result<(), OutputError> {
        if let Some(writer) = self.attempts {
            writer.close_file()?;
        }
        if let Some(writer) = self.status {
            writer.close_file()?;
        }
        Ok(())
    }
}
