use std::fs::File;
use std::path::Path;

use arrow::array::RecordBatch;
use arrow::csv::Writer;
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::RecordBatchWriter;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::error::OutputError;

/// A table sink. The file format follows the extension of the file name.
#[derive(Debug)]
pub enum DataOutput {
    Parquet(WriterParquet),
    Csv(WriterCsv),
}

impl DataOutput {
    pub fn new(file_name: &Path, schema: Schema) -> Result<Self, OutputError> {
        if file_name.exists() {
            std::fs::remove_file(file_name).map_err(|e| OutputError::io(file_name, e))?;
        }
        match file_name.extension().and_then(|ext| ext.to_str()) {
            Some("parquet") => Ok(DataOutput::Parquet(WriterParquet::new(file_name, schema)?)),
            Some("csv") => Ok(DataOutput::Csv(WriterCsv::new(file_name)?)),
            _ => Err(OutputError::UnsupportedExtension(file_name.to_path_buf())),
        }
    }

    pub fn write(&mut self, record_batch: &RecordBatch) -> Result<(), OutputError> {
        match self {
            DataOutput::Parquet(to_output) => to_output.writer.write(record_batch)?,
            DataOutput::Csv(to_output) => to_output.writer.write(record_batch)?,
        }
        Ok(())
    }

    pub fn close(self) -> Result<(), OutputError> {
        match self {
            DataOutput::Parquet(to_output) => to_output.close(),
            DataOutput::Csv(to_output) => to_output.close(),
        }
    }
}

#[derive(Debug)]
pub struct WriterParquet {
    pub writer: ArrowWriter<File>,
}

impl WriterParquet {
    fn new(file_name: &Path, schema: Schema) -> Result<Self, OutputError> {
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();
        let output_file = File::create(file_name).map_err(|e| OutputError::io(file_name, e))?;
        let writer = ArrowWriter::try_new(output_file, SchemaRef::from(schema), Some(props))?;
        Ok(Self { writer })
    }

    pub fn close(self) -> Result<(), OutputError> {
        self.writer.close()?;
        Ok(())
    }
}

#[derive(Debug)]
pub struct WriterCsv {
    pub writer: Writer<File>,
}

impl WriterCsv {
    fn new(file_name: &Path) -> Result<Self, OutputError> {
        let output_file = File::create(file_name).map_err(|e| OutputError::io(file_name, e))?;
        Ok(Self {
            writer: Writer::new(output_file),
        })
    }

    pub fn close(self) -> Result<(), OutputError> {
        self.writer.close()?;
        Ok(())
    }
}
