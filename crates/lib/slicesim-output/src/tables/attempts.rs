use std::path::Path;
use std::sync::Arc;

use typed_builder::TypedBuilder;

use slicesim_core::bucket::Tick;

use crate::arrow::array::{ArrayRef, Float64Array, RecordBatch, StringArray, UInt32Array, UInt64Array};
use crate::arrow::datatypes::{DataType, Field, Schema};
use crate::error::OutputError;
use crate::result::ResultWriter;
use crate::writer::DataOutput;

/// One connection attempt of one node. Fields that only exist for some outcomes are optional.
#[derive(Clone, Debug, TypedBuilder)]
pub struct AttemptRecord {
    node: u64,
    attempt: u32,
    #[builder(setter(into))]
    outcome: String,
    #[builder(default)]
    access_point: Option<u64>,
    #[builder(default)]
    slice: Option<String>,
    #[builder(default)]
    granted: Option<f64>,
    #[builder(default)]
    sinr: Option<f64>,
    #[builder(default)]
    rsrp: Option<f64>,
}

impl AttemptRecord {
    pub fn outcome(&self) -> &str {
        &self.outcome
    }
}

#[derive(Debug)]
pub struct AttemptTrace {
    tick: Vec<u64>,
    node: Vec<u64>,
    attempt: Vec<u32>,
    outcome: Vec<String>,
    access_point: Vec<Option<u64>>,
    slice: Vec<Option<String>>,
    granted: Vec<Option<f64>>,
    sinr: Vec<Option<f64>>,
    rsrp: Vec<Option<f64>>,
    to_output: DataOutput,
}

impl AttemptTrace {
    pub fn new(output_file: &Path) -> Result<Self, OutputError> {
        Ok(Self {
            to_output: DataOutput::new(output_file, Self::schema())?,
            tick: Vec::new(),
            node: Vec::new(),
            attempt: Vec::new(),
            outcome: Vec::new(),
            access_point: Vec::new(),
            slice: Vec::new(),
            granted: Vec::new(),
            sinr: Vec::new(),
            rsrp: Vec::new(),
        })
    }

    pub fn add_data(&mut self, tick: Tick, record: AttemptRecord) {
        self.tick.push(tick.as_u64());
        self.node.push(record.node);
        self.attempt.push(record.attempt);
        self.outcome.push(record.outcome);
        self.access_point.push(record.access_point);
        self.slice.push(record.slice);
        self.granted.push(record.granted);
        self.sinr.push(record.sinr);
        self.rsrp.push(record.rsrp);
    }

    pub fn pending(&self) -> usize {
        self.tick.len()
    }
}

impl ResultWriter for AttemptTrace {
    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("tick", DataType::UInt64, false),
            Field::new("node_id", DataType::UInt64, false),
            Field::new("attempt", DataType::UInt32, false),
            Field::new("outcome", DataType::Utf8, false),
            Field::new("access_point", DataType::UInt64, true),
            Field::new("slice", DataType::Utf8, true),
            Field::new("granted", DataType::Float64, true),
            Field::new("sinr", DataType::Float64, true),
            Field::new("rsrp", DataType::Float64, true),
        ])
    }

    fn write_to_file(&mut self) -> Result<(), OutputError> {
        if self.tick.is_empty() {
            return Ok(());
        }
        let columns: Vec<ArrayRef> = vec![
            Arc::new(UInt64Array::from(std::mem::take(&mut self.tick))),
            Arc::new(UInt64Array::from(std::mem::take(&mut self.node))),
            Arc::new(UInt32Array::from(std::mem::take(&mut self.attempt))),
            Arc::new(StringArray::from(std::mem::take(&mut self.outcome))),
            Arc::new(UInt64Array::from(std::mem::take(&mut self.access_point))),
            Arc::new(StringArray::from(std::mem::take(&mut self.slice))),
            Arc::new(Float64Array::from(std::mem::take(&mut self.granted))),
            Arc::new(Float64Array::from(std::mem::take(&mut self.sinr))),
            Arc::new(Float64Array::from(std::mem::take(&mut self.rsrp))),
        ];
        let record_batch = RecordBatch::try_new(Arc::new(Self::schema()), columns)?;
        self.to_output.write(&record_batch)
    }

    fn close_file(mut self) -> Result<(), OutputError> {
        self.write_to_file()?;
        self.to_output.close()
    }
}
