use std::path::Path;
use std::sync::Arc;

use typed_builder::TypedBuilder;

use slicesim_core::bucket::Tick;

use crate::arrow::array::{ArrayRef, RecordBatch, UInt64Array};
use crate::arrow::datatypes::{DataType, Field, Schema};
use crate::error::OutputError;
use crate::result::ResultWriter;
use crate::writer::DataOutput;

/// Connection counts at the end of a tick, split by slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, TypedBuilder)]
pub struct StatusRecord {
    pub connected: u64,
    pub total: u64,
    #[builder(default)]
    pub embb: u64,
    #[builder(default)]
    pub urllc: u64,
    #[builder(default)]
    pub mmtc: u64,
}

#[derive(Debug)]
pub struct StatusTrace {
    tick: Vec<u64>,
    connected: Vec<u64>,
    total: Vec<u64>,
    embb: Vec<u64>,
    urllc: Vec<u64>,
    mmtc: Vec<u64>,
    to_output: DataOutput,
}

impl StatusTrace {
    pub fn new(output_file: &Path) -> Result<Self, OutputError> {
        Ok(Self {
            to_output: DataOutput::new(output_file, Self::schema())?,
            tick: Vec::new(),
            connected: Vec::new(),
            total: Vec::new(),
            embb: Vec::new(),
            urllc: Vec::new(),
            mmtc: Vec::new(),
        })
    }

    pub fn add_data(&mut self, tick: Tick, record: StatusRecord) {
        self.tick.push(tick.as_u64());
        self.connected.push(record.connected);
        self.total.push(record.total);
        self.embb.push(record.embb);
        self.urllc.push(record.urllc);
        self.mmtc.push(record.mmtc);
    }

    pub fn pending(&self) -> usize {
        self.tick.len()
    }
}

impl ResultWriter for StatusTrace {
    fn schema() -> Schema {
        let columns = ["tick", "connected", "total", "embb", "urllc", "mmtc"];
        Schema::new(
            columns
                .iter()
                .map(|name| Field::new(*name, DataType::UInt64, false))
                .collect::<Vec<Field>>(),
        )
    }

    fn write_to_file(&mut self) -> Result<(), OutputError> {
        if self.tick.is_empty() {
            return Ok(());
        }
        let columns: Vec<ArrayRef> = [
            &mut self.tick,
            &mut self.connected,
            &mut self.total,
            &mut self.embb,
            &mut self.urllc,
            &mut self.mmtc,
        ]
        .into_iter()
        .map(|column| Arc::new(UInt64Array::from(std::mem::take(column))) as ArrayRef)
        .collect();
        let record_batch = RecordBatch::try_new(Arc::new(Self::schema()), columns)?;
        self.to_output.write(&record_batch)
    }

    fn close_file(mut self) -> Result<(), OutputError> {
        self.write_to_file()?;
        self.to_output.close()
    }
}
