use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, error};

use crate::error::LoadError;
use crate::model::RawRecord;

/// Turns the bytes of a data file into header-keyed rows.
pub trait TableParser: Send + Sync {
    fn parse(&self, input: &[u8]) -> Result<Vec<RawRecord>, LoadError>;
}

/// Provides the parser the first time one is needed.
pub trait CapabilitySource: Send + Sync {
    fn fetch(&self) -> Result<Arc<dyn TableParser>, LoadError>;
}

#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl TableParser for CsvParser {
    fn parse(&self, input: &[u8]) -> Result<Vec<RawRecord>, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .delimiter(self.delimiter)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            rows.push(RawRecord::from_pairs(
                headers
                    .iter()
                    .zip(record.iter())
                    .filter(|(column, _)| !column.is_empty()),
            ));
        }
        Ok(rows)
    }
}

/// The parser compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCsv;

impl CapabilitySource for BuiltinCsv {
    fn fetch(&self) -> Result<Arc<dyn TableParser>, LoadError> {
        Ok(Arc::new(CsvParser::default()))
    }
}

/// One-time initialization of the parsing capability. Concurrent callers
/// block on the same cell, so the capability is fetched at most once per
/// successful bootstrap.
pub struct ParserBootstrap {
    source: Box<dyn CapabilitySource>,
    ready: OnceCell<Arc<dyn TableParser>>,
}

impl ParserBootstrap {
    pub fn new<S: CapabilitySource + 'static>(source: S) -> Self {
        Self {
            source: Box::new(source),
            ready: OnceCell::new(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(BuiltinCsv)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get().is_some()
    }

    pub fn ready(&self) -> Result<Arc<dyn TableParser>, LoadError> {
        if let Some(parser) = self.ready.get() {
            return Ok(parser.clone());
        }
        self.ready
            .get_or_try_init(|| {
                debug!("bootstrapping table parser");
                self.source.fetch().map_err(|err| {
                    error!(error = %err, "failed to load table parser");
                    err
                })
            })
            .cloned()
    }
}

impl Default for ParserBootstrap {
    fn default() -> Self {
        Self::builtin()
    }
}
