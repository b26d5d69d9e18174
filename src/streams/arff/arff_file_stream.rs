use crate::core::instance_header::InstanceHeader;
use crate::core::instances::{DenseInstance, Instance};
use crate::streams::stream::Stream;

use crate::streams::arff::parser::{is_comment_or_empty, parse_header, parse_instance_values};
use std::fs::File;
use std::io::{BufRead, BufReader, Error, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reads instances line by line from an ARFF file. Rows that do not parse
/// are logged and skipped.

#[derive(Debug)]
pub struct ArffFileStream {
    path: PathBuf,
    reader: BufReader<File>,
    header: Arc<InstanceHeader>,
    data_start_pos: u64,
    next_line: Option<String>,
    finished: bool,
}

impl Stream for ArffFileStream {
    fn header(&self) -> &InstanceHeader {
        &self.header
    }

    fn has_more_instances(&self) -> bool {
        !self.finished
    }

    fn next_instance(&mut self) -> Option<Box<dyn Instance>> {
        if self.finished {
            return None;
        }

        loop {
            let line = self.next_line.take()?;
            if let Err(e) = self.fill_next_line() {
                warn!(path = %self.path.display(), error = %e, "stopped reading ARFF data");
                self.finished = true;
            }

            match parse_instance_values(&self.header, &line) {
                Ok(values) => {
                    let inst = DenseInstance::new(Arc::clone(&self.header), values, 1.0);
                    return Some(Box::new(inst) as Box<dyn Instance>);
                }
                Err(e) => {
                    warn!(%line, error = %e, "skipping invalid ARFF row");
                }
            }
        }
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.reader = BufReader::new(File::open(&self.path)?);
        self.reader.seek(SeekFrom::Start(self.data_start_pos))?;
        self.finished = false;
        self.next_line = None;
        self.fill_next_line()?;
        Ok(())
    }
}

impl ArffFileStream {
    /// Opens `path` and parses its header. `class_index` is 0-based; `None`
    /// picks the last attribute.
    pub fn new(path: PathBuf, class_index: Option<usize>) -> Result<Self, Error> {
        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);

        let (header, data_start_pos) = parse_header(&mut reader, class_index)?;
        debug!(
            path = %path.display(),
            relation = header.relation_name(),
            attributes = header.number_of_attributes(),
            class_index = header.class_index(),
            "opened ARFF stream"
        );

        let mut stream = ArffFileStream {
            path,
            reader,
            header: Arc::new(header),
            data_start_pos,
            next_line: None,
            finished: false,
        };

        stream.fill_next_line()?;
        Ok(stream)
    }

    fn fill_next_line(&mut self) -> Result<(), Error> {
        if self.finished {
            self.next_line = None;
            return Ok(());
        }
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.reader.read_line(&mut line)?;
            if n == 0 {
                self.finished = true;
                self.next_line = None;
                return Ok(());
            }
            if !is_comment_or_empty(&line) {
                self.next_line = Some(line.trim().to_string());
                return Ok(());
            }
        }
    }
}
