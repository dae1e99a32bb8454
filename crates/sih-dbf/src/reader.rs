//! DBF file reader.
//!
//! The header is parsed eagerly when the reader is created; records are
//! decoded lazily, one per iterator step.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::decode::decode_field;
use crate::error::{DbfError, Result};
use crate::header::{
    DELETED_FLAG, END_OF_FILE, HEADER_PREFIX_LEN, TableHeader, parse_field_descriptors,
    parse_header_prefix, validate_layout,
};
use crate::types::{DbfReaderOptions, Row};

/// DBF reader yielding one [`Row`] per non-deleted record.
pub struct DbfReader<R: Read> {
    reader: BufReader<R>,
    header: TableHeader,
    names: Arc<[String]>,
    options: DbfReaderOptions,
    buffer: Vec<u8>,
    position: u32,
    deleted: u32,
    finished: bool,
}

/// A fully decoded table.
#[derive(Debug, Clone)]
pub struct DbfTable {
    pub header: TableHeader,
    pub rows: Vec<Row>,
    /// Records skipped because their deletion flag was set.
    pub deleted_count: u32,
}

impl DbfTable {
    /// Number of decoded rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

impl<R: Read> DbfReader<R> {
    /// Create a reader and parse the table header.
    pub fn new(reader: R) -> Result<Self> {
        Self::with_options(reader, DbfReaderOptions::default())
    }

    /// Create a reader with options and parse the table header.
    pub fn with_options(reader: R, options: DbfReaderOptions) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let header = read_header(&mut reader)?;
        debug!(
            version = header.version,
            record_count = header.record_count,
            field_count = header.fields.len(),
            record_length = header.record_length,
            "parsed DBF header"
        );
        let names: Arc<[String]> = header.field_names().into();
        let buffer = vec![0u8; usize::from(header.record_length)];
        Ok(Self {
            reader,
            header,
            names,
            options,
            buffer,
            position: 0,
            deleted: 0,
            finished: false,
        })
    }

    /// The parsed table header.
    #[must_use]
    pub fn header(&self) -> &TableHeader {
        &self.header
    }

    /// Deleted records skipped so far.
    #[must_use]
    pub fn deleted_count(&self) -> u32 {
        self.deleted
    }

    /// Decode every remaining record into memory.
    pub fn read_table(mut self) -> Result<DbfTable> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row()? {
            rows.push(row);
        }
        Ok(DbfTable {
            header: self.header,
            rows,
            deleted_count: self.deleted,
        })
    }

    fn next_row(&mut self) -> Result<Option<Row>> {
        loop {
            if self.finished || self.position >= self.header.record_count {
                self.finished = true;
                return Ok(None);
            }
            let record = self.position + 1;
            let declared = self.header.record_count;
            let truncated = |error: std::io::Error| {
                if error.kind() == ErrorKind::UnexpectedEof {
                    DbfError::Truncated { record, declared }
                } else {
                    DbfError::Io(error)
                }
            };
            if let Err(error) = self.reader.read_exact(&mut self.buffer[..1]) {
                self.finished = true;
                return Err(truncated(error));
            }
            if self.buffer[0] == END_OF_FILE {
                self.finished = true;
                return Err(DbfError::Truncated { record, declared });
            }
            if let Err(error) = self.reader.read_exact(&mut self.buffer[1..]) {
                self.finished = true;
                return Err(truncated(error));
            }
            self.position = record;

            if self.buffer[0] == DELETED_FLAG {
                self.deleted += 1;
                trace!(record, "skipping deleted record");
                continue;
            }
            return Ok(Some(self.decode_record()));
        }
    }

    fn decode_record(&self) -> Row {
        let mut values = Vec::with_capacity(self.header.fields.len());
        let mut pos = 1usize;
        for field in &self.header.fields {
            let len = usize::from(field.length);
            let slice = &self.buffer[pos..pos + len];
            values.push(decode_field(slice, field, self.options.encoding));
            pos += len;
        }
        Row::new(Arc::clone(&self.names), values)
    }
}

impl<R: Read> Iterator for DbfReader<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

impl DbfReader<File> {
    /// Open a DBF file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_options(path, DbfReaderOptions::default())
    }

    /// Open a DBF file with options.
    pub fn open_with_options(path: &Path, options: DbfReaderOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                DbfError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                DbfError::Io(e)
            }
        })?;
        Self::with_options(file, options)
    }
}

/// Read a whole DBF file from a path.
pub fn read_dbf(path: &Path) -> Result<DbfTable> {
    DbfReader::open(path)?.read_table()
}

/// Read a whole DBF file with options.
pub fn read_dbf_with_options(path: &Path, options: DbfReaderOptions) -> Result<DbfTable> {
    DbfReader::open_with_options(path, options)?.read_table()
}

/// Read and validate the header prefix, descriptors and layout.
fn read_header<R: Read>(reader: &mut R) -> Result<TableHeader> {
    let mut prefix_bytes = [0u8; HEADER_PREFIX_LEN];
    read_header_bytes(reader, &mut prefix_bytes)?;
    let prefix = parse_header_prefix(&prefix_bytes)?;

    let mut block = vec![0u8; usize::from(prefix.header_length) - HEADER_PREFIX_LEN];
    read_header_bytes(reader, &mut block)?;
    let fields = parse_field_descriptors(&block)?;
    validate_layout(&prefix, &fields)?;

    Ok(TableHeader {
        version: prefix.version,
        last_update: prefix.last_update,
        record_count: prefix.record_count,
        header_length: prefix.header_length,
        record_length: prefix.record_length,
        fields,
    })
}

fn read_header_bytes<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            DbfError::invalid_header("header truncated")
        } else {
            DbfError::Io(e)
        }
    })
}
