use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::{DeserializeRecordsIntoIter, ReaderBuilder};
use tracing::warn;

use super::record::RawListing;
use crate::error::ImportError;

/// Number of data lines (header excluded), for progress reporting only.
///
/// Quoted fields spanning several lines make this an upper bound of the record count.
pub fn count_data_lines(path: &Path) -> Result<u64, ImportError> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = 0u64;
    for line in reader.split(b'\n') {
        line?;
        lines += 1;
    }
    Ok(lines.saturating_sub(1))
}

/// Reads a CSV source as successive chunks of at most `chunk_size` records.
///
/// Records that fail to deserialize are counted and skipped; I/O failures end
/// the iteration with an error.
pub struct ChunkReader<R: Read> {
    records: DeserializeRecordsIntoIter<R, RawListing>,
    chunk_size: usize,
    malformed: u64,
    finished: bool,
}

impl ChunkReader<File> {
    pub fn open(path: &Path, chunk_size: usize) -> Result<Self, ImportError> {
        Ok(Self::new(File::open(path)?, chunk_size))
    }
}

impl<R: Read> ChunkReader<R> {
    pub fn new(source: R, chunk_size: usize) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);
        Self {
            records: reader.into_deserialize(),
            chunk_size: chunk_size.max(1),
            malformed: 0,
            finished: false,
        }
    }

    /// Records skipped so far because they could not be deserialized.
    pub fn malformed(&self) -> u64 {
        self.malformed
    }

    /// The next chunk, `Ok(None)` once the source is exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<RawListing>>, ImportError> {
        if self.finished {
            return Ok(None);
        }

        let mut chunk = Vec::with_capacity(self.chunk_size.min(8_192));
        while chunk.len() < self.chunk_size {
            match self.records.next() {
                Some(Ok(record)) => chunk.push(record),
                Some(Err(e)) if e.is_io_error() => return Err(e.into()),
                Some(Err(e)) => {
                    self.malformed += 1;
                    let line = e.position().map(|p| p.line()).unwrap_or_default();
                    warn!("Skipping malformed record at line {}: {}", line, e);
                }
                None => {
                    self.finished = true;
                    break;
                }
            }
        }

        if chunk.is_empty() {
            Ok(None)
        } else {
            Ok(Some(chunk))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "REFERENCE_NUMBER,CITY,PRICE\nA1,Paris,100\nA2,Lyon,200\nA3,Nice,300\n";

    #[test]
    fn splits_into_chunks() {
        let mut reader = ChunkReader::new(SAMPLE.as_bytes(), 2);

        let first = reader.next_chunk().unwrap().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].reference_number.as_deref(), Some("A1"));

        let second = reader.next_chunk().unwrap().unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].city.as_deref(), Some("Nice"));

        assert!(reader.next_chunk().unwrap().is_none());
    }

    #[test]
    fn missing_columns_and_empty_fields_are_none() {
        let mut reader = ChunkReader::new("REFERENCE_NUMBER,PRICE\nB1,\n".as_bytes(), 10);
        let chunk = reader.next_chunk().unwrap().unwrap();
        assert_eq!(chunk[0].price, None);
        assert_eq!(chunk[0].surface, None);
    }

    #[test]
    fn invalid_utf8_records_are_skipped() {
        let mut data = b"REFERENCE_NUMBER,CITY\nC1,Paris\nC2,".to_vec();
        data.extend_from_slice(&[0xff, 0xfe]);
        data.extend_from_slice(b"\nC3,Lille\n");

        let mut reader = ChunkReader::new(data.as_slice(), 10);
        let chunk = reader.next_chunk().unwrap().unwrap();

        let refs: Vec<_> = chunk.iter().map(|r| r.reference_number.clone().unwrap()).collect();
        assert_eq!(refs, vec!["C1", "C3"]);
        assert_eq!(reader.malformed(), 1);
    }
}
