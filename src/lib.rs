//! A static-model integer arithmetic coder for lossless byte-stream
//! compression.
//!
//! The coder makes two passes over the input: [`model::FrequencyTable`]
//! counts every byte once, then [`coder::Encoder`] narrows a 32-bit
//! interval one symbol at a time against the resulting
//! [`model::CumulativeTable`]. The frequency table travels with the
//! codestream as a header (see [`model::header`]) so the decoder can
//! rebuild the identical cumulative table before it reads a single coded
//! bit.
//!
//! [`encode`] and [`decode`] work over any `Read`/`Write` pair; [`encode_file`]
//! and [`decode_file`] are thin path-based wrappers that additionally clean
//! up a partially written output file if the coding pass fails partway
//! through.

pub mod bit_io;
pub mod coder;
pub mod error;
pub mod model;

use error::Error;
use model::{CumulativeTable, FrequencyTable};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Encode every byte of `input` into `output` as a self-contained
/// codestream: a header carrying the frequency table, followed by the
/// arithmetic-coded payload.
///
/// An empty input produces a header with `total_bytes = 0` and no
/// frequency entries, and no coded payload at all: there is nothing for
/// the coder to narrow an interval against.
pub fn encode<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<(), Error> {
    let mut buffer = Vec::new();
    input.read_to_end(&mut buffer).map_err(Error::IoRead)?;

    let table = FrequencyTable::build(&mut &buffer[..])?;
    model::write_header(output, buffer.len() as u64, &table)?;

    if table.is_empty() {
        return Ok(());
    }

    let cumulative = CumulativeTable::from_frequency_table(&table)?;
    let total = cumulative.total();
    let mut encoder = coder::Encoder::new(output);
    for &byte in &buffer {
        let (cum_low, cum_high) = cumulative.range(byte)?;
        encoder.encode_symbol(cum_low, cum_high, total)?;
    }
    encoder.finish()?;
    Ok(())
}

/// Decode a codestream produced by [`encode`], writing the recovered bytes
/// to `output`.
pub fn decode<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<(), Error> {
    let header = model::read_header(input)?;
    if header.total_bytes == 0 {
        return Ok(());
    }

    let cumulative = CumulativeTable::from_entries(header.frequencies, header.frequency_sum)?;
    let total = cumulative.total();
    let mut decoder = coder::Decoder::new(input)?;
    for _ in 0..header.total_bytes {
        let scaled = decoder.scaled_value(total);
        let symbol = cumulative.find_symbol(scaled)?;
        let (cum_low, cum_high) = cumulative.range(symbol)?;
        decoder.consume_symbol(cum_low, cum_high, total)?;
        output.write_all(&[symbol]).map_err(Error::IoWrite)?;
    }
    Ok(())
}

/// Deletes the file at `path` on drop unless [`OutputGuard::keep`] was
/// called first: one RAII guard standing in for a cleanup call repeated at
/// every early-return failure path.
struct OutputGuard {
    path: PathBuf,
    keep: bool,
}

impl OutputGuard {
    fn new(path: PathBuf) -> OutputGuard {
        OutputGuard { path, keep: false }
    }

    /// Disarm the guard: the output file succeeded and should survive.
    fn keep(mut self) {
        self.keep = true;
        drop(self);
    }
}

impl Drop for OutputGuard {
    fn drop(&mut self) {
        if !self.keep {
            if let Err(e) = std::fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("failed to remove partial output {}: {e}", self.path.display());
                }
            }
        }
    }
}

fn open_input(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|source| Error::IoOpen {
        path: path.to_path_buf(),
        source,
    })
}

fn create_output(path: &Path) -> Result<File, Error> {
    File::create(path).map_err(|source| Error::IoOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode the file at `input_path` into a new codestream at `output_path`.
///
/// If encoding fails partway through, the partially written output file is
/// removed before the error is returned.
pub fn encode_file(input_path: &Path, output_path: &Path) -> Result<(), Error> {
    let mut input = open_input(input_path)?;
    let mut output = create_output(output_path)?;
    let guard = OutputGuard::new(output_path.to_path_buf());
    encode(&mut input, &mut output)?;
    output.flush().map_err(Error::IoWrite)?;
    guard.keep();
    Ok(())
}

/// Decode the codestream at `input_path` into a new file at `output_path`.
///
/// If decoding fails partway through, the partially written output file is
/// removed before the error is returned.
pub fn decode_file(input_path: &Path, output_path: &Path) -> Result<(), Error> {
    let mut input = open_input(input_path)?;
    let mut output = create_output(output_path)?;
    let guard = OutputGuard::new(output_path.to_path_buf());
    decode(&mut input, &mut output)?;
    output.flush().map_err(Error::IoWrite)?;
    guard.keep();
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn round_trip(input: &[u8]) -> Vec<u8> {
        let mut encoded = Vec::new();
        encode(&mut Cursor::new(input), &mut encoded).unwrap();
        let mut decoded = Vec::new();
        decode(&mut Cursor::new(encoded), &mut decoded).unwrap();
        decoded
    }

    #[test]
    fn empty_input_round_trips_to_empty_output() {
        assert_eq!(round_trip(b""), Vec::<u8>::new());
    }

    #[test]
    fn single_byte_round_trips() {
        assert_eq!(round_trip(b"A"), b"A".to_vec());
    }

    #[test]
    fn repeated_pattern_round_trips() {
        assert_eq!(round_trip(b"AAB"), b"AAB".to_vec());
    }

    #[test]
    fn every_byte_value_once_round_trips() {
        let input: Vec<u8> = (0u16..=255).map(|v| v as u8).collect();
        assert_eq!(round_trip(&input), input);
    }

    #[test]
    fn skewed_distribution_round_trips() {
        let mut input = vec![b'x'; 1000];
        input.extend_from_slice(b"yz");
        assert_eq!(round_trip(&input), input);
    }

    #[test]
    fn corrupted_header_is_rejected() {
        let mut encoded = Vec::new();
        encode(&mut Cursor::new(b"hello"), &mut encoded).unwrap();
        encoded.truncate(4);
        let mut decoded = Vec::new();
        let err = decode(&mut Cursor::new(encoded), &mut decoded).unwrap_err();
        assert!(matches!(err, Error::Truncated(_)));
    }
}
