/*!

Codestream header: serialization and parsing of the frequency table that
precedes every arithmetic-coded payload.

Wire format (little-endian, packed, no alignment padding):

```text
offset   size    field
0        8       total_bytes  (original input length)
8        4       num_symbols  K
12       5*K     K records of {u8 symbol, u32 frequency}, ascending symbol order
```

*/

use crate::error::Error;
use crate::model::frequency::{FrequencyTable, Symbol, MAX_FREQ_SUM};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// A header read back off the wire: the declared input length plus the
/// frequency table that follows it.
pub struct Header {
    /// The `total_bytes` field: the original input length.
    pub total_bytes: u64,
    /// `(symbol, frequency)` pairs in ascending symbol order, with any
    /// zero-frequency entries already dropped.
    pub frequencies: Vec<(Symbol, u32)>,
    /// The sum of `frequencies`, used by the decoder as the coder's
    /// denominator `T`. This may differ from `total_bytes` (a warning is
    /// logged, not an error) as long as neither is zero while the other
    /// isn't.
    pub frequency_sum: u64,
}

/// Write the 12-byte fixed fields plus one 5-byte record per present
/// symbol, in ascending symbol order.
pub fn write_header<W: Write>(
    writer: &mut W,
    total_bytes: u64,
    table: &FrequencyTable,
) -> Result<(), Error> {
    writer
        .write_u64::<LittleEndian>(total_bytes)
        .map_err(Error::IoWrite)?;
    writer
        .write_u32::<LittleEndian>(table.len() as u32)
        .map_err(Error::IoWrite)?;
    for (symbol, freq) in table.iter() {
        writer.write_u8(symbol).map_err(Error::IoWrite)?;
        writer
            .write_u32::<LittleEndian>(freq)
            .map_err(Error::IoWrite)?;
    }
    Ok(())
}

/// Parse a header, validating it per spec: any short read is `Truncated`;
/// a frequency sum above [`MAX_FREQ_SUM`] is `TooLarge`; a zero/nonzero
/// mismatch between the frequency sum and `total_bytes` is
/// `InconsistentHeader`. A symbol with zero frequency is logged and
/// skipped rather than rejected.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Header, Error> {
    let total_bytes = read_u64(reader)?;
    let num_symbols = read_u32(reader)?;

    let mut frequencies = Vec::with_capacity(num_symbols as usize);
    let mut frequency_sum: u64 = 0;
    for _ in 0..num_symbols {
        let symbol = reader.read_u8().map_err(truncated_or_read)?;
        let freq = read_u32(reader)?;
        if freq == 0 {
            log::warn!("symbol {symbol} has zero frequency in header, skipping");
            continue;
        }
        frequencies.push((symbol, freq));
        frequency_sum += u64::from(freq);
    }

    if frequency_sum > MAX_FREQ_SUM {
        return Err(Error::TooLarge(format!(
            "header frequency sum {frequency_sum} exceeds MAX_FREQ_SUM {MAX_FREQ_SUM}"
        )));
    }
    if total_bytes == 0 && frequency_sum != 0 {
        return Err(Error::InconsistentHeader(
            "total byte count is zero but frequency sum is nonzero".into(),
        ));
    }
    if total_bytes != 0 && frequency_sum == 0 {
        return Err(Error::InconsistentHeader(
            "frequency sum is zero but total byte count is nonzero".into(),
        ));
    }
    if total_bytes != 0 && frequency_sum != total_bytes {
        log::warn!(
            "header frequency sum {frequency_sum} does not match total byte count {total_bytes}; \
             decoding using the frequency sum as the denominator"
        );
    }

    Ok(Header {
        total_bytes,
        frequencies,
        frequency_sum,
    })
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64, Error> {
    reader.read_u64::<LittleEndian>().map_err(truncated_or_read)
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, Error> {
    reader.read_u32::<LittleEndian>().map_err(truncated_or_read)
}

/// A short read while parsing the header is always `Truncated`, regardless
/// of whether it manifested as `UnexpectedEof` or a partial-read error from
/// `byteorder`.
fn truncated_or_read(source: std::io::Error) -> Error {
    match source.kind() {
        std::io::ErrorKind::UnexpectedEof => {
            Error::Truncated("header ended before the declared fields were read".into())
        }
        _ => Error::IoRead(source),
    }
}
