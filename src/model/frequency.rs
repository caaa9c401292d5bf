/*!

The byte-frequency pass.

[`FrequencyTable::build`] reads an entire input stream once, counting
occurrences of each byte value into 64-bit accumulators so pathologically
large inputs overflow detectably rather than silently wrapping. The table
that results is exact: a symbol either occurs some positive number of times,
or it is simply absent.

*/

use crate::error::Error;
use std::io::Read;

/// One input byte. The coder never deals in anything coarser.
pub type Symbol = u8;

/// The largest sum of frequencies this coder's 32-bit interval arithmetic
/// can divide exactly. With a 32-bit code width this keeps `range * total`
/// inside 64 bits with headroom, so the sub-interval arithmetic in
/// [`crate::coder`] never loses precision.
pub const MAX_FREQ_SUM: u64 = 1 << 28;

/// An exact mapping from byte value to occurrence count, built by a single
/// pass over an input stream.
///
/// Symbols absent from the input are absent from the table. Iteration order
/// is always ascending byte value, the canonical order the cumulative
/// table and the wire header both rely on for encoder/decoder agreement.
#[derive(Default)]
pub struct FrequencyTable {
    counts: [u64; 256],
    total: u64,
}

impl FrequencyTable {
    /// Count every byte in `reader` from its current position to EOF.
    ///
    /// Fails with [`Error::TooLarge`] if any single symbol's count would
    /// not fit in a `u32`, or if the total byte count exceeds
    /// [`MAX_FREQ_SUM`].
    pub fn build<R: Read>(reader: &mut R) -> Result<FrequencyTable, Error> {
        let mut table = FrequencyTable::default();
        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut buf).map_err(Error::IoRead)?;
            if n == 0 {
                break;
            }
            for &byte in &buf[..n] {
                table.counts[byte as usize] += 1;
                table.total += 1;
            }
        }
        for (symbol, &count) in table.counts.iter().enumerate() {
            if count > u64::from(u32::MAX) {
                return Err(Error::TooLarge(format!(
                    "frequency count for byte {symbol} ({count}) exceeds u32::MAX"
                )));
            }
        }
        if table.total > MAX_FREQ_SUM {
            return Err(Error::TooLarge(format!(
                "total byte count {} exceeds MAX_FREQ_SUM {}",
                table.total, MAX_FREQ_SUM
            )));
        }
        Ok(table)
    }

    /// The total number of bytes counted (the sum of every frequency).
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The number of distinct symbols present (the header's `K`).
    pub fn len(&self) -> usize {
        self.counts.iter().filter(|&&c| c != 0).count()
    }

    /// Whether no bytes were counted at all.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// The frequency of `symbol`, or `None` if it never occurred.
    pub fn get(&self, symbol: Symbol) -> Option<u32> {
        let count = self.counts[symbol as usize];
        if count == 0 {
            None
        } else {
            Some(count as u32)
        }
    }

    /// Iterate present symbols and their frequencies in ascending byte
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count != 0)
            .map(|(symbol, &count)| (symbol as Symbol, count as u32))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    impl FrequencyTable {
        /// Test-only helper for constructing a table without a byte stream.
        pub(crate) fn add_for_test(&mut self, symbol: Symbol, count: u64) {
            self.counts[symbol as usize] += count;
            self.total += count;
        }
    }

    #[test]
    fn counts_every_byte_value_once() {
        let input: Vec<u8> = (0u16..=255).map(|v| v as u8).collect();
        let table = FrequencyTable::build(&mut Cursor::new(input)).unwrap();
        assert_eq!(table.len(), 256);
        assert_eq!(table.total(), 256);
        for symbol in 0u16..=255 {
            assert_eq!(table.get(symbol as u8), Some(1));
        }
    }

    #[test]
    fn empty_input_has_no_symbols() {
        let table = FrequencyTable::build(&mut Cursor::new(Vec::<u8>::new())).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn ascending_iteration_order() {
        let table = FrequencyTable::build(&mut Cursor::new(b"bbac".to_vec())).unwrap();
        let symbols: Vec<Symbol> = table.iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec![b'a', b'b', b'c']);
        assert_eq!(table.get(b'b'), Some(2));
    }

    /// A `Read` that yields `remaining` zero bytes without ever allocating
    /// them all at once, so the `MAX_FREQ_SUM + 1` boundary can be exercised
    /// against the real `build()` without a 256 MiB test fixture.
    struct ZeroRun {
        remaining: u64,
    }

    impl std::io::Read for ZeroRun {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = (buf.len() as u64).min(self.remaining) as usize;
            for slot in &mut buf[..n] {
                *slot = 0;
            }
            self.remaining -= n as u64;
            Ok(n)
        }
    }

    #[test]
    fn accepts_total_exactly_at_max_freq_sum() {
        let mut reader = ZeroRun { remaining: MAX_FREQ_SUM };
        let table = FrequencyTable::build(&mut reader).unwrap();
        assert_eq!(table.total(), MAX_FREQ_SUM);
    }

    #[test]
    fn rejects_total_above_max_freq_sum() {
        let mut reader = ZeroRun {
            remaining: MAX_FREQ_SUM + 1,
        };
        let err = FrequencyTable::build(&mut reader).unwrap_err();
        assert!(matches!(err, Error::TooLarge(_)));
    }
}
