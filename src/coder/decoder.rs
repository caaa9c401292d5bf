use crate::bit_io::BitReader;
use crate::coder::{CODE_VALUE_BITS, FIRST_QTR, HALF, THIRD_QTR, TOP_VALUE};
use crate::error::Error;
use std::io::Read;

/// The inverse of [`crate::coder::Encoder`]: tracks the same `[low, high]`
/// interval and a running code `value` read bit by bit from the stream,
/// scaling `value` against a symbol's cumulative frequency range to recover
/// which symbol was encoded.
///
/// Construct with [`Decoder::new`], which primes `value` with the first
/// [`CODE_VALUE_BITS`] bits of the stream, then call
/// [`Decoder::decode_symbol`] once per expected output symbol.
pub struct Decoder<R> {
    reader: BitReader<R>,
    low: u64,
    high: u64,
    value: u64,
}

impl<R: Read> Decoder<R> {
    /// Prime the decoder by reading the first [`CODE_VALUE_BITS`] bits of
    /// `reader` into the initial code value. A bit-starved stream (shorter
    /// than one code value) is padded with zero bits, matching the
    /// encoder's own zero-padded final byte.
    pub fn new(reader: R) -> Result<Decoder<R>, Error> {
        let mut reader = BitReader::new(reader);
        let mut value = 0u64;
        for _ in 0..CODE_VALUE_BITS {
            let bit = reader.read_bit().map_err(Error::IoRead)?.unwrap_or(0);
            value = (value << 1) | u64::from(bit);
        }
        Ok(Decoder {
            reader,
            low: 0,
            high: TOP_VALUE,
            value,
        })
    }

    /// Scale the current code value against `total` to produce the
    /// cumulative-frequency value the caller should look up in a
    /// [`crate::model::CumulativeTable`] to recover the next symbol.
    ///
    /// Does not itself advance the decoder; pair with
    /// [`Decoder::consume_symbol`] once the symbol (and its cumulative
    /// range) is known.
    pub fn scaled_value(&self, total: u64) -> u64 {
        let range = self.high - self.low + 1;
        ((self.value - self.low + 1) * total - 1) / range
    }

    /// Narrow the interval to the sub-interval `[cum_low, cum_high)` that
    /// was looked up using [`Decoder::scaled_value`], then renormalize,
    /// reading fresh bits to replace the ones that are now fixed.
    pub fn consume_symbol(&mut self, cum_low: u64, cum_high: u64, total: u64) -> Result<(), Error> {
        let range = self.high - self.low + 1;
        self.high = self.low + (range * cum_high) / total - 1;
        self.low += (range * cum_low) / total;
        self.renormalize()
    }

    fn renormalize(&mut self) -> Result<(), Error> {
        loop {
            if self.high < HALF {
                // no-op: both bounds already below HALF
            } else if self.low >= HALF {
                self.value -= HALF;
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= FIRST_QTR && self.high < THIRD_QTR {
                self.value -= FIRST_QTR;
                self.low -= FIRST_QTR;
                self.high -= FIRST_QTR;
            } else {
                break;
            }
            self.low *= 2;
            self.high = self.high * 2 + 1;
            let bit = self.reader.read_bit().map_err(Error::IoRead)?.unwrap_or(0);
            self.value = (self.value * 2) + u64::from(bit);
        }
        Ok(())
    }
}
