use crate::bit_io::BitWriter;
use crate::coder::{FIRST_QTR, HALF, THIRD_QTR, TOP_VALUE};
use crate::error::Error;
use std::io::Write;

/// Narrows a `[low, high]` interval one symbol at a time and emits the bits
/// that become fixed as the interval shrinks.
///
/// Construct with [`Encoder::new`], call [`Encoder::encode_symbol`] once per
/// input symbol in original stream order, then call [`Encoder::finish`]
/// exactly once to resolve the final interval and flush the bit writer.
pub struct Encoder<W> {
    writer: BitWriter<W>,
    low: u64,
    high: u64,
    pending_bits: u64,
}

impl<W: Write> Encoder<W> {
    /// Begin encoding into `writer` with the full `[0, TOP_VALUE]` interval.
    pub fn new(writer: W) -> Encoder<W> {
        Encoder {
            writer: BitWriter::new(writer),
            low: 0,
            high: TOP_VALUE,
            pending_bits: 0,
        }
    }

    /// Narrow the current interval to the sub-interval `[cum_low, cum_high)`
    /// out of `total`, then renormalize, emitting any bits that are now
    /// determined.
    ///
    /// `cum_low`, `cum_high`, and `total` come from a
    /// [`crate::model::CumulativeTable`] built from the same frequency table
    /// the decoder will read back out of the header.
    pub fn encode_symbol(&mut self, cum_low: u64, cum_high: u64, total: u64) -> Result<(), Error> {
        let range = self.high - self.low + 1;
        self.high = self.low + (range * cum_high) / total - 1;
        self.low += (range * cum_low) / total;
        self.renormalize()
    }

    fn renormalize(&mut self) -> Result<(), Error> {
        loop {
            if self.high < HALF {
                self.output_bit_plus_follow(0)?;
            } else if self.low >= HALF {
                self.output_bit_plus_follow(1)?;
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= FIRST_QTR && self.high < THIRD_QTR {
                self.pending_bits += 1;
                self.low -= FIRST_QTR;
                self.high -= FIRST_QTR;
            } else {
                break;
            }
            self.low *= 2;
            self.high = self.high * 2 + 1;
        }
        Ok(())
    }

    fn output_bit_plus_follow(&mut self, bit: u8) -> Result<(), Error> {
        self.writer.write_bit(bit).map_err(Error::IoWrite)?;
        let opposite = bit ^ 1;
        while self.pending_bits > 0 {
            self.writer.write_bit(opposite).map_err(Error::IoWrite)?;
            self.pending_bits -= 1;
        }
        Ok(())
    }

    /// Resolve the final interval, emit its two concluding bits (plus any
    /// bits still pending from straddle renormalization), and flush the
    /// underlying byte stream.
    ///
    /// Consumes the encoder: nothing further can be encoded afterward.
    pub fn finish(mut self) -> Result<W, Error> {
        self.pending_bits += 1;
        if self.low < FIRST_QTR {
            self.output_bit_plus_follow(0)?;
        } else {
            self.output_bit_plus_follow(1)?;
        }
        self.writer.flush().map_err(Error::IoWrite)?;
        Ok(self.writer.into_inner())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bit_io::BitReader;

    #[test]
    fn single_symbol_full_interval_emits_no_straddle() {
        // One symbol spanning the whole interval narrows to [0, TOP_VALUE]
        // unchanged and should still terminate cleanly.
        let encoder = Encoder::new(Vec::new());
        let mut encoder = encoder;
        encoder.encode_symbol(0, 1, 1).unwrap();
        let bytes = encoder.finish().unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn narrowing_interval_eventually_emits_bits() {
        let mut encoder = Encoder::new(Vec::new());
        // Two equiprobable symbols, repeated, forces renormalization.
        for _ in 0..8 {
            encoder.encode_symbol(0, 1, 2).unwrap();
        }
        let bytes = encoder.finish().unwrap();
        assert!(!bytes.is_empty());
        let mut reader = BitReader::new(&bytes[..]);
        assert!(reader.read_bit().unwrap().is_some());
    }
}
