/*!

Frequency model and header codec for the arithmetic coder.

A [`FrequencyTable`] is built from a single pass over the input and records
an exact count for every byte value that occurs. A [`CumulativeTable`]
derives, from a frequency table (or from a header already read back off the
wire), the cumulative-frequency intervals the coder core needs: one
ascending-order partition of `[0, total)` per symbol, plus the inverse
lookup the decoder uses to turn a scaled code value back into a symbol.

Unlike an adaptive range-coder model, this one never adapts: it is built
once, serialized into the stream header, and held fixed for the entire
coding pass.

*/

pub mod frequency;
pub mod header;

pub use frequency::{FrequencyTable, Symbol, MAX_FREQ_SUM};
pub use header::{read_header, write_header, Header};

use crate::error::Error;
use std::collections::BTreeMap;

/// Cumulative-frequency intervals derived from a frequency table, in
/// ascending symbol order.
///
/// For the k-th symbol in ascending byte order, `cumulative[k]` is the sum
/// of the frequencies of all prior symbols; the first entry is always zero.
pub struct CumulativeTable {
    /// symbol -> (cumulative start, frequency)
    by_symbol: BTreeMap<Symbol, (u64, u32)>,
    /// cumulative start -> symbol, used by the decoder's inverse lookup
    by_cumulative: BTreeMap<u64, Symbol>,
    total: u64,
}

impl CumulativeTable {
    /// Build from a [`FrequencyTable`] produced by a full input pass.
    pub fn from_frequency_table(table: &FrequencyTable) -> Result<CumulativeTable, Error> {
        Self::from_entries(table.iter(), table.total())
    }

    /// Build from `(symbol, frequency)` pairs that must already be in
    /// strictly ascending symbol order, such as a parsed [`Header`]'s
    /// entries, checking that they sum to `expected_total` (the header's
    /// frequency-sum denominator).
    ///
    /// Unlike `std::map`-backed implementations, which silently re-sort
    /// whatever insertion order they're given, this rejects an out-of-order
    /// or duplicate-symbol input with [`Error::Corrupt`] rather than
    /// accepting it and producing a cumulative table that no longer matches
    /// what an honest encoder would have written (ascending order is the
    /// wire format's canonical order, not an incidental property of it).
    pub fn from_entries<I>(entries: I, expected_total: u64) -> Result<CumulativeTable, Error>
    where
        I: IntoIterator<Item = (Symbol, u32)>,
    {
        let mut by_symbol = BTreeMap::new();
        let mut by_cumulative = BTreeMap::new();
        let mut running: u64 = 0;
        let mut last_symbol: Option<Symbol> = None;
        for (symbol, freq) in entries {
            if let Some(prev) = last_symbol {
                if symbol <= prev {
                    return Err(Error::Corrupt(format!(
                        "header symbols not in strictly ascending order: {prev} followed by {symbol}"
                    )));
                }
            }
            last_symbol = Some(symbol);
            by_symbol.insert(symbol, (running, freq));
            by_cumulative.insert(running, symbol);
            running += u64::from(freq);
        }
        if running != expected_total {
            return Err(Error::Internal(format!(
                "cumulative frequency sum {running} does not match expected total {expected_total}"
            )));
        }
        Ok(CumulativeTable {
            by_symbol,
            by_cumulative,
            total: running,
        })
    }

    /// The denominator `T` used by every interval computed from this table.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The half-open cumulative interval `[cum, cum+freq)` for `symbol`.
    ///
    /// Returns [`Error::Internal`] if `symbol` was absent from the table
    /// that built this one, impossible on the encode side unless the
    /// frequency pass that built the table was not exact.
    pub fn range(&self, symbol: Symbol) -> Result<(u64, u64), Error> {
        self.by_symbol
            .get(&symbol)
            .map(|&(cum, freq)| (cum, cum + u64::from(freq)))
            .ok_or_else(|| Error::Internal(format!("symbol {symbol} missing from frequency table")))
    }

    /// Find the symbol whose cumulative interval contains `scaled_value`.
    ///
    /// This is the greatest cumulative-start key `<= scaled_value`. Given a
    /// key set containing `0`, `find_symbol(0)` returns the symbol at key
    /// `0`; rejection only happens when the key set is empty or its minimum
    /// key exceeds `scaled_value`.
    pub fn find_symbol(&self, scaled_value: u64) -> Result<Symbol, Error> {
        self.by_cumulative
            .range(..=scaled_value)
            .next_back()
            .map(|(_, &symbol)| symbol)
            .ok_or_else(|| {
                Error::Corrupt(format!(
                    "scaled value {scaled_value} is below the lowest cumulative boundary"
                ))
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ascending_order_and_ranges() {
        let mut table = FrequencyTable::default();
        table.add_for_test(b'A', 2);
        table.add_for_test(b'B', 1);
        let cum = CumulativeTable::from_frequency_table(&table).unwrap();
        assert_eq!(cum.total(), 3);
        assert_eq!(cum.range(b'A').unwrap(), (0, 2));
        assert_eq!(cum.range(b'B').unwrap(), (2, 3));
    }

    #[test]
    fn find_symbol_at_zero_key() {
        let mut table = FrequencyTable::default();
        table.add_for_test(b'A', 2);
        table.add_for_test(b'B', 1);
        let cum = CumulativeTable::from_frequency_table(&table).unwrap();
        assert_eq!(cum.find_symbol(0).unwrap(), b'A');
        assert_eq!(cum.find_symbol(1).unwrap(), b'A');
        assert_eq!(cum.find_symbol(2).unwrap(), b'B');
    }

    #[test]
    fn find_symbol_empty_table_is_corrupt() {
        let table = FrequencyTable::default();
        let cum = CumulativeTable::from_frequency_table(&table).unwrap();
        assert!(matches!(cum.find_symbol(0), Err(Error::Corrupt(_))));
    }

    #[test]
    fn mismatched_total_is_internal_error() {
        let err = CumulativeTable::from_entries(vec![(b'A', 2), (b'B', 1)], 10).unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn out_of_order_symbols_are_rejected_as_corrupt() {
        let err = CumulativeTable::from_entries(vec![(b'B', 1), (b'A', 2)], 3).unwrap_err();
        assert!(matches!(err, Error::Corrupt(_)));
    }

    #[test]
    fn duplicate_symbol_is_rejected_as_corrupt() {
        let err = CumulativeTable::from_entries(vec![(b'A', 1), (b'A', 2)], 3).unwrap_err();
        assert!(matches!(err, Error::Corrupt(_)));
    }
}
