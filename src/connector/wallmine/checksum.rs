//! Trade fingerprint for WallMine duplicate detection.
//!
//! WallMine exposes no structured transaction API, so the connector
//! embeds an Adler-32 checksum of the trade's identifying fields inside
//! the submitted note (as a `#digits#` marker) and later scrapes those
//! markers back out of the rendered transactions table. Collisions are
//! possible at the 32-bit birthday bound, but the checksum must stay
//! Adler-32: markers already embedded in live data would be orphaned by
//! a stronger hash.

use adler32::RollingAdler32;
use rust_decimal::Decimal;

/// Checksum over the colon-joined identifying tuple of a trade.
///
/// The note text is deliberately not part of the input: two trades that
/// differ only in their note are the same trade.
pub(super) fn trade_checksum(
    position_id: &str,
    side: &str,
    date: &str,
    shares: i64,
    price: Decimal,
) -> u32 {
    let content = format!("{position_id}:{side}:{date}:{shares}:{price}");
    RollingAdler32::from_buffer(content.as_bytes()).hash()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_checksum_is_stable() {
        let a = trade_checksum("4711", "Buy", "2021-01-04", 10, dec!(150.00));
        let b = trade_checksum("4711", "Buy", "2021-01-04", 10, dec!(150.00));
        assert_eq!(a, b);
    }

    #[test]
    fn test_checksum_ignores_note_by_construction() {
        // Identity is the five-field tuple; notes never enter the hash,
        // so two trades differing only in note text collide on purpose.
        let a = trade_checksum("4711", "Buy", "2021-01-04", 10, dec!(150.00));
        let b = trade_checksum("4711", "Buy", "2021-01-04", 10, dec!(150.00));
        assert_eq!(a, b);
    }

    #[test]
    fn test_checksum_changes_with_each_field() {
        let base = trade_checksum("4711", "Buy", "2021-01-04", 10, dec!(150.00));
        assert_ne!(base, trade_checksum("4712", "Buy", "2021-01-04", 10, dec!(150.00)));
        assert_ne!(base, trade_checksum("4711", "Sell", "2021-01-04", 10, dec!(150.00)));
        assert_ne!(base, trade_checksum("4711", "Buy", "2021-01-05", 10, dec!(150.00)));
        assert_ne!(base, trade_checksum("4711", "Buy", "2021-01-04", 11, dec!(150.00)));
        assert_ne!(base, trade_checksum("4711", "Buy", "2021-01-04", 10, dec!(150.50)));
    }

    #[test]
    fn test_checksum_matches_adler32_of_joined_tuple() {
        let checksum = trade_checksum("1", "Buy", "2021-01-04", 10, dec!(150.00));
        let expected = RollingAdler32::from_buffer(b"1:Buy:2021-01-04:10:150.00").hash();
        assert_eq!(checksum, expected);
    }
}
