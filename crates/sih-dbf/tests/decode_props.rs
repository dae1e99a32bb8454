//! Property tests for field decoding.

use proptest::prelude::*;
use sih_dbf::decode::{decode_date, decode_numeric, parse_compact_date};
use sih_dbf::DbfValue;

proptest! {
    #[test]
    fn numeric_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..20), decimals in 0u8..6) {
        let _ = decode_numeric(&bytes, decimals);
    }

    #[test]
    fn date_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..12)) {
        let _ = decode_date(&bytes);
    }

    #[test]
    fn integers_decode_exactly(value in -9_999_999i64..9_999_999) {
        let text = format!("{value:>10}");
        prop_assert_eq!(decode_numeric(text.as_bytes(), 0), DbfValue::Integer(value));
    }

    #[test]
    fn valid_dates_parse(year in 1900i32..2100, ordinal in 1u32..366) {
        let date = chrono::NaiveDate::from_yo_opt(year, ordinal).unwrap();
        let text = date.format("%Y%m%d").to_string();
        prop_assert_eq!(parse_compact_date(text.as_bytes()), Some(date));
    }
}
