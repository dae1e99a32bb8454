//! Value normalizers.
//!
//! Each normalizer takes optional raw text and returns a typed value or
//! `None`. They never fail: anything that does not parse is missing.
//!
//! - **currency**: fixed-point cents
//! - **date**: compact `YYYYMMDD` dates
//! - **integer**: signed integers

pub mod currency;
pub mod date;
pub mod integer;

pub use currency::normalize_currency;
pub use date::normalize_date;
pub use integer::normalize_integer;
