//! Rate-limit header extraction.
//!
//! `X-MBX-USED-WEIGHT-(intervalNum)(intervalLetter)` carries the used request
//! weight for that rate limiter. The legacy `X-MBX-USED-WEIGHT` header is still
//! returned and reports the one minute limiter as well.

use reqwest::header::HeaderMap;

/// Legacy used-weight header.
pub const USED_WEIGHT: &str = "x-mbx-used-weight";

/// One-minute window used-weight header.
pub const USED_WEIGHT_1M: &str = "x-mbx-used-weight-1m";

/// Outcome of reading one weight header.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderWeight {
    Value(f64),
    Absent,
    Malformed(String),
}

impl HeaderWeight {
    /// Gauge value: absent and malformed headers both read as zero.
    pub fn value(&self) -> f64 {
        match self {
            HeaderWeight::Value(v) => *v,
            HeaderWeight::Absent | HeaderWeight::Malformed(_) => 0.0,
        }
    }
}

/// Look up `name` (case-insensitive) and parse it as a decimal number.
pub fn read_weight(headers: &HeaderMap, name: &str) -> HeaderWeight {
    let Some(raw) = headers.get(name) else {
        return HeaderWeight::Absent;
    };

    let text = match raw.to_str() {
        Ok(text) => text.trim(),
        Err(_) => {
            return HeaderWeight::Malformed(String::from_utf8_lossy(raw.as_bytes()).into_owned())
        }
    };

    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => HeaderWeight::Value(v),
        _ => HeaderWeight::Malformed(text.to_string()),
    }
}

/// Read a weight header and log why it fell back to zero, if it did.
pub fn weight_or_zero(headers: &HeaderMap, name: &str) -> f64 {
    let weight = read_weight(headers, name);
    match &weight {
        HeaderWeight::Value(_) => {}
        HeaderWeight::Absent => {
            tracing::debug!(header = name, "Rate-limit header absent, reporting 0");
        }
        HeaderWeight::Malformed(raw) => {
            tracing::warn!(header = name, value = %raw, "Rate-limit header malformed, reporting 0");
        }
    }
    weight.value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(*v));
        }
        map
    }

    #[test]
    fn test_reads_both_headers_separately() {
        let map = headers(&[(USED_WEIGHT, "5"), (USED_WEIGHT_1M, "42")]);
        assert_eq!(read_weight(&map, USED_WEIGHT), HeaderWeight::Value(5.0));
        assert_eq!(read_weight(&map, USED_WEIGHT_1M), HeaderWeight::Value(42.0));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_bytes(b"X-MBX-USED-WEIGHT-1M").unwrap(),
            HeaderValue::from_static("17"),
        );
        assert_eq!(weight_or_zero(&map, USED_WEIGHT_1M), 17.0);
    }

    #[test]
    fn test_absent_header_is_zero() {
        let map = headers(&[(USED_WEIGHT_1M, "3")]);
        assert_eq!(read_weight(&map, USED_WEIGHT), HeaderWeight::Absent);
        assert_eq!(weight_or_zero(&map, USED_WEIGHT), 0.0);
    }

    #[test]
    fn test_malformed_header_is_zero_but_distinguished() {
        let map = headers(&[(USED_WEIGHT, "lots"), (USED_WEIGHT_1M, "NaN")]);
        assert_eq!(
            read_weight(&map, USED_WEIGHT),
            HeaderWeight::Malformed("lots".into())
        );
        assert!(matches!(
            read_weight(&map, USED_WEIGHT_1M),
            HeaderWeight::Malformed(_)
        ));
        assert_eq!(weight_or_zero(&map, USED_WEIGHT), 0.0);
    }

    #[test]
    fn test_decimal_values() {
        let map = headers(&[(USED_WEIGHT, " 12.5 ")]);
        assert_eq!(weight_or_zero(&map, USED_WEIGHT), 12.5);
    }
}
