//! pH Status Bands

use serde::{Deserialize, Serialize};
use std::fmt;

/// Guide text shown next to the status table
pub const STATUS_GUIDE: &str =
    "Status guide: Safe (6.5–8.0), Warning (6.0–6.5 or 8.0–8.5), Unsafe (<6.0 or >8.5)";

/// Safety status derived from a pH value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhStatus {
    Safe,
    Warning,
    Unsafe,
}

impl PhStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhStatus::Safe => "Safe",
            PhStatus::Warning => "Warning",
            PhStatus::Unsafe => "Unsafe",
        }
    }
}

impl fmt::Display for PhStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a pH value.
///
/// The comparisons run in this exact order, so 8.5 itself is `Warning`
/// while anything above it is `Unsafe`. NaN fails every comparison and
/// lands on `Safe`.
pub fn classify(ph: f64) -> PhStatus {
    if ph < 6.5 || ph > 8.5 {
        return PhStatus::Unsafe;
    }
    if (ph >= 6.5 && ph < 7.0) || (ph > 8.0 && ph <= 8.5) {
        return PhStatus::Warning;
    }
    PhStatus::Safe
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_literal_boundaries() {
        assert_eq!(classify(6.4), PhStatus::Unsafe);
        assert_eq!(classify(6.5), PhStatus::Warning);
        assert_eq!(classify(6.9), PhStatus::Warning);
        assert_eq!(classify(7.0), PhStatus::Safe);
        assert_eq!(classify(8.0), PhStatus::Safe);
        assert_eq!(classify(8.1), PhStatus::Warning);
        assert_eq!(classify(8.5), PhStatus::Warning);
        assert_eq!(classify(8.6), PhStatus::Unsafe);
    }

    #[test]
    fn test_outer_range() {
        assert_eq!(classify(0.0), PhStatus::Unsafe);
        assert_eq!(classify(14.0), PhStatus::Unsafe);
        assert_eq!(classify(f64::NEG_INFINITY), PhStatus::Unsafe);
        assert_eq!(classify(f64::INFINITY), PhStatus::Unsafe);
    }

    #[test]
    fn test_nan_is_safe() {
        assert_eq!(classify(f64::NAN), PhStatus::Safe);
    }

    #[test]
    fn test_display() {
        assert_eq!(PhStatus::Warning.to_string(), "Warning");
    }

    proptest! {
        #[test]
        fn test_bands_are_contiguous(ph in -100.0f64..100.0) {
            let expected = if ph < 6.5 || ph > 8.5 {
                PhStatus::Unsafe
            } else if ph < 7.0 || ph > 8.0 {
                PhStatus::Warning
            } else {
                PhStatus::Safe
            };
            prop_assert_eq!(classify(ph), expected);
        }

        #[test]
        fn test_safe_band_is_closed(ph in 7.0f64..=8.0) {
            prop_assert_eq!(classify(ph), PhStatus::Safe);
        }
    }
}
