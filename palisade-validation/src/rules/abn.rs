// Australian Business Number checksum

use crate::rule::{Check, Outcome};
use crate::Value;

const WEIGHTS: [u32; 11] = [10, 1, 3, 5, 7, 9, 11, 13, 15, 17, 19];

/// Weighted modulus 89 checksum over an eleven digit ABN.
///
/// Only the checksum is verified here; digit and length checks are composed
/// alongside it by [`abn`](super::abn).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbnChecksum;

impl AbnChecksum {
    pub fn is_valid_checksum(abn: &str) -> bool {
        let digits: Option<Vec<u32>> = abn.chars().map(|c| c.to_digit(10)).collect();
        let Some(mut digits) = digits.filter(|d| d.len() == WEIGHTS.len()) else {
            return false;
        };
        digits[0] = if digits[0] == 0 { 9 } else { digits[0] - 1 };
        let total: u32 = digits.iter().zip(WEIGHTS).map(|(d, w)| d * w).sum();
        total % 89 == 0
    }
}

impl Check for AbnChecksum {
    fn check(&self, input: &Value) -> Outcome {
        if input.is_null_or_empty_text() {
            return Outcome::Valid;
        }
        let valid = input
            .as_text()
            .is_some_and(|text| Self::is_valid_checksum(&text));
        Outcome::valid_if(valid, "has failed the ABN Checksum Validation.")
    }

    fn name(&self) -> &str {
        "abn_checksum"
    }
}
