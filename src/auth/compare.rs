//! Timing-safe equality for the admin password and cookie signatures.

use subtle::ConstantTimeEq;

/// Compare two strings without leaking where they first differ.
///
/// Both inputs are zero-padded to the longer length so the byte comparison
/// always covers the same span. The true lengths are compared as well, so a
/// padded match such as `"abc"` against `"abc\0"` is still rejected.
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let len = a.len().max(b.len());

    let mut left = vec![0u8; len];
    let mut right = vec![0u8; len];
    left[..a.len()].copy_from_slice(a);
    right[..b.len()].copy_from_slice(b);

    let bytes_eq = left.as_slice().ct_eq(right.as_slice());
    let len_eq = (a.len() as u64).ct_eq(&(b.len() as u64));

    (bytes_eq & len_eq).into()
}

#[cfg(test)]
mod tests {
    use super::constant_time_eq;

    #[test]
    fn equal_strings_match() {
        assert!(constant_time_eq("secret", "secret"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn case_difference_does_not_match() {
        assert!(!constant_time_eq("secret", "secreT"));
    }

    #[test]
    fn length_difference_does_not_match() {
        assert!(!constant_time_eq("short", "muchlongerstring"));
        assert!(!constant_time_eq("muchlongerstring", "short"));
        assert!(!constant_time_eq("", "x"));
    }

    #[test]
    fn zero_padding_is_not_equality() {
        assert!(!constant_time_eq("abc", "abc\0"));
        assert!(!constant_time_eq("abc\0\0", "abc"));
    }

    #[test]
    fn divergence_position_does_not_change_outcome() {
        // First-byte and last-byte mismatches go through the same full-width path.
        let base = "0123456789abcdef";
        let first = "x123456789abcdef";
        let last = "0123456789abcdex";
        assert!(!constant_time_eq(base, first));
        assert!(!constant_time_eq(base, last));
        assert_eq!(constant_time_eq(base, first), constant_time_eq(base, last));
    }

    #[test]
    fn multibyte_input_is_compared_bytewise() {
        assert!(constant_time_eq("ñandú", "ñandú"));
        assert!(!constant_time_eq("ñandú", "nandu"));
    }
}
