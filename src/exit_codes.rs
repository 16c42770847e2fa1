//! Exit code constants for the uwconfig CLI.
//!
//! - 0: Success
//! - 1: User error (missing files, I/O failures, invalid state)
//! - 2: Argument error (invalid flag combination)
//! - 3: Format error (parse, serialization, or schema failure)
//! - 4: Reference error (circular or unresolved placeholder)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: unreadable files, undetectable file types, run directory conflicts.
pub const USER_ERROR: i32 = 1;

/// Argument error: invalid flag combination detected before any config I/O.
pub const ARGUMENT_ERROR: i32 = 2;

/// Format error: malformed input, unrepresentable output, or field table schema violation.
pub const FORMAT_FAILURE: i32 = 3;

/// Reference error: circular or unresolved `{{ ... }}` placeholder.
pub const REFERENCE_FAILURE: i32 = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            SUCCESS,
            USER_ERROR,
            ARGUMENT_ERROR,
            FORMAT_FAILURE,
            REFERENCE_FAILURE,
        ];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero() {
        assert_eq!(SUCCESS, 0);
        assert_ne!(USER_ERROR, 0);
    }
}
