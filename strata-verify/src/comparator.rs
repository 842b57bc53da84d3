//! Fail-fast comparison of oracle output against values read back.

use crate::error::{Result, VerifyError};
use crate::scenario::TestCase;

/// Fail on the first row where `observed` differs from `expected`.
///
/// A row count difference is only reported once every paired row matched.
pub fn compare(case: &TestCase, expected: &[Option<String>], observed: &[Option<String>]) -> Result<()> {
    if let Some(index) = first_divergence(expected, observed) {
        return Err(VerifyError::Divergence {
            scenario: case.name(),
            kind: case.kind,
            max_length: case.max_length,
            index,
            expected: expected[index].clone(),
            actual: observed[index].clone(),
        });
    }

    if expected.len() != observed.len() {
        return Err(VerifyError::LengthMismatch {
            scenario: case.name(),
            expected: expected.len(),
            actual: observed.len(),
        });
    }

    Ok(())
}

/// Index of the first differing pair, ignoring any unpaired tail
pub fn first_divergence(expected: &[Option<String>], observed: &[Option<String>]) -> Option<usize> {
    expected
        .iter()
        .zip(observed)
        .position(|(e, o)| e != o)
}
