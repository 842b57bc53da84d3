//! Codepoint-accurate CHAR/VARCHAR oracle and batch round-trip verification
//! for the strata columnar format.

pub mod error;
pub mod scenario;
pub mod corpus;
pub mod oracle;
pub mod harness;
pub mod comparator;
pub mod runner;

pub use error::{Result, VerifyError};
pub use scenario::{ScenarioMatrix, StringKind, TestCase};
pub use corpus::InputCorpus;
pub use oracle::{codepoint_count, codepoint_prefix, compute_padded, enforce_max_length, expected_output};
pub use harness::{BatchRoundTripHarness, HarnessOptions, HarnessState, RoundTrip, ScenarioArtifact};
pub use comparator::compare;
pub use runner::{run_matrix, verify_scenario, MatrixReport, ScenarioOutcome, ScenarioReport};
