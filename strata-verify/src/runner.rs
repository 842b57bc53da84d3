//! Runs scenarios end to end and collects a matrix report.

use crate::comparator;
use crate::corpus::InputCorpus;
use crate::error::Result;
use crate::harness::{BatchRoundTripHarness, HarnessOptions};
use crate::oracle;
use crate::scenario::{ScenarioMatrix, TestCase};
use serde::Serialize;
use std::fmt;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub data_type: String,
    pub rows: usize,
    pub flushes: usize,
    pub batches_read: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub case: TestCase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ScenarioReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Round-trip `corpus` under `case` and compare against the oracle
pub fn verify_scenario(case: &TestCase, corpus: &InputCorpus, options: &HarnessOptions) -> Result<ScenarioReport> {
    let data_type = case.data_type()?;
    let expected = oracle::expected_output(case, corpus);
    let round_trip = BatchRoundTripHarness::new(case, options).run(corpus)?;
    comparator::compare(case, &expected, &round_trip.rows)?;

    Ok(ScenarioReport {
        scenario: case.name(),
        data_type: data_type.to_string(),
        rows: round_trip.rows.len(),
        flushes: round_trip.flushes,
        batches_read: round_trip.batches_read,
    })
}

/// Run every case in order. A failing case does not stop the rest.
pub fn run_matrix(matrix: &ScenarioMatrix, corpus: &InputCorpus, options: &HarnessOptions) -> MatrixReport {
    let outcomes = matrix
        .iter()
        .map(|case| match verify_scenario(case, corpus, options) {
            Ok(report) => {
                info!(scenario = %report.scenario, rows = report.rows, flushes = report.flushes, "scenario passed");
                ScenarioOutcome {
                    case: *case,
                    report: Some(report),
                    error: None,
                }
            }
            Err(e) => {
                error!(scenario = %case.name(), "scenario failed: {}", e);
                ScenarioOutcome {
                    case: *case,
                    report: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect();

    MatrixReport { outcomes }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatrixReport {
    pub outcomes: Vec<ScenarioOutcome>,
}

impl MatrixReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

impl fmt::Display for MatrixReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            match (&outcome.report, &outcome.error) {
                (Some(report), _) => writeln!(
                    f,
                    "ok    {:<16} {:<12} rows={} flushes={}",
                    report.scenario, report.data_type, report.rows, report.flushes
                )?,
                (None, Some(err)) => writeln!(f, "FAIL  {:<16} {}", outcome.case.name(), err)?,
                (None, None) => writeln!(f, "?     {}", outcome.case.name())?,
            }
        }
        write!(
            f,
            "{} scenarios: {} passed, {} failed",
            self.outcomes.len(),
            self.passed(),
            self.failed()
        )
    }
}
