use std::{
    error::Error,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use subsim_protocol::GameOutcome;

/// Final standings written after a game, keyed by the name the agent played as.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ResultsReport {
    /// Name the agent joined with.
    pub(crate) username: String,
    /// Score the agent finished with, when the server listed it.
    pub(crate) own_score: Option<i64>,
    /// Summary reported by the server.
    pub(crate) outcome: GameOutcome,
}

impl ResultsReport {
    /// Builds a report for `username` from the server's outcome.
    #[must_use]
    pub(crate) fn new(username: &str, outcome: GameOutcome) -> Self {
        let own_score = outcome
            .results
            .iter()
            .find(|result| result.name == username)
            .map(|result| result.score);
        Self {
            username: username.to_owned(),
            own_score,
            outcome,
        }
    }

    /// Encodes the report as pretty-printed JSON.
    pub(crate) fn encode(&self) -> Result<String, ResultsExportError> {
        serde_json::to_string_pretty(self).map_err(ResultsExportError::Serialize)
    }

    /// Writes the encoded report to `path`, replacing any previous file.
    pub(crate) fn write_to(&self, path: &Path) -> Result<(), ResultsExportError> {
        let mut json = self.encode()?;
        json.push('\n');
        fs::write(path, json).map_err(|source| ResultsExportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Errors that can occur while exporting the final standings.
#[derive(Debug)]
pub(crate) enum ResultsExportError {
    /// The report could not be serialised.
    Serialize(serde_json::Error),
    /// The results file could not be written.
    Write {
        /// Destination that failed.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
}

impl fmt::Display for ResultsExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialize(error) => write!(f, "could not encode game results: {error}"),
            Self::Write { path, .. } => {
                write!(f, "could not write game results to '{}'", path.display())
            }
        }
    }
}

impl Error for ResultsExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(error) => Some(error),
            Self::Write { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use subsim_protocol::PlayerResult;

    use super::*;

    fn outcome() -> GameOutcome {
        GameOutcome {
            player_count: 2,
            turn_count: 80,
            state: "finished".to_owned(),
            results: vec![
                PlayerResult {
                    name: "Dudly".to_owned(),
                    score: 12,
                },
                PlayerResult {
                    name: "RustySub".to_owned(),
                    score: 30,
                },
            ],
        }
    }

    #[test]
    fn report_picks_out_own_score() {
        let report = ResultsReport::new("RustySub", outcome());
        assert_eq!(report.own_score, Some(30));

        let absent = ResultsReport::new("Nobody", outcome());
        assert_eq!(absent.own_score, None);
    }

    #[test]
    fn encoded_report_parses_back() {
        let report = ResultsReport::new("RustySub", outcome());
        let encoded = report.encode().expect("report encodes");

        let value: serde_json::Value = serde_json::from_str(&encoded).expect("valid json");
        assert_eq!(value["outcome"]["turn_count"], 80);
        assert_eq!(value["outcome"]["results"][1]["name"], "RustySub");

        let decoded: ResultsReport = serde_json::from_str(&encoded).expect("report decodes");
        assert_eq!(decoded, report);
    }

    #[test]
    fn write_to_reports_the_failing_path() {
        let report = ResultsReport::new("RustySub", outcome());
        let path = std::env::temp_dir()
            .join("subsim-results-missing-dir")
            .join("nested")
            .join("results.json");

        let error = report.write_to(&path).unwrap_err();
        assert!(error.to_string().contains("results.json"));
        assert!(error.source().is_some());
    }

    #[test]
    fn write_to_creates_the_file() {
        let report = ResultsReport::new("RustySub", outcome());
        let path = std::env::temp_dir().join(format!("subsim-results-{}.json", std::process::id()));

        report.write_to(&path).expect("results written");
        let written = fs::read_to_string(&path).expect("results readable");
        let _ = fs::remove_file(&path);

        let decoded: ResultsReport = serde_json::from_str(&written).expect("report decodes");
        assert_eq!(decoded, report);
    }
}
