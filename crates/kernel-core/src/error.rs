use thiserror::Error;

/// A catalogue could not be fetched or decoded. Engines keep their prior state.
#[derive(Debug, Error)]
pub enum LoadFailure {
    #[error("catalogue `{source_name}` is unreachable: {source}")]
    Unreachable {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("catalogue `{source_name}` is malformed: {source}")]
    Malformed {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadFailure {
    pub fn unreachable(source_name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Unreachable {
            source_name: source_name.into(),
            source,
        }
    }

    pub fn malformed(source_name: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Malformed {
            source_name: source_name.into(),
            source,
        }
    }
}

/// Lookup failures when a caller addresses catalogue content by id.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("scenario `{0}` is not in the catalogue")]
    UnknownScenario(String),
    #[error("scenario `{0}` is not available at the current age or was already played")]
    ScenarioUnavailable(String),
    #[error("scenario `{scenario_id}` has no choice `{choice_id}`")]
    UnknownChoice {
        scenario_id: String,
        choice_id: String,
    },
    #[error("question `{question_id}` has no answer #{index}")]
    UnknownAnswer { question_id: String, index: usize },
    #[error("assessment is already complete")]
    AssessmentComplete,
}
