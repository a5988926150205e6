//! Async catalogue file loading.

use std::path::Path;

use contracts::{QuestionCatalogue, ScenarioCatalogue};
use kernel_core::LoadFailure;
use serde::de::DeserializeOwned;
use tracing::debug;

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadFailure> {
    let source_name = path.display().to_string();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| LoadFailure::unreachable(source_name.as_str(), err))?;
    debug!(source = source_name.as_str(), bytes = raw.len(), "catalogue read");
    serde_json::from_str::<T>(&raw).map_err(|err| LoadFailure::malformed(source_name, err))
}

pub async fn load_scenario_catalogue(
    path: impl AsRef<Path>,
) -> Result<ScenarioCatalogue, LoadFailure> {
    read_json(path.as_ref()).await
}

pub async fn load_question_catalogue(
    path: impl AsRef<Path>,
) -> Result<QuestionCatalogue, LoadFailure> {
    read_json(path.as_ref()).await
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn missing_file_is_unreachable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_scenario_catalogue(dir.path().join("absent.json"))
            .await
            .expect_err("missing file");
        assert!(matches!(err, LoadFailure::Unreachable { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[tokio::test]
    async fn scenario_missing_choices_is_malformed() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"scenarios": [{{"id": "x", "title": "X", "age_range": {{"min": 18, "max": 30}}}}]}}"#
        )
        .expect("write");
        let err = load_scenario_catalogue(file.path())
            .await
            .expect_err("choices are required");
        assert!(matches!(err, LoadFailure::Malformed { .. }));
    }

    #[tokio::test]
    async fn question_catalogue_parses() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"questions": [{{"id": "q", "text": "?", "choices": [{{"text": "yes", "ocean_weights": {{"E": 3}}}}]}}]}}"#
        )
        .expect("write");
        let catalogue = load_question_catalogue(file.path()).await.expect("valid");
        assert_eq!(catalogue.questions.len(), 1);
        assert_eq!(catalogue.questions[0].choices[0].ocean_weights["E"], 3.0);
    }
}
