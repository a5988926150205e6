//! Question-driven personality assessment run before the life simulation.

use contracts::{Question, QuestionCatalogue};
use tracing::{debug, info};

use crate::error::{LoadFailure, SimError};
use crate::trait_engine::TraitEngine;

#[derive(Debug, Clone, Default)]
pub struct Assessment {
    questions: Vec<Question>,
    cursor: usize,
    answers: Vec<usize>,
}

impl Assessment {
    pub fn new(catalogue: QuestionCatalogue) -> Self {
        Self {
            questions: catalogue.questions,
            cursor: 0,
            answers: Vec::new(),
        }
    }

    /// Replaces the question list and rewinds.
    pub fn load_questions(&mut self, catalogue: QuestionCatalogue) -> usize {
        *self = Self::new(catalogue);
        info!(questions = self.questions.len(), "question catalogue loaded");
        self.questions.len()
    }

    pub fn load_questions_str(
        &mut self,
        source_name: &str,
        raw: &str,
    ) -> Result<usize, LoadFailure> {
        let catalogue = serde_json::from_str::<QuestionCatalogue>(raw)
            .map_err(|err| LoadFailure::malformed(source_name, err))?;
        Ok(self.load_questions(catalogue))
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.cursor)
    }

    /// Scores the answer at `choice_index` for the current question.
    pub fn answer(
        &mut self,
        traits: &mut TraitEngine,
        choice_index: usize,
    ) -> Result<(), SimError> {
        let question = self
            .questions
            .get(self.cursor)
            .ok_or(SimError::AssessmentComplete)?;
        let choice = question
            .choices
            .get(choice_index)
            .ok_or_else(|| SimError::UnknownAnswer {
                question_id: question.id.clone(),
                index: choice_index,
            })?;

        traits.apply_weights(&choice.ocean_weights);
        debug!(question_id = question.id.as_str(), choice_index, "question answered");
        self.answers.push(choice_index);
        self.cursor += 1;
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.questions.len()
    }

    /// `(answered, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor, self.questions.len())
    }

    pub fn answers(&self) -> &[usize] {
        &self.answers
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.answers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTIONS: &str = r#"{
        "questions": [
            {
                "id": "q1",
                "text": "At a party you...",
                "choices": [
                    { "text": "work the room", "ocean_weights": { "E": 10 } },
                    { "text": "find a quiet corner", "ocean_weights": { "E": -10, "O": 5 } }
                ]
            },
            {
                "id": "q2",
                "text": "Deadlines are...",
                "choices": [
                    { "text": "sacred", "ocean_weights": { "C": 8 } },
                    { "text": "suggestions" }
                ]
            }
        ]
    }"#;

    #[test]
    fn answers_feed_the_trait_engine_in_order() {
        let mut assessment = Assessment::default();
        assert_eq!(assessment.load_questions_str("inline", QUESTIONS).expect("valid"), 2);
        let mut traits = TraitEngine::default();

        assert_eq!(assessment.current_question().map(|q| q.id.as_str()), Some("q1"));
        assessment.answer(&mut traits, 1).expect("valid answer");
        assert_eq!(traits.ocean().extraversion, 40.0);
        assert_eq!(traits.ocean().openness, 55.0);

        assessment.answer(&mut traits, 1).expect("weightless answer");
        // The weightless answer leaves every band where the first answer put it.
        assert_eq!(traits.confidence().extraversion, 28.0);
        assert_eq!(traits.confidence().openness, 28.0);
        assert_eq!(traits.confidence().conscientiousness, 30.0);
        assert!(assessment.is_complete());
        assert_eq!(assessment.progress(), (2, 2));
        assert_eq!(assessment.answers(), &[1, 1]);
        assert_eq!(assessment.answer(&mut traits, 0), Err(SimError::AssessmentComplete));
    }

    #[test]
    fn out_of_range_answer_is_rejected_without_advancing() {
        let mut assessment = Assessment::default();
        assessment.load_questions_str("inline", QUESTIONS).expect("valid");
        let mut traits = TraitEngine::default();
        let err = assessment.answer(&mut traits, 5).expect_err("no such answer");
        assert_eq!(
            err,
            SimError::UnknownAnswer {
                question_id: "q1".to_string(),
                index: 5
            }
        );
        assert_eq!(assessment.progress(), (0, 2));
        assert_eq!(traits.state(), TraitEngine::default().state());
    }

    #[test]
    fn reset_rewinds_but_keeps_questions() {
        let mut assessment = Assessment::default();
        assessment.load_questions_str("inline", QUESTIONS).expect("valid");
        let mut traits = TraitEngine::default();
        assessment.answer(&mut traits, 0).expect("valid answer");
        assessment.reset();
        assert_eq!(assessment.progress(), (0, 2));
        assert!(assessment.answers().is_empty());
    }

    #[test]
    fn malformed_questions_keep_previous_catalogue() {
        let mut assessment = Assessment::default();
        assessment.load_questions_str("inline", QUESTIONS).expect("valid");
        let err = assessment
            .load_questions_str("bad", r#"{"questions": "nope"}"#)
            .expect_err("malformed");
        assert!(matches!(err, LoadFailure::Malformed { .. }));
        assert_eq!(assessment.progress(), (0, 2));
    }
}
