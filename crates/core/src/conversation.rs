//! Multi-step conversational intake.
//!
//! Three rounds of fixed follow-up questions gather severity, context and background before the
//! collected answers are compiled into one description and triaged. The final analysis itself
//! is run by [`crate::Dispatcher::continue_conversation`].

use crate::TriageResult;
use serde::{Deserialize, Serialize};

/// Step at which the conversation stops asking and produces an analysis.
pub const FINAL_STEP: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    /// Input kind for the client; always `text` today.
    pub kind: String,
    pub placeholder: String,
}

impl Question {
    fn text(id: &str, question: &str, placeholder: &str) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            kind: "text".into(),
            placeholder: placeholder.into(),
        }
    }
}

/// A round of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStep {
    pub step: u8,
    pub step_title: String,
    pub questions: Vec<Question>,
}

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

impl Exchange {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalAnalysis {
    pub result: TriageResult,
    pub conversation_summary: Vec<Exchange>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversationOutcome {
    Questions(ConversationStep),
    Final(FinalAnalysis),
}

/// First round of questions for a new conversation.
pub fn start_conversation() -> ConversationStep {
    questions_for_step(1)
}

/// Questions for `step`. Steps below 1 are treated as 1, above 3 as 3.
pub fn questions_for_step(step: u8) -> ConversationStep {
    match step {
        0 | 1 => ConversationStep {
            step: 1,
            step_title: "Understanding Your Symptoms".into(),
            questions: vec![
                Question::text(
                    "severity",
                    "On a scale of 1-10, how severe is your discomfort? (1 = mild, 10 = severe)",
                    "e.g., 7 out of 10",
                ),
                Question::text(
                    "duration",
                    "How long have you been experiencing these symptoms?",
                    "e.g., 3 days, 2 weeks, several months",
                ),
                Question::text(
                    "location",
                    "Can you describe the specific location or area affected?",
                    "e.g., right side of head, lower back, entire chest",
                ),
            ],
        },
        2 => ConversationStep {
            step: 2,
            step_title: "Additional Details".into(),
            questions: vec![
                Question::text(
                    "related_symptoms",
                    "Are you experiencing any other symptoms along with this? (e.g., fever, nausea, fatigue)",
                    "e.g., mild fever, headache, loss of appetite",
                ),
                Question::text(
                    "triggers",
                    "Does anything make it better or worse? (activities, time of day, food, etc.)",
                    "e.g., worse when lying down, better after eating",
                ),
                Question::text(
                    "recent_changes",
                    "Have there been any recent changes in your health, diet, or medications?",
                    "e.g., started new medication, travel, stress",
                ),
            ],
        },
        _ => ConversationStep {
            step: 3,
            step_title: "Medical Background".into(),
            questions: vec![
                Question::text(
                    "medical_history",
                    "Do you have any relevant medical conditions or allergies?",
                    "e.g., diabetes, high blood pressure, allergies",
                ),
                Question::text(
                    "medications",
                    "What medications or supplements are you currently taking?",
                    "e.g., aspirin, vitamins, prescription drugs",
                ),
                Question::text(
                    "main_concern",
                    "What concerns you most about these symptoms?",
                    "e.g., pain intensity, impact on work, worry about serious illness",
                ),
            ],
        },
    }
}

/// Join the history into a single description: `question: answer | question: answer`.
///
/// Exchanges with a blank answer are skipped.
pub fn compile_description(history: &[Exchange]) -> String {
    history
        .iter()
        .filter(|e| !e.answer.trim().is_empty())
        .map(|e| format!("{}: {}", e.question.trim(), e.answer.trim()))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Join only the non-blank answers, separated by `. `.
///
/// Question wording carries keywords of its own ("mild", "fever"); keyword rules only ever see
/// this text.
pub fn compile_answers(history: &[Exchange]) -> String {
    history
        .iter()
        .map(|e| e.answer.trim())
        .filter(|a| !a.is_empty())
        .collect::<Vec<_>>()
        .join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_steps_of_three_questions() {
        for step in 1..FINAL_STEP {
            let round = questions_for_step(step);
            assert_eq!(round.step, step);
            assert_eq!(round.questions.len(), 3);
            assert!(round.questions.iter().all(|q| q.kind == "text"));
        }
        assert_eq!(start_conversation(), questions_for_step(1));
    }

    #[test]
    fn test_out_of_range_steps_clamp() {
        assert_eq!(questions_for_step(0).step, 1);
        assert_eq!(questions_for_step(9).step, 3);
    }

    #[test]
    fn test_question_ids_unique_across_steps() {
        let mut ids: Vec<String> = (1..FINAL_STEP)
            .flat_map(|s| questions_for_step(s).questions)
            .map(|q| q.id)
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_compile_description() {
        let history = vec![
            Exchange::new("Initial complaint", "sore throat"),
            Exchange::new("Duration", " 3 days "),
            Exchange::new("Medications", "  "),
        ];
        assert_eq!(
            compile_description(&history),
            "Initial complaint: sore throat | Duration: 3 days"
        );
        assert_eq!(compile_description(&[]), "");
    }

    #[test]
    fn test_compile_answers_drops_question_text() {
        let step_one = questions_for_step(1);
        let history = vec![
            Exchange::new("What brings you in?", "a throbbing headache"),
            Exchange::new(step_one.questions[0].question.clone(), "9"),
            Exchange::new("Medications", " "),
        ];
        assert_eq!(compile_answers(&history), "a throbbing headache. 9");
    }
}
