use std::collections::HashSet;

use crate::models::domain::{Answer, AnswerKey, GradingStatus, Question, QuizResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerGrade {
    Correct,
    Incorrect,
    /// Waits for a teacher.
    Manual,
}

/// Grades one answer against its key. Missing answers and answers of the
/// wrong shape are simply wrong.
pub fn grade_answer(key: &AnswerKey, answer: Option<&Answer>) -> AnswerGrade {
    if let AnswerKey::LongAnswer { .. } = key {
        return AnswerGrade::Manual;
    }
    let correct = match (key, answer) {
        (AnswerKey::SingleChoice { correct_option, .. }, Some(Answer::Choice(chosen))) => {
            chosen == correct_option
        }
        (AnswerKey::MultiChoice { correct_options, .. }, Some(Answer::Choices(chosen))) => {
            let expected: HashSet<_> = correct_options.iter().collect();
            let given: HashSet<_> = chosen.iter().collect();
            given.len() == chosen.len() && expected == given
        }
        (AnswerKey::FillBlank { correct_answer }, Some(Answer::Text(text))) => {
            text.trim().to_lowercase() == correct_answer.trim().to_lowercase()
        }
        (AnswerKey::Matching { pairs }, Some(Answer::Pairs(given))) => {
            given.len() == pairs.len()
                && pairs
                    .iter()
                    .all(|p| given.get(&p.left).is_some_and(|r| *r == p.right))
        }
        (AnswerKey::Ordering { correct_order }, Some(Answer::Order(given))) => {
            given == correct_order
        }
        _ => false,
    };
    if correct {
        AnswerGrade::Correct
    } else {
        AnswerGrade::Incorrect
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Recomputes `score` and `status` from the answers and any manual scores.
///
/// `questions` are in quiz order so positions line up with answer keys.
/// `passing_score` is `None` when the quiz is gone; a finished result is then
/// just `graded`.
pub fn grade_result(result: &mut QuizResult, questions: &[Question], passing_score: Option<u8>) {
    let mut points = Vec::with_capacity(questions.len());
    let mut manual_total = 0usize;
    let mut manual_graded = 0usize;

    for (index, question) in questions.iter().enumerate() {
        match grade_answer(&question.answer_key, result.answers.get(&index)) {
            AnswerGrade::Correct => points.push(100.0),
            AnswerGrade::Incorrect => points.push(0.0),
            AnswerGrade::Manual => {
                manual_total += 1;
                if let Some(score) = result.manual_scores.get(&index) {
                    manual_graded += 1;
                    points.push(score.clamp(0.0, 100.0));
                }
            }
        }
    }

    if manual_graded < manual_total {
        result.score = None;
        result.status = if manual_graded == 0 {
            GradingStatus::NeedsGrading
        } else {
            GradingStatus::PartiallyGraded
        };
        return;
    }

    let score = if points.is_empty() {
        0.0
    } else {
        round_one_decimal(points.iter().sum::<f64>() / points.len() as f64)
    };
    result.score = Some(score);
    result.status = match passing_score {
        Some(passing) if score >= f64::from(passing) => GradingStatus::Passed,
        Some(_) => GradingStatus::Failed,
        None => GradingStatus::Graded,
    };
}
