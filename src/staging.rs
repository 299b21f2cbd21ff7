//! Consumer side of the persistence bridge: staged answers, grading, and
//! wrong-answer-notebook drafts.
//!
//! The engine produces opaque image payloads; these models decide where a
//! payload lands — the `answer` value of a quiz submission or the `drawing`
//! field of a notebook entry — and compose the documents written to the
//! external store. The store itself stays behind the host.

#[cfg(test)]
#[path = "staging_test.rs"]
mod staging_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::export::{EngineKey, ExportUpdate};

/// Identifier of an authored problem, assigned by the backend.
pub type ProblemId = String;

// --- Engine-key helpers ---

/// Engine key for a problem's drawing-answer surface.
#[must_use]
pub fn answer_key(problem_id: &str) -> EngineKey {
    format!("drawing-{problem_id}")
}

/// Engine key for a problem's notebook-annotation surface.
#[must_use]
pub fn note_key(problem_id: &str) -> EngineKey {
    format!("note-{problem_id}")
}

/// Which surface family an engine key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Answer,
    Note,
}

/// Split an engine key back into its surface kind and problem id, for
/// routing bridge callbacks to the right staging model.
#[must_use]
pub fn parse_key(key: &str) -> Option<(SurfaceKind, &str)> {
    if let Some(id) = key.strip_prefix("drawing-") {
        Some((SurfaceKind::Answer, id))
    } else if let Some(id) = key.strip_prefix("note-") {
        Some((SurfaceKind::Note, id))
    } else {
        None
    }
}

// --- Problems ---

/// The kind of an authored problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemKind {
    /// Multiple choice; graded by option index.
    Multiple,
    /// Short text answer; graded case-insensitively, ignoring surrounding
    /// whitespace.
    Short,
    /// Freehand drawing; excluded from auto-grading.
    Drawing,
}

/// An authored problem as stored in the problem bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    #[serde(rename = "type")]
    pub kind: ProblemKind,
    #[serde(default)]
    pub question: String,
    /// Choices for multiple-choice problems.
    #[serde(default)]
    pub options: Vec<String>,
    /// Index into `options` of the correct choice.
    #[serde(default)]
    pub correct: Option<usize>,
    /// Expected text for short-answer problems.
    #[serde(default)]
    pub answer: Option<String>,
}

// --- Answers ---

/// One staged answer value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Selected option index for a multiple-choice problem.
    Choice(usize),
    /// Typed text for a short-answer problem.
    Text(String),
    /// Exported image payload for a drawing problem.
    Drawing(String),
}

impl Answer {
    /// The raw value persisted into the submission document.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Choice(index) => json!(index),
            Self::Text(text) => json!(text),
            Self::Drawing(uri) => json!(uri),
        }
    }

    /// Whether this counts as answered for the progress indicator. Empty
    /// text does not.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        match self {
            Self::Text(text) => !text.is_empty(),
            Self::Choice(_) | Self::Drawing(_) => true,
        }
    }
}

/// The auto-graded outcome of one wrong answer, carried into the
/// wrong-answer notebook flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedProblem {
    pub problem_id: ProblemId,
    /// What the student answered, if anything.
    pub given: Option<Answer>,
    /// Display form of the expected answer (option text for multiple
    /// choice).
    pub expected: String,
}

/// Aggregate grading outcome for one quiz run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeReport {
    pub total: usize,
    /// Drawing problems, which are teacher-graded later.
    pub drawing_count: usize,
    pub auto_graded: usize,
    pub correct_count: usize,
    /// Auto-graded problems answered wrong, in problem order.
    pub wrong: Vec<GradedProblem>,
    /// Rounded percent over auto-graded problems; 0 when there are none.
    pub score: u32,
}

/// Per-problem staged answers for one quiz run — the in-memory model the
/// engine's export bridge writes into.
#[derive(Debug, Default)]
pub struct AnswerSheet {
    answers: HashMap<ProblemId, Option<Answer>>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a multiple-choice selection.
    pub fn set_choice(&mut self, problem_id: &str, index: usize) {
        self.answers.insert(problem_id.to_owned(), Some(Answer::Choice(index)));
    }

    /// Stage a short-answer text.
    pub fn set_text(&mut self, problem_id: &str, text: impl Into<String>) {
        self.answers.insert(problem_id.to_owned(), Some(Answer::Text(text.into())));
    }

    /// Stage a bridge update for a drawing problem. `Cleared` stages the
    /// "no answer drawn" sentinel; `Failed` keeps the last good payload.
    pub fn apply_export(&mut self, problem_id: &str, update: &ExportUpdate) {
        match update {
            ExportUpdate::Image(uri) => {
                self.answers.insert(problem_id.to_owned(), Some(Answer::Drawing(uri.clone())));
            }
            ExportUpdate::Cleared => {
                self.answers.insert(problem_id.to_owned(), None);
            }
            ExportUpdate::Failed(_) => {}
        }
    }

    /// The staged answer for a problem, if any.
    #[must_use]
    pub fn answer(&self, problem_id: &str) -> Option<&Answer> {
        self.answers.get(problem_id).and_then(Option::as_ref)
    }

    /// How many problems have a non-empty answer (drives the progress bar).
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers
            .values()
            .filter(|answer| answer.as_ref().is_some_and(Answer::is_filled))
            .count()
    }

    /// Whether every given problem has a non-empty answer.
    #[must_use]
    pub fn is_complete(&self, problems: &[Problem]) -> bool {
        problems.iter().all(|p| self.answer(&p.id).is_some_and(Answer::is_filled))
    }

    /// Auto-grade against the problem set. Drawing problems are counted but
    /// never graded; a missing or mismatched answer is wrong.
    #[must_use]
    pub fn grade(&self, problems: &[Problem]) -> GradeReport {
        let mut wrong = Vec::new();
        let mut drawing_count = 0;
        let mut auto_graded = 0;
        let mut correct_count = 0;

        for problem in problems {
            if problem.kind == ProblemKind::Drawing {
                drawing_count += 1;
                continue;
            }
            auto_graded += 1;
            let given = self.answer(&problem.id);
            let correct = match (problem.kind, given) {
                (ProblemKind::Multiple, Some(Answer::Choice(index))) => {
                    problem.correct == Some(*index)
                }
                (ProblemKind::Short, Some(Answer::Text(text))) => problem
                    .answer
                    .as_ref()
                    .is_some_and(|expected| normalized(expected) == normalized(text)),
                _ => false,
            };
            if correct {
                correct_count += 1;
            } else {
                wrong.push(GradedProblem {
                    problem_id: problem.id.clone(),
                    given: given.cloned(),
                    expected: expected_display(problem),
                });
            }
        }

        GradeReport {
            total: problems.len(),
            drawing_count,
            auto_graded,
            correct_count,
            wrong,
            score: percent(correct_count, auto_graded),
        }
    }

    /// The `answers` map as persisted in the submission document. Unanswered
    /// problems appear as explicit nulls.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let map: serde_json::Map<String, Value> = self
            .answers
            .iter()
            .map(|(id, answer)| {
                (id.clone(), answer.as_ref().map_or(Value::Null, Answer::to_value))
            })
            .collect();
        Value::Object(map)
    }
}

fn normalized(text: &str) -> String {
    text.trim().to_lowercase()
}

fn expected_display(problem: &Problem) -> String {
    match problem.kind {
        ProblemKind::Multiple => problem
            .correct
            .and_then(|index| problem.options.get(index))
            .cloned()
            .unwrap_or_default(),
        ProblemKind::Short | ProblemKind::Drawing => {
            problem.answer.clone().unwrap_or_default()
        }
    }
}

fn percent(correct: usize, out_of: usize) -> u32 {
    if out_of == 0 {
        return 0;
    }
    let rounded = (correct * 100 + out_of / 2) / out_of;
    u32::try_from(rounded).unwrap_or(100)
}

// --- Persisted documents ---

/// Who is taking the quiz, as recorded on persisted documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentInfo {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
}

/// Which quiz was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizMeta {
    pub grade: u32,
    pub unit: u32,
    pub difficulty: u32,
}

/// Compose the submission document for the external `results` collection.
///
/// `timestamp_ms` is the host clock in milliseconds since the epoch; the
/// store treats it as an opaque ordering field.
#[must_use]
pub fn result_document(
    student: &StudentInfo,
    meta: QuizMeta,
    report: &GradeReport,
    sheet: &AnswerSheet,
    timestamp_ms: i64,
) -> Value {
    json!({
        "userId": student.user_id,
        "userName": student.user_name,
        "grade": meta.grade,
        "unit": meta.unit,
        "difficulty": meta.difficulty,
        "totalProblems": report.total,
        "drawingProblems": report.drawing_count,
        "autoGradedProblems": report.auto_graded,
        "correctCount": report.correct_count,
        "wrongCount": report.wrong.len(),
        "score": report.score,
        "answers": sheet.to_value(),
        "wrongProblems": report.wrong.iter().map(|w| w.problem_id.clone()).collect::<Vec<_>>(),
        "timestamp": timestamp_ms,
    })
}

// --- Notebook drafts ---

/// How a notebook entry was authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteMode {
    Text,
    Drawing,
}

/// One wrong-answer-notebook entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    #[serde(rename = "problemId")]
    pub problem_id: ProblemId,
    /// The student's own diagnosis of why the answer was wrong.
    pub reason: String,
    pub mode: NoteMode,
    /// Typed reflection; populated only in text mode.
    pub content: Option<String>,
    /// Annotation image payload; populated only in drawing mode.
    pub drawing: Option<String>,
}

/// The in-memory wrong-answer notebook being authored for one quiz run.
#[derive(Debug, Default)]
pub struct NoteDraft {
    entries: Vec<NoteEntry>,
}

impl NoteDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record why the answer was wrong, creating the entry if needed.
    pub fn set_reason(&mut self, problem_id: &str, reason: impl Into<String>) {
        self.entry_mut(problem_id).reason = reason.into();
    }

    /// Switch the entry to text mode; any staged drawing is discarded.
    pub fn set_text(&mut self, problem_id: &str, content: impl Into<String>) {
        let entry = self.entry_mut(problem_id);
        entry.mode = NoteMode::Text;
        entry.content = Some(content.into());
        entry.drawing = None;
    }

    /// Stage a bridge update for the annotation canvas. Switches the entry
    /// to drawing mode and discards typed content; `Failed` keeps the last
    /// good payload.
    pub fn apply_export(&mut self, problem_id: &str, update: &ExportUpdate) {
        match update {
            ExportUpdate::Image(uri) => {
                let entry = self.entry_mut(problem_id);
                entry.mode = NoteMode::Drawing;
                entry.drawing = Some(uri.clone());
                entry.content = None;
            }
            ExportUpdate::Cleared => {
                let entry = self.entry_mut(problem_id);
                entry.mode = NoteMode::Drawing;
                entry.drawing = None;
                entry.content = None;
            }
            ExportUpdate::Failed(_) => {}
        }
    }

    /// The entry for a problem, if one has been started.
    #[must_use]
    pub fn entry(&self, problem_id: &str) -> Option<&NoteEntry> {
        self.entries.iter().find(|e| e.problem_id == problem_id)
    }

    /// All entries, in the order they were started.
    #[must_use]
    pub fn entries(&self) -> &[NoteEntry] {
        &self.entries
    }

    fn entry_mut(&mut self, problem_id: &str) -> &mut NoteEntry {
        let index = match self.entries.iter().position(|e| e.problem_id == problem_id) {
            Some(index) => index,
            None => {
                self.entries.push(NoteEntry {
                    problem_id: problem_id.to_owned(),
                    reason: String::new(),
                    mode: NoteMode::Text,
                    content: None,
                    drawing: None,
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }
}

/// Compose the notebook document for the external `notes` collection.
#[must_use]
pub fn note_document(
    student: &StudentInfo,
    meta: QuizMeta,
    draft: &NoteDraft,
    timestamp_ms: i64,
) -> Value {
    json!({
        "userId": student.user_id,
        "userName": student.user_name,
        "grade": meta.grade,
        "unit": meta.unit,
        "difficulty": meta.difficulty,
        "problems": draft.entries(),
        "timestamp": timestamp_ms,
    })
}
