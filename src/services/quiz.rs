// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Quiz over the first lesson of a unit.

use crate::models::progress::status;
use crate::models::{LessonItem, ProgressRecord, Question, UnitId};
use std::collections::BTreeMap;

/// Coins awarded per correct answer.
pub const COINS_PER_CORRECT: i64 = 10;

/// Coins taken per wrong answer. The balance never drops below zero.
pub const COINS_PER_WRONG: i64 = 5;

/// Share of correct answers needed to complete a unit.
pub const PASS_RATIO: f64 = 0.7;

/// Result of grading one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Graded {
    pub correct: bool,
    pub correct_answer: String,
    /// Change to the coin balance caused by this answer
    pub coins_delta: i64,
}

/// A question with the lesson text it belongs to.
#[derive(Debug, Clone)]
pub struct QuizItem {
    pub content: String,
    pub question: Question,
}

/// Walks the questions of a lesson in order.
#[derive(Debug)]
pub struct QuizSession {
    items: Vec<QuizItem>,
    position: usize,
    correct: usize,
    start_coins: i64,
    coins: i64,
}

/// What to save for a topic once a unit's quiz is finished.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub units: BTreeMap<String, String>,
    pub coins: i64,
    pub active_unit_id: String,
}

impl QuizSession {
    pub fn new(lesson: &[LessonItem]) -> Self {
        let items = lesson
            .iter()
            .flat_map(|item| {
                item.questions.iter().map(|q| QuizItem {
                    content: item.content.clone(),
                    question: q.clone(),
                })
            })
            .collect();

        Self {
            items,
            position: 0,
            correct: 0,
            start_coins: 0,
            coins: 0,
        }
    }

    /// Start from an existing coin balance.
    pub fn with_coins(mut self, coins: i64) -> Self {
        self.start_coins = coins.max(0);
        self.coins = self.start_coins;
        self
    }

    /// The next unanswered question, `None` when finished.
    pub fn current(&self) -> Option<&QuizItem> {
        self.items.get(self.position)
    }

    /// 1-based number of the current question and the total.
    pub fn position(&self) -> (usize, usize) {
        (self.position + 1, self.items.len())
    }

    /// Grade `answer` against the current question and advance.
    ///
    /// Returns `None` if the quiz is already finished.
    pub fn answer(&mut self, answer: &str) -> Option<Graded> {
        let item = self.items.get(self.position)?;
        let correct = is_correct(&item.question, answer);
        let correct_answer = item.question.answer.clone();

        let before = self.coins;
        self.position += 1;
        if correct {
            self.correct += 1;
            self.coins += COINS_PER_CORRECT;
        } else {
            self.coins = (self.coins - COINS_PER_WRONG).max(0);
        }

        Some(Graded {
            correct,
            correct_answer,
            coins_delta: self.coins - before,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.items.len()
    }

    pub fn score(&self) -> (usize, usize) {
        (self.correct, self.items.len())
    }

    /// Current coin balance.
    pub fn coins(&self) -> i64 {
        self.coins
    }

    /// Net change to the balance during this quiz (negative after penalties).
    pub fn coins_earned(&self) -> i64 {
        self.coins - self.start_coins
    }

    /// Status to record for the unit once the quiz is over.
    pub fn unit_status(&self) -> &'static str {
        let total = self.items.len();
        if total > 0 && self.correct as f64 / total as f64 >= PASS_RATIO {
            status::COMPLETED
        } else {
            status::UNLOCKED
        }
    }

    /// Progress to save after finishing the quiz for `unit`, given what is
    /// already stored for the topic.
    ///
    /// Passing completes `unit`, unlocks the next unit on the path unless it
    /// is already further along, and makes the next unit active. Failing
    /// leaves `unit` unlocked and active. A unit that was completed before
    /// is never moved back.
    pub fn progress_update(
        &self,
        unit: UnitId,
        stored: Option<&ProgressRecord>,
    ) -> ProgressUpdate {
        let mut units = BTreeMap::new();
        let was_completed = stored_status(stored, unit) == status::COMPLETED;

        let active = if self.unit_status() == status::COMPLETED {
            units.insert(unit.to_string(), status::COMPLETED.to_string());
            let next = unit.next();
            if stored_status(stored, next) == status::LOCKED {
                units.insert(next.to_string(), status::UNLOCKED.to_string());
            }
            next
        } else if was_completed {
            unit.next()
        } else {
            units.insert(unit.to_string(), status::UNLOCKED.to_string());
            unit
        };

        ProgressUpdate {
            units,
            coins: self.coins,
            active_unit_id: active.to_string(),
        }
    }
}

fn stored_status(stored: Option<&ProgressRecord>, unit: UnitId) -> &str {
    stored.map_or(status::LOCKED, |record| record.status_of(&unit.to_string()))
}

/// Match by text (trimmed, case-insensitive) or by option letter.
fn is_correct(question: &Question, answer: &str) -> bool {
    let answer = answer.trim();
    let expected = question.answer.trim();

    if answer.eq_ignore_ascii_case(expected) {
        return true;
    }

    option_by_letter(&question.options, answer)
        .is_some_and(|option| option.trim().eq_ignore_ascii_case(expected))
}

fn option_by_letter<'a>(options: &'a [String], answer: &str) -> Option<&'a String> {
    let mut chars = answer.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !letter.is_ascii_uppercase() {
        return None;
    }
    options.get((letter as u8 - b'A') as usize)
}
