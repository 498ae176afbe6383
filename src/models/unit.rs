// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Learning unit produced by the content generator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position of a unit on a topic's learning path, written `L{level}U{unit}`.
///
/// Levels and units are numbered from 1. Each level holds
/// [`UnitId::UNITS_PER_LEVEL`] units; after the last one the path continues
/// at the first unit of the next level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId {
    pub level: u32,
    pub unit: u32,
}

impl UnitId {
    pub const FIRST: UnitId = UnitId { level: 1, unit: 1 };
    pub const UNITS_PER_LEVEL: u32 = 3;

    /// The unit unlocked by completing this one.
    pub fn next(self) -> UnitId {
        if self.unit >= Self::UNITS_PER_LEVEL {
            UnitId {
                level: self.level + 1,
                unit: 1,
            }
        } else {
            UnitId {
                level: self.level,
                unit: self.unit + 1,
            }
        }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}U{}", self.level, self.unit)
    }
}

impl FromStr for UnitId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s
            .strip_prefix('L')
            .and_then(|rest| rest.split_once('U'))
            .and_then(|(level, unit)| {
                Some((level.parse::<u32>().ok()?, unit.parse::<u32>().ok()?))
            });

        match parsed {
            Some((level, unit)) if level > 0 && unit > 0 => Ok(UnitId { level, unit }),
            _ => Err(format!("invalid unit ID: {}", s)),
        }
    }
}

/// A generated unit. Only the first lesson is consumed by the quiz.
///
/// The unit carries no ID of its own; the caller knows which [`UnitId`] it
/// asked the generator for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Unit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Lesson 1: teaching blocks, each followed by its questions
    #[serde(rename = "LESSON1CONTENT", default)]
    pub lesson1_content: Vec<LessonItem>,
}

impl Unit {
    pub fn first_lesson(&self) -> &[LessonItem] {
        &self.lesson1_content
    }

    pub fn question_count(&self) -> usize {
        self.lesson1_content.iter().map(|i| i.questions.len()).sum()
    }
}

/// One teaching block of a lesson.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LessonItem {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A multiple-choice question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// The correct option text
    #[serde(alias = "correct_answer")]
    pub answer: String,
}
