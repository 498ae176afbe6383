// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod progress;
pub mod unit;
pub mod user;

pub use progress::ProgressRecord;
pub use unit::{LessonItem, Question, Unit, UnitId};
pub use user::{ProfileSummary, UserProfile};
