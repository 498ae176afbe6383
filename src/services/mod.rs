// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - language model clients and quiz logic.

pub mod content;
pub mod openai;
pub mod quiz;
pub mod tutor;

pub use content::ContentGenerator;
pub use openai::ChatClient;
pub use quiz::{Graded, ProgressUpdate, QuizSession};
pub use tutor::{Feedback, FeedbackStyle, Tutor, TutorFeedback};
