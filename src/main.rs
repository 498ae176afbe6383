// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI Tutor CLI
//!
//! Runs one interactive session: pick a topic, read a generated lesson,
//! answer its quiz, and get tutor feedback on every wrong answer.

use ai_tutor::{
    config::{self, Config},
    db::FirestoreDb,
    models::{Unit, UnitId},
    services::QuizSession,
    AppState,
};
use anyhow::Context;
use std::io::Write;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Session failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let api_key = config::openai_api_key().context("No API key for the language model")?;

    let db = match &config.user {
        Some(_) => Some(
            FirestoreDb::shared(&config)
                .await
                .context("Failed to open the document store")?,
        ),
        None => None,
    };
    tracing::info!(
        model = %config.model,
        persist = db.is_some(),
        "Starting tutoring session"
    );

    let state = AppState::new(config, api_key, db);
    let mut input = Prompt::new();

    if let (Some(db), Some(user)) = (state.db, &state.config.user) {
        db.upsert_profile(
            &user.uid,
            &user.email,
            &user.display_name,
            user.photo_url.as_deref(),
        )
        .await
        .context("Failed to save profile")?;
        println!("Welcome, {}!", user.display_name);
    }

    let Some(topic) = input.ask("What topic should this unit cover?").await? else {
        return Ok(());
    };

    let stored = match (state.db, &state.config.user) {
        (Some(db), Some(user)) => db
            .get_progress(&user.uid, &topic)
            .await
            .context("Failed to load progress")?,
        _ => None,
    };
    let unit_id = match stored.as_ref().and_then(|p| p.active_unit_id.as_deref()) {
        Some(id) => id.parse().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Unrecognized active unit, starting the path over");
            UnitId::FIRST
        }),
        None => UnitId::FIRST,
    };
    if let Some(progress) = &stored {
        println!(
            "Welcome back to {}: {} coins, continuing with unit {}.",
            topic, progress.coins, unit_id
        );
    }

    println!("Generating unit {} on {}...", unit_id, topic);
    let unit = state
        .content
        .generate_unit_at(&topic, unit_id, None)
        .await
        .context("Failed to generate unit")?;
    print_lesson(&unit);

    let starting_coins = stored.as_ref().map_or(0, |p| p.coins);
    let mut quiz = QuizSession::new(unit.first_lesson()).with_coins(starting_coins);
    while let Some(item) = quiz.current().cloned() {
        let (number, total) = quiz.position();
        println!("\nQuestion {}/{}: {}", number, total, item.question.question);
        for (letter, option) in ('A'..='Z').zip(&item.question.options) {
            println!("  {}) {}", letter, option);
        }

        let Some(answer) = input.ask("Your answer:").await? else {
            break;
        };
        let Some(graded) = quiz.answer(&answer) else {
            break;
        };

        if graded.correct {
            println!("Correct! {:+}", graded.coins_delta);
            continue;
        }
        println!("Not quite. {:+}", graded.coins_delta);

        let context = format!(
            "{}\nOptions: {}\nUser answer: {}\nCorrect answer: {}",
            item.content,
            item.question.options.join(", "),
            answer,
            graded.correct_answer
        );
        let feedback = state
            .tutor
            .reply(&item.question.question, &context, None)
            .await
            .context("Failed to get tutor feedback")?;
        println!("\n{}", feedback);
    }

    let (correct, total) = quiz.score();
    println!(
        "\nYou got {}/{} right ({:+} coins, {} total).",
        correct,
        total,
        quiz.coins_earned(),
        quiz.coins()
    );

    if !quiz.is_finished() {
        tracing::info!(topic = %topic, "Quiz abandoned, progress not saved");
        return Ok(());
    }

    if let (Some(db), Some(user)) = (state.db, &state.config.user) {
        let update = quiz.progress_update(unit_id, stored.as_ref());
        db.save_progress(
            &user.uid,
            &topic,
            &update.units,
            update.coins,
            Some(&update.active_unit_id),
        )
        .await
        .context("Failed to save progress")?;
        println!("Progress saved, next up is unit {}.", update.active_unit_id);
    }

    Ok(())
}

fn print_lesson(unit: &Unit) {
    if !unit.title.is_empty() {
        println!("\n== {} ==", unit.title);
    }
    if !unit.skills.is_empty() {
        println!("Skills: {}", unit.skills.join(", "));
    }
    for item in unit.first_lesson() {
        println!("\n{}", item.content);
    }
}

/// Line-oriented console input.
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `question` and read one non-empty line; `None` on end of input.
    async fn ask(&mut self, question: &str) -> std::io::Result<Option<String>> {
        loop {
            print!("{} ", question);
            std::io::stdout().flush()?;

            match self.lines.next_line().await? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(Some(line.trim().to_string())),
                None => return Ok(None),
            }
        }
    }
}

/// Initialize structured JSON logging on stderr, leaving stdout to the session.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(format)
        .init();
}
