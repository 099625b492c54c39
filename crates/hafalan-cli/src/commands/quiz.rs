//! The `hafalan quiz` command.

use std::path::PathBuf;

use anyhow::Result;

use hafalan_core::model::{LanguageFilter, QuizQuestion, QuizSettings};
use hafalan_core::practice::Practice;

use super::{answer_lines, open_store, print_score, quiz_rng};

pub async fn execute(
    config_path: Option<PathBuf>,
    from: LanguageFilter,
    to: LanguageFilter,
    max: Option<usize>,
    include_mastered: Option<bool>,
    seed: Option<u64>,
) -> Result<()> {
    let (config, store) = open_store(config_path.as_deref())?;
    let settings = QuizSettings {
        from,
        to,
        max_questions: max.unwrap_or(config.max_questions),
        include_mastered: include_mastered.unwrap_or(config.include_mastered),
    };

    let practice = Practice::new(store.as_ref(), store.as_ref(), config.owner_id);
    let mut rng = quiz_rng(seed);
    let mut session = practice.start_vocabulary(&settings, &mut rng).await?;

    if session.is_finished() {
        println!("Nothing to practice: no vocabulary matches {from} -> {to}.");
        return Ok(());
    }
    println!("Type the translation. `:skip` skips a question, `:quit` ends the session.");

    let mut lines = answer_lines();
    while let Some(question) = session.current().cloned() {
        let progress = session.progress();
        println!();
        println!(
            "[{}/{}] {}",
            progress.index + 1,
            progress.total,
            describe(&question)
        );

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            ":quit" | ":q" => break,
            ":skip" | ":s" => {
                session.skip();
                println!("  Skipped. Answer: {}", question.answer);
            }
            answer => {
                let Some(report) = practice.submit(&mut session, answer).await else {
                    break;
                };
                if report.outcome.correct {
                    println!("  Correct!");
                    if report.outcome.write.is_some() && report.write_error.is_none() {
                        println!("  {} is now mastered.", question.item);
                    }
                } else {
                    println!("  Wrong. Answer: {}", question.answer);
                }
                if let Some(e) = report.write_error {
                    eprintln!("  Warning: mastery was not saved: {e}");
                }
            }
        }
    }

    print_score(&session.progress());
    Ok(())
}

fn describe(question: &QuizQuestion) -> String {
    match (question.from, question.to) {
        (Some(from), Some(to)) => format!("{from} -> {to}: {}", question.prompt),
        _ => question.prompt.clone(),
    }
}
