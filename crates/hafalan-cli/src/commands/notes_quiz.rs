//! The `hafalan notes-quiz` command.

use std::path::PathBuf;

use anyhow::Result;

use hafalan_core::model::{LanguageFilter, QuizSettings};
use hafalan_core::practice::Practice;

use super::{answer_lines, open_store, print_score, quiz_rng};

pub async fn execute(
    config_path: Option<PathBuf>,
    max: Option<usize>,
    include_mastered: Option<bool>,
    seed: Option<u64>,
) -> Result<()> {
    let (config, store) = open_store(config_path.as_deref())?;
    let settings = QuizSettings {
        from: LanguageFilter::Any,
        to: LanguageFilter::Any,
        max_questions: max.unwrap_or(config.max_questions),
        include_mastered: include_mastered.unwrap_or(config.include_mastered),
    };

    let practice = Practice::new(store.as_ref(), store.as_ref(), config.owner_id);
    let mut rng = quiz_rng(seed);
    let mut session = practice.start_notes(&settings, &mut rng).await?;

    if session.is_finished() {
        println!("Nothing to practice: no notes to recall.");
        return Ok(());
    }
    println!("Recall each note. `show` toggles the answer, `y` / `n` grade yourself.");
    println!("`skip` moves on, `quit` ends the session.");

    let mut lines = answer_lines();
    'session: while let Some(question) = session.current().cloned() {
        let progress = session.progress();
        println!();
        println!("[{}/{}] {}", progress.index + 1, progress.total, question.prompt);

        loop {
            let Some(line) = lines.next_line().await? else {
                break 'session;
            };
            match line.trim().to_lowercase().as_str() {
                "show" | "s" => {
                    if session.toggle_answer() {
                        println!("  {}", question.answer);
                    } else {
                        println!("  (answer hidden)");
                    }
                }
                "y" | "yes" => {
                    if let Some(report) = practice.mark_correct(&mut session).await {
                        if report.outcome.write.is_some() && report.write_error.is_none() {
                            println!("  {} is now mastered.", question.item);
                        }
                        if let Some(e) = report.write_error {
                            eprintln!("  Warning: mastery was not saved: {e}");
                        }
                    }
                    break;
                }
                "n" | "no" => {
                    let shown = session.answer_visible();
                    session.mark_wrong();
                    if !shown {
                        println!("  Answer: {}", question.answer);
                    }
                    break;
                }
                "skip" => {
                    session.skip();
                    break;
                }
                "quit" | "q" => break 'session,
                other => println!("  Unknown command `{other}`; use show, y, n, skip or quit."),
            }
        }
    }

    print_score(&session.progress());
    Ok(())
}
