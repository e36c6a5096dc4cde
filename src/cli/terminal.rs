//! Interactive intake and follow-up prompts.

use aiself::dialog::{AnswerSource, Reply};
use aiself::intake::{Birth, IntakeDraft, validate_decision, validate_identity};
use anyhow::Result;
use console::style;
use dialoguer::{Input, Select};

use super::view::{print_bullet, print_step};

const GENDERS: [&str; 2] = ["male", "female"];

/// Walk the person through both steps of the form, re-asking a step until it
/// validates.
pub fn collect_draft() -> Result<IntakeDraft> {
    let mut draft = IntakeDraft::default();

    print_step(1, 2, "About you");
    loop {
        draft.name = Input::new()
            .with_prompt("  Name")
            .interact_text()?;

        let gender_idx = Select::new()
            .with_prompt("  Gender")
            .items(&GENDERS)
            .default(0)
            .interact()?;
        draft.gender = GENDERS[gender_idx].to_string();

        draft.birth = Input::new()
            .with_prompt("  Birth year or date (YYYY or YYYY-MM-DD)")
            .validate_with(|input: &String| -> Result<(), String> {
                input
                    .parse::<Birth>()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()?;

        match validate_identity(&draft) {
            Ok(_) => break,
            Err(e) => println!("  {} {e}", style("✗").red().bold()),
        }
    }

    println!();
    print_step(2, 2, "Your decision");
    loop {
        draft.option_a = Input::new()
            .with_prompt("  Option A")
            .interact_text()?;
        draft.option_b = Input::new()
            .with_prompt("  Option B")
            .interact_text()?;
        draft.background = Input::new()
            .with_prompt("  What is going on in your life right now?")
            .interact_text()?;

        match validate_decision(&draft) {
            Ok(_) => break,
            Err(e) => println!("  {} {e}", style("✗").red().bold()),
        }
    }

    Ok(draft)
}

/// Follow-up questions answered at the terminal. An empty answer skips the
/// rest of the dialog.
pub struct TerminalAnswers;

impl AnswerSource for TerminalAnswers {
    fn reply(&mut self, question: &str, rationale: Option<&str>) -> Reply {
        println!();
        if let Some(rationale) = rationale {
            print_bullet(rationale);
        }
        println!("  {} {}", style("?").cyan().bold(), style(question).bold());

        let answer = Input::<String>::new()
            .with_prompt("  Your answer (leave empty to skip)")
            .allow_empty(true)
            .interact_text();

        match answer {
            Ok(answer) if !answer.trim().is_empty() => Reply::Answer(answer.trim().to_string()),
            Ok(_) => Reply::Skip,
            Err(e) => {
                tracing::warn!("could not read answer, skipping follow-up: {e}");
                Reply::Skip
            }
        }
    }
}
