//! Message builders for the three service contracts: initial sufficiency
//! check, follow-up check, and letter generation.

use crate::intake::IntakeForm;
use crate::llm::ChatMessage;
use chrono::{Datelike, Utc};

/// Token the service is told to use where the person's name belongs.
pub const NAME_PLACEHOLDER: &str = "[NAME]";

/// Years between the writer of the letters and the reader.
pub const LETTER_OFFSET_YEARS: i32 = 10;

const EVALUATE_SYSTEM: &str = "\
You are an assistant that judges whether a person has shared enough background \
to write them two high-quality letters from their future self.

Judge the background along these dimensions:

1. The choice itself
- why these two options exist
- the opportunities and risks of each
- which way they currently lean, and what worries them

2. Values and hopes
- what matters most to them (family, career, self-fulfilment, ...)
- what they expect from the future
- what they are quietly afraid of

If the background is not sufficient, pick the single most important missing \
dimension and ask one concrete follow-up question that builds on what they \
already said. Use a warm, natural tone.

Reply with JSON only, in exactly one of these shapes:
{
  \"sufficient\": false,
  \"reason\": \"To understand your situation better, I'd like to know a little more...\",
  \"questions\": [\"one warm, friendly follow-up question\"]
}
or
{
  \"sufficient\": true,
  \"reason\": \"That is plenty, let's start writing.\"
}";

const FOLLOWUP_SYSTEM: &str = "\
You are a warm, friendly assistant gathering background from a person through \
conversation. Based on their latest answer, decide whether another question is \
needed.

Consider:
1. whether the answer gave a new perspective on their situation
2. whether an important dimension is still unknown
3. if another question is needed, start from the most natural dimension
4. ask lightly, showing understanding and empathy
5. ask no more than 5 questions in total

Reply with JSON only, in exactly this shape:
{
  \"sufficient\": true | false,
  \"question\": \"the next warm, friendly question if one is needed, otherwise an empty string\"
}";

const GENERATION_SYSTEM_HEAD: &str = "\
You are taking part in a special service that helps people make an important \
life decision by receiving letters from themselves ten years in the future. \
Based on the choice the person faces now, write two letters from two different \
life paths.

Letter structure:
Opening:
- make clear this letter comes from you, ten years from now
- show understanding for the worry you had back then
- set a warm, private tone
Life today:
- paint a picture of life now
- give 2-3 concrete details
- cover work, relationships and everyday life
How the choice shaped things:
- look back on how that decision changed the course of your life
- share the turning points nobody expected
- explain how it influenced the decisions that followed
Reflection:
- share the most important thing you learned
- describe how you see yourself now
- be honest about regrets and hard times
- mention what stayed the same whichever way you chose

Writing principles:
1. Voice
- write as the self who actually lived these ten years
- friendly and natural, never preachy
- warm but honest
- show the maturity ten years brings
2. Content
- between 600 and 1200 words per letter
- both futures must feel worth hoping for
- add concrete details of daily life to make it real
- do not predict social or technological change
- focus on personal growth and lived experience
- the goal is reflection, not advice on which option to pick
3. Each letter must include:
- an unexpected relationship
- a challenge that led to growth
- a new understanding of life
- a moment of insight about choosing
- an opportunity nobody saw coming
- a difficulty that had to be overcome
- a joy never imagined
- a realization about life or self

Important:
- both futures must be believable
- never make one option look obviously better
- keep the same personality in both letters
- show how time changed them
- include specific scenes from daily life
- avoid empty lectures and advice
";

/// The year the future self signs off with.
pub fn sign_off_year() -> i32 {
    Utc::now().year() + LETTER_OFFSET_YEARS
}

pub fn evaluate_messages(background: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(EVALUATE_SYSTEM),
        ChatMessage::user(format!("The person's background:\n{background}")),
    ]
}

pub fn followup_messages(background: &str, question: &str, answer: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(FOLLOWUP_SYSTEM),
        ChatMessage::user(format!(
            "Background: {background}\nQuestion: {question}\nAnswer: {answer}"
        )),
    ]
}

pub fn generation_messages(
    form: &IntakeForm,
    transcript: &str,
    sign_off_year: i32,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(generation_system(sign_off_year)),
        ChatMessage::user(generation_user(form, transcript)),
    ]
}

fn generation_system(year: i32) -> String {
    let letter = format!(
        "Dear {NAME_PLACEHOLDER},\\n[body following the structure and rules above]\\n\\nFrom\\nYou, ten years on\\n{year}"
    );
    format!(
        "{GENERATION_SYSTEM_HEAD}
Reply with JSON only, in exactly this shape:
{{
  \"letterA\": \"{letter}\",
  \"letterB\": \"{letter}\"
}}
letterA follows the first option and letterB follows the second. Write \
{NAME_PLACEHOLDER} literally wherever the person's name belongs."
    )
}

fn generation_user(form: &IntakeForm, transcript: &str) -> String {
    let mut message = format!("Current situation: {}\n", form.background());
    if !transcript.trim().is_empty() {
        message.push_str(&format!("\nSupplementary information:\n{transcript}\n"));
    }
    message.push_str(&format!(
        "\nThe choice:\n- Option A: {}\n- Option B: {}",
        form.option_a(),
        form.option_b()
    ));
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::IntakeDraft;

    fn form() -> IntakeForm {
        IntakeForm::try_from(IntakeDraft {
            name: "Li".into(),
            gender: "male".into(),
            birth: "1994".into(),
            option_a: "stay in Chengdu".into(),
            option_b: "move to Shanghai".into(),
            background: "Six years at the same firm.".into(),
        })
        .unwrap()
    }

    #[test]
    fn evaluate_carries_only_the_background() {
        let messages = evaluate_messages("I like my job");
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_system());
        assert_eq!(messages[1].content(), "The person's background:\nI like my job");
    }

    #[test]
    fn followup_carries_question_and_answer() {
        let messages = followup_messages("bg", "Why now?", "A new offer");
        assert!(messages[1].content().contains("Question: Why now?"));
        assert!(messages[1].content().contains("Answer: A new offer"));
    }

    #[test]
    fn generation_system_names_contract_and_year() {
        let messages = generation_messages(&form(), "", 2036);
        let system = messages[0].content();
        assert!(system.contains("600 and 1200 words"));
        assert!(system.contains("never make one option look obviously better"));
        assert!(system.contains("2036"));
        assert!(system.contains(NAME_PLACEHOLDER));
        assert!(system.contains("\"letterA\""));
    }

    #[test]
    fn empty_transcript_is_omitted() {
        let messages = generation_messages(&form(), "  ", 2036);
        let user = messages[1].content();
        assert!(!user.contains("Supplementary information"));
        assert!(user.contains("- Option A: stay in Chengdu"));
        assert!(user.contains("- Option B: move to Shanghai"));
    }

    #[test]
    fn transcript_is_included_when_present() {
        let messages = generation_messages(&form(), "Q: Why?\nA: Growth", 2036);
        assert!(
            messages[1]
                .content()
                .contains("Supplementary information:\nQ: Why?\nA: Growth")
        );
    }

    #[test]
    fn sign_off_is_ten_years_ahead() {
        assert_eq!(sign_off_year(), Utc::now().year() + 10);
    }
}
