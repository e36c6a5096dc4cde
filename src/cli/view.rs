use aiself::handoff::Options;
use aiself::narrative::LetterPair;
use console::style;

pub fn print_bullet(text: &str) {
    println!("  {} {}", style("›").cyan(), text);
}

pub fn print_step(current: u8, total: u8, title: &str) {
    println!(
        "  {} {}",
        style(format!("[{current}/{total}]")).cyan().bold(),
        style(title).white().bold()
    );
}

/// Print each letter under its option label, one paragraph per line.
pub fn print_letters(options: Option<&Options>, letters: &LetterPair) {
    let (label_a, label_b) = options.map_or(("Option A", "Option B"), |o| {
        (o.option_a.as_str(), o.option_b.as_str())
    });

    for (label, letter) in [(label_a, &letters.letter_a), (label_b, &letters.letter_b)] {
        println!();
        println!("  {} {}", style("✉").cyan().bold(), style(label).white().bold());
        println!();
        for paragraph in paragraphs(letter) {
            println!("  {paragraph}");
        }
    }
    println!();
}

fn paragraphs(letter: &str) -> impl Iterator<Item = &str> {
    letter.lines().map(str::trim).filter(|line| !line.is_empty())
}
