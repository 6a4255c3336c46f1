//! Terminal prompt helpers.
//!
//! Prompts go to stderr so piped stdout stays clean; answers come from
//! stdin one line at a time.

/// Migration modes the operator can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Migrate one issue at a time, with a prompt per issue.
    SingleIssue,
    /// Migrate open issues matching a label set.
    ByLabels,
    /// Migrate every issue in the repository.
    AllIssues,
    /// Leave the tool.
    Quit,
}

/// Prompts for the migration mode until a valid choice comes in.
pub fn mode() -> Mode {
    println!();
    println!("How do you want to migrate?");
    println!("  [1] One issue at a time");
    println!("  [2] Open issues matching a set of labels");
    println!("  [3] Every issue in the repository");
    println!("  [q] Quit");
    loop {
        let input = read_trimmed("Select mode: ");
        match input.as_str() {
            "1" => return Mode::SingleIssue,
            "2" => return Mode::ByLabels,
            "3" => return Mode::AllIssues,
            "q" | "Q" => return Mode::Quit,
            _ => println!("Unrecognized choice '{input}'"),
        }
    }
}

/// Prompt for y/n, returns true for yes. Default is the given bool.
pub fn confirm(prompt: &str, default: bool) -> bool {
    let suffix = if default { "[Y/n]" } else { "[y/N]" };
    let input = read_trimmed(&format!("{prompt} {suffix} "));
    if input.is_empty() {
        return default;
    }
    input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes")
}

/// Prompts for an issue number until one parses.
pub fn issue_number() -> u64 {
    loop {
        let input = read_trimmed("Issue number to migrate: ");
        match input.parse() {
            Ok(number) => return number,
            Err(_) => println!("'{input}' is not an issue number"),
        }
    }
}

/// Prompts for a comma-separated label list.
pub fn labels() -> Vec<String> {
    read_trimmed("Labels (comma-separated, issues must carry all of them): ")
        .split(',')
        .map(|label| label.trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}

/// Reads one line from stdin, trimmed.
fn read_trimmed(prompt: &str) -> String {
    eprint!("{prompt}");
    let mut input = String::new();
    std::io::stdin().read_line(&mut input).unwrap_or(0);
    input.trim().to_string()
}
