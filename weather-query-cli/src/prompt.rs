use anyhow::{Context, Result};
use inquire::{Password, PasswordDisplayMode};
use std::io::{self, BufRead, IsTerminal};

const PROMPT: &str = "Enter your OpenWeather API key:";

/// Ask for the API key. Any string is accepted, including an empty one.
pub fn read_credential() -> Result<String> {
    let stdin = io::stdin();

    if stdin.is_terminal() {
        Password::new(PROMPT)
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .prompt()
            .context("Failed to read API key from prompt")
    } else {
        read_credential_line(stdin.lock())
    }
}

/// Piped input: take the first line as-is, minus its line terminator.
fn read_credential_line(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line).context("Failed to read API key from stdin")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
