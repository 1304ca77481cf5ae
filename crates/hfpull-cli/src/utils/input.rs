//! User input utilities for interactive command-line prompts.
//!
//! Each prompt has a reader-generic form used by the handlers and tests,
//! plus a stdin convenience wrapper. End of input is reported as
//! [`CliError::Cancelled`] so callers can stop cleanly.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::error::CliError;

/// Read one trimmed line from `reader` after printing `prompt`.
///
/// # Errors
///
/// Returns [`CliError::Cancelled`] on end of input, or an IO error.
pub fn read_prompt<R: BufRead>(reader: &mut R, prompt: &str) -> Result<String> {
    print!("{prompt}: ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut input = String::new();
    let read = reader
        .read_line(&mut input)
        .context("Failed to read user input")?;
    if read == 0 {
        println!();
        return Err(CliError::Cancelled.into());
    }

    Ok(input.trim().to_string())
}

/// Like [`read_prompt`], returning `default` when the answer is empty.
pub fn read_prompt_with_default<R: BufRead>(
    reader: &mut R,
    prompt: &str,
    default: Option<&str>,
) -> Result<String> {
    let answer = match default {
        Some(default_val) => read_prompt(reader, &format!("{prompt} [{default_val}]"))?,
        None => read_prompt(reader, prompt)?,
    };

    if answer.is_empty() {
        Ok(default.unwrap_or_default().to_string())
    } else {
        Ok(answer)
    }
}

/// Yes/no question; empty input means no.
pub fn read_confirmation<R: BufRead>(reader: &mut R, prompt: &str) -> Result<bool> {
    loop {
        let input = read_prompt(reader, &format!("{prompt} (y/N)"))?;
        match input.to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" | "" => return Ok(false),
            _ => eprintln!("Please enter 'y' for yes or 'n' for no."),
        }
    }
}

/// Prompts the user for a yes/no confirmation on stdin.
pub fn prompt_confirmation(prompt: &str) -> Result<bool> {
    read_confirmation(&mut io::stdin().lock(), prompt)
}
