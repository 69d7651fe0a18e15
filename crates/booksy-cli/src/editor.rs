//! Terminal interaction: the section editor round trip and yes/no prompts

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

use anyhow::{bail, Context, Result};

#[cfg(windows)]
const DEFAULT_EDITOR: &str = "notepad";
#[cfg(not(windows))]
const DEFAULT_EDITOR: &str = "vi";

/// Let the user rewrite `text` in their editor and return what they saved
///
/// The text comes back byte for byte; trailing newlines added by the
/// editor are kept.
pub fn edit_text(text: &str) -> Result<String> {
    let (program, args) = editor_command(env::var("VISUAL").ok(), env::var("EDITOR").ok());

    let mut draft = tempfile::Builder::new()
        .prefix("booksy-")
        .suffix(".md")
        .tempfile()
        .context("Failed to create a draft file for the editor")?;
    draft.write_all(text.as_bytes())?;
    draft.flush()?;

    let status = Command::new(&program)
        .args(&args)
        .arg(draft.path())
        .status()
        .with_context(|| format!("Failed to start editor '{}'", program))?;
    if !status.success() {
        bail!("Editor '{}' failed ({}). The section was not changed.", program, status);
    }

    // Editors often replace the file rather than write into it
    fs::read_to_string(draft.path()).context("Failed to read the edited draft")
}

/// Program and leading arguments from `$VISUAL`, then `$EDITOR`
fn editor_command(visual: Option<String>, editor: Option<String>) -> (String, Vec<String>) {
    let configured = [visual, editor]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty());

    match configured {
        Some(value) => {
            let mut words = value.split_whitespace().map(str::to_string);
            let program = words.next().unwrap_or_else(|| DEFAULT_EDITOR.to_string());
            (program, words.collect())
        }
        None => (DEFAULT_EDITOR.to_string(), Vec::new()),
    }
}

/// Ask a yes/no question on the terminal
///
/// Without a TTY on stdin the answer is no.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visual_wins_over_editor() {
        let (program, args) =
            editor_command(Some("code --wait".to_string()), Some("nano".to_string()));
        assert_eq!(program, "code");
        assert_eq!(args, vec!["--wait".to_string()]);
    }

    #[test]
    fn test_blank_visual_falls_through() {
        let (program, args) = editor_command(Some("  ".to_string()), Some("nano".to_string()));
        assert_eq!(program, "nano");
        assert!(args.is_empty());
    }

    #[test]
    fn test_default_editor() {
        let (program, args) = editor_command(None, None);
        assert_eq!(program, DEFAULT_EDITOR);
        assert!(args.is_empty());
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }
}
