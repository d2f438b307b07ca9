//! Interactive analysis menu.
//!
//! Prints the numbered list of analyses and reads one choice. A number
//! outside the list re-prompts; anything that is not a number ends the run.

use std::io::{self, BufRead, Write};

use crate::error::AppError;

pub const PROMPT: &str = "\
Which analysis would you like to see?
1. Percentage of Uninsured Population by State
2. Percentage of People in Poverty by State
3. Trend between Poverty and Uninsured People by State
Enter a number corresponding to the analysis you'd like to see: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Insurance,
    Poverty,
    Trend,
}

/// Interpret one line of input.
///
/// `Ok(None)` means "a number, but not one on the menu".
pub fn parse_choice(input: &str) -> Result<Option<MenuChoice>, AppError> {
    let trimmed = input.trim();
    let n: i64 = trimmed
        .parse()
        .map_err(|_| AppError::usage(format!("Invalid menu selection '{trimmed}': expected 1, 2 or 3.")))?;
    Ok(match n {
        1 => Some(MenuChoice::Insurance),
        2 => Some(MenuChoice::Poverty),
        3 => Some(MenuChoice::Trend),
        _ => None,
    })
}

/// Prompt on `output` until `input` yields a menu entry.
pub fn prompt_for_choice<R: BufRead, W: Write>(mut input: R, mut output: W) -> Result<MenuChoice, AppError> {
    loop {
        write!(output, "{PROMPT}")
            .and_then(|_| output.flush())
            .map_err(|e| AppError::usage(format!("Failed to write prompt: {e}")))?;

        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| AppError::usage(format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            return Err(AppError::usage("No input received."));
        }

        match parse_choice(&line)? {
            Some(choice) => return Ok(choice),
            None => {
                writeln!(output, "Invalid choice: {}. Enter 1, 2 or 3.", line.trim())
                    .map_err(|e| AppError::usage(format!("Failed to write prompt: {e}")))?;
            }
        }
    }
}

/// Prompt on the real terminal.
pub fn prompt_stdin() -> Result<MenuChoice, AppError> {
    prompt_for_choice(io::stdin().lock(), io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_menu_numbers() {
        assert_eq!(parse_choice("1\n").unwrap(), Some(MenuChoice::Insurance));
        assert_eq!(parse_choice(" 2 ").unwrap(), Some(MenuChoice::Poverty));
        assert_eq!(parse_choice("3").unwrap(), Some(MenuChoice::Trend));
        assert_eq!(parse_choice("7").unwrap(), None);
    }

    #[test]
    fn non_numeric_input_is_fatal() {
        let err = parse_choice("two").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }

    #[test]
    fn reprompts_until_valid() {
        let mut out = Vec::new();
        let choice = prompt_for_choice("9\n0\n3\n".as_bytes(), &mut out).unwrap();
        assert_eq!(choice, MenuChoice::Trend);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Which analysis").count(), 3);
        assert!(text.contains("Invalid choice: 9."));
    }

    #[test]
    fn eof_and_garbage_end_the_prompt() {
        assert!(prompt_for_choice("".as_bytes(), Vec::new()).is_err());
        assert!(prompt_for_choice("abc\n1\n".as_bytes(), Vec::new()).is_err());
    }
}
