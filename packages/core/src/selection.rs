//! Numbered menu selection
//!
//! Menus are shown 1-based. Anything that is not a number in range is an
//! [`SelectionError::InvalidSelection`]; callers abort on it rather than
//! asking again.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("invalid selection '{input}': expected a number between 1 and {max}")]
    InvalidSelection { input: String, max: usize },

    #[error("nothing to select from")]
    Empty,
}

/// Parse a typed menu answer into a 0-based index
pub fn parse_choice(input: &str, len: usize) -> Result<usize, SelectionError> {
    if len == 0 {
        return Err(SelectionError::Empty);
    }
    let trimmed = input.trim();
    match trimmed.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Ok(n - 1),
        _ => Err(SelectionError::InvalidSelection {
            input: trimmed.to_string(),
            max: len,
        }),
    }
}

/// Like [`parse_choice`], but an empty answer means "keep the default"
pub fn parse_choice_or_default(input: &str, len: usize) -> Result<Option<usize>, SelectionError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_choice(input, len).map(Some)
}

/// Pick an item by 1-based index
pub fn select_one<T>(items: &[T], index: usize) -> Result<&T, SelectionError> {
    if items.is_empty() {
        return Err(SelectionError::Empty);
    }
    index
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .ok_or(SelectionError::InvalidSelection {
            input: index.to_string(),
            max: items.len(),
        })
}
