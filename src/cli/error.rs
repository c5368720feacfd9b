// Error classification and exit codes for the command line

use crate::error::{TodoError, ValidationError};

/// Exit code for invalid input, conflicts and bad positions
pub const EXIT_USER_ERROR: i32 = 1;

/// Exit code for storage failures and other unexpected errors
pub const EXIT_INTERNAL_ERROR: i32 = 2;

/// Convert a 1-based display position into a 0-based store index
pub fn parse_position(text: &str) -> Result<usize, ValidationError> {
    let text = text.trim();
    text.parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .ok_or_else(|| ValidationError::InvalidIndex(text.to_string()))
}

/// Restate a store index error in the 1-based positions users type
pub fn position_error(err: TodoError) -> anyhow::Error {
    let message = match &err {
        TodoError::IndexOutOfRange { index, len } => {
            format!("No todo at position {}: list has {} item(s)", index + 1, len)
        }
        _ => return err.into(),
    };
    anyhow::Error::new(err).context(message)
}

/// User errors are reported and recovered from; anything else is internal
pub fn is_user_error(err: &anyhow::Error) -> bool {
    if let Some(todo_err) = err.downcast_ref::<TodoError>() {
        return todo_err.is_user_error();
    }
    err.downcast_ref::<ValidationError>().is_some()
}

/// Print `err` to stderr and return the process exit code for it
pub fn report(err: &anyhow::Error) -> i32 {
    if is_user_error(err) {
        eprintln!("Error: {}", err);
        return EXIT_USER_ERROR;
    }

    eprintln!("Internal error: {}", err);
    let mut chain = err.chain().skip(1).peekable();
    if chain.peek().is_some() {
        eprintln!("\nCaused by:");
        for (indent, cause) in chain.enumerate() {
            eprintln!("{:indent$}  {}", "", cause, indent = indent + 1);
        }
    }
    EXIT_INTERNAL_ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("1"), Ok(0));
        assert_eq!(parse_position(" 3 "), Ok(2));
        assert!(parse_position("0").is_err());
        assert!(parse_position("-1").is_err());
        assert!(parse_position("two").is_err());
        assert!(parse_position("").is_err());
    }

    #[test]
    fn test_position_error_is_one_based() {
        let err = position_error(TodoError::IndexOutOfRange { index: 4, len: 2 });
        assert_eq!(err.to_string(), "No todo at position 5: list has 2 item(s)");
        assert!(is_user_error(&err));
        assert!(matches!(
            err.downcast_ref::<TodoError>(),
            Some(TodoError::IndexOutOfRange { index: 4, len: 2 })
        ));

        let other = position_error(TodoError::Conflict { title: "a".into() });
        assert_eq!(other.to_string(), "Time conflict with 'a'");
    }

    #[test]
    fn test_is_user_error_sees_through_context() {
        let conflict: anyhow::Error = TodoError::Conflict { title: "a".into() }.into();
        assert!(is_user_error(&conflict));

        let validation: Result<(), ValidationError> = Err(ValidationError::EmptyTitle);
        let wrapped = validation.context("Failed to add todo").unwrap_err();
        assert!(is_user_error(&wrapped));

        let write: anyhow::Error = TodoError::StorageWrite {
            path: PathBuf::from("t.json"),
            source: std::io::Error::other("disk full"),
        }
        .into();
        assert!(!is_user_error(&write));
        assert!(!is_user_error(&anyhow::anyhow!("Could not determine home directory")));
    }
}
