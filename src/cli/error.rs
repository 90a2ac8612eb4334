// Error reporting and argument validation for the command layer

use crate::error::CrmError;

/// Exit code for user errors (not found, invalid input, auth)
pub const EXIT_USER: i32 = 1;
/// Exit code for internal failures (database, I/O)
pub const EXIT_INTERNAL: i32 = 2;

/// Pick the exit code by the error kind found anywhere in the chain
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.chain().find_map(|e| e.downcast_ref::<CrmError>()) {
        Some(crm) if crm.kind().is_user_error() => EXIT_USER,
        Some(_) => EXIT_INTERNAL,
        // Clap and config errors come through as plain anyhow errors
        None if err.chain().any(|e| e.is::<std::io::Error>()) => EXIT_INTERNAL,
        None => EXIT_USER,
    }
}

/// Print an error the way the user should see it
pub fn report(err: &anyhow::Error) {
    if exit_code(err) == EXIT_INTERNAL {
        eprintln!("Internal error: {}", err);
        let mut causes = err.chain().skip(1).peekable();
        if causes.peek().is_some() {
            eprintln!("\nCaused by:");
            for (indent, cause) in causes.enumerate() {
                eprintln!("{:indent$}  {}", "", cause, indent = indent + 1);
            }
        }
    } else {
        // Show the innermost library message, not the command context
        let message = err
            .chain()
            .find_map(|e| e.downcast_ref::<CrmError>())
            .map(|e| e.to_string())
            .unwrap_or_else(|| err.to_string());
        eprintln!("Error: {}", message);
    }
}

/// Validate that a record ID is valid (positive integer)
pub fn validate_id(id_str: &str) -> Result<i64, String> {
    id_str.parse::<i64>()
        .map_err(|_| format!("Invalid ID: '{}'. ID must be a number.", id_str))
        .and_then(|id| {
            if id > 0 {
                Ok(id)
            } else {
                Err(format!("Invalid ID: {}. ID must be positive.", id))
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Entity;
    use anyhow::Context;

    #[test]
    fn test_validate_id() {
        assert_eq!(validate_id("1"), Ok(1));
        assert_eq!(validate_id("42"), Ok(42));
        assert!(validate_id("0").is_err());
        assert!(validate_id("-1").is_err());
        assert!(validate_id("abc").is_err());
        assert!(validate_id("").is_err());
    }

    #[test]
    fn test_exit_code_by_kind() {
        let not_found: anyhow::Error = CrmError::not_found(Entity::Stage, 1).into();
        assert_eq!(exit_code(&not_found), EXIT_USER);

        let wrapped = Err::<(), _>(CrmError::invalid("bad"))
            .context("Failed to reorder stage")
            .unwrap_err();
        assert_eq!(exit_code(&wrapped), EXIT_USER);

        let storage: anyhow::Error = CrmError::Storage(rusqlite::Error::InvalidQuery).into();
        assert_eq!(exit_code(&storage), EXIT_INTERNAL);
    }
}
