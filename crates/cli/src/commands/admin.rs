//! Administrator credential commands.
//!
//! # Usage
//!
//! ```bash
//! echo -n 'correct horse' | tany-cli admin hash-password
//! ```
//!
//! The printed PHC string goes into `TANY_ADMIN_PASSWORD_HASH`.

use std::io::{BufRead, Write};

use thiserror::Error;

use tany_orders_server::services::auth::{AuthError, hash_password as argon2_hash};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Nothing was read from stdin.
    #[error("no password given on stdin")]
    EmptyPassword,

    /// Reading stdin or writing stdout failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Hashing failed.
    #[error("failed to hash password: {0}")]
    Hash(#[from] AuthError),
}

/// Read one password line from `input` and write its Argon2 hash to `output`.
///
/// # Errors
///
/// Returns `AdminError::EmptyPassword` if the line is empty.
pub fn hash_password(input: impl BufRead, mut output: impl Write) -> Result<(), AdminError> {
    let password = read_password(input)?;
    let hash = argon2_hash(&password)?;
    writeln!(output, "{hash}")?;
    tracing::info!("Set TANY_ADMIN_PASSWORD_HASH to the value above");
    Ok(())
}

fn read_password(mut input: impl BufRead) -> Result<String, AdminError> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(AdminError::EmptyPassword);
    }
    Ok(password.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tany_orders_server::services::auth::verify_password;

    use super::*;

    #[test]
    fn test_hash_password_round_trips() {
        let mut out = Vec::new();
        hash_password("s3cret pass\n".as_bytes(), &mut out).unwrap();

        let hash = String::from_utf8(out).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("s3cret pass", hash.trim_end()).is_ok());
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(matches!(
            hash_password("\n".as_bytes(), Vec::new()),
            Err(AdminError::EmptyPassword)
        ));
    }
}
