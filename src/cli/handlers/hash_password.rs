//! Hash-password command handler

use std::io::BufRead;

use crate::error::{AppError, AppResult};
use crate::utils::password::hash_password;

/// Hashes `password`, or the first line of `input` when it is absent, and
/// prints the PHC string.
pub fn execute(password: Option<&str>, input: impl BufRead) -> AppResult<String> {
    let password = match password {
        Some(password) => password.to_string(),
        None => read_password(input)?,
    };

    if password.is_empty() {
        return Err(AppError::invalid_argument("password", "Password cannot be empty"));
    }

    let hash = hash_password(&password)?;
    println!("{}", hash);
    Ok(hash)
}

fn read_password(mut input: impl BufRead) -> AppResult<String> {
    let mut line = String::new();
    input.read_line(&mut line).map_err(|e| AppError::Internal {
        source: anyhow::Error::from(e),
    })?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
