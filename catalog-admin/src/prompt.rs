//! Confirmation capability for destructive actions

use std::io::{self, BufRead, Write};

use async_trait::async_trait;

/// Asks the operator to confirm an action
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// Returns `true` only on explicit confirmation
    async fn confirm(&self, message: &str) -> bool;
}

/// Answers every prompt with a fixed value (`--yes`, tests)
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

#[async_trait]
impl ConfirmPrompt for FixedAnswer {
    async fn confirm(&self, message: &str) -> bool {
        tracing::debug!(answer = self.0, "{}", message);
        self.0
    }
}

/// Reads a y/N answer from stdin on the blocking pool
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

#[async_trait]
impl ConfirmPrompt for StdinPrompt {
    async fn confirm(&self, message: &str) -> bool {
        let message = message.to_string();
        match tokio::task::spawn_blocking(move || ask(&message)).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(error = %e, "Confirmation prompt aborted");
                false
            }
        }
    }
}

fn ask(message: &str) -> bool {
    print!("{} [y/N]: ", message);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(_) => is_yes(&line),
        Err(e) => {
            tracing::warn!("Failed to read confirmation: {}", e);
            false
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl<T: ConfirmPrompt + ?Sized> ConfirmPrompt for std::sync::Arc<T> {
    async fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message).await
    }
}

#[async_trait]
impl<T: ConfirmPrompt + ?Sized> ConfirmPrompt for Box<T> {
    async fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message).await
    }
}
