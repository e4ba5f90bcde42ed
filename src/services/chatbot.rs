// src/services/chatbot.rs
use crate::config::EmptyMessagePolicy;
use crate::error::{AppError, Result};
use crate::services::completion::CompletionClient;

pub const NO_MESSAGE_ERROR: &str = "No message provided";
pub const EMPTY_MESSAGE_APOLOGY: &str = "Sorry, I didn't catch that. Please type a message.";

/// Forward one user message to the completion API and return the trimmed reply.
///
/// Empty input never reaches the client; `policy` decides between an error and an
/// apologetic reply.
pub async fn relay(
    client: &dyn CompletionClient,
    message: &str,
    policy: EmptyMessagePolicy,
) -> Result<String> {
    let trimmed = message.trim();

    if trimmed.is_empty() {
        return match policy {
            EmptyMessagePolicy::Reject => Err(AppError::BadRequest(NO_MESSAGE_ERROR.to_string())),
            EmptyMessagePolicy::Apologize => Ok(EMPTY_MESSAGE_APOLOGY.to_string()),
        };
    }

    let reply = client.complete(trimmed).await?;
    Ok(reply.trim().to_string())
}
