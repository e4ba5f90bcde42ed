use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse},
    services::chatbot::relay,
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let message = payload.message.unwrap_or_default();

    // Correlates the log lines of one exchange; never returned to the client.
    let exchange_id = Uuid::new_v4();
    let span = tracing::info_span!("chat", %exchange_id);

    async move {
        tracing::info!(message_len = message.len(), "relaying message");

        let reply = relay(
            state.completion.as_ref(),
            &message,
            state.empty_message_policy,
        )
        .await?;

        tracing::info!(reply_len = reply.len(), "reply ready");
        Ok::<_, AppError>(Json(ChatResponse { reply }))
    }
    .instrument(span)
    .await
}
