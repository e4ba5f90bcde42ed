use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};

use crate::{config::HomePage, state::SharedState};

pub const BANNER: &str = "🚀 AkinSokpah AI Bot is live!";

pub const WIDGET_HTML: &str = include_str!("../../assets/chat_widget.html");

pub async fn home_handler(State(state): State<SharedState>) -> Response {
    match state.home_page {
        HomePage::Widget => Html(WIDGET_HTML).into_response(),
        HomePage::Banner => BANNER.into_response(),
    }
}

pub async fn healthz_handler() -> &'static str {
    "ok"
}
