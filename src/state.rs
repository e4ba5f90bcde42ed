// src/state.rs
use std::sync::Arc;

use crate::config::{EmptyMessagePolicy, HomePage};
use crate::services::completion::CompletionClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub completion: Arc<dyn CompletionClient>,
    pub empty_message_policy: EmptyMessagePolicy,
    pub home_page: HomePage,
}

impl AppState {
    pub fn new(completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            completion,
            empty_message_policy: EmptyMessagePolicy::default(),
            home_page: HomePage::default(),
        }
    }

    pub fn with_empty_message_policy(mut self, policy: EmptyMessagePolicy) -> Self {
        self.empty_message_policy = policy;
        self
    }

    pub fn with_home_page(mut self, home_page: HomePage) -> Self {
        self.home_page = home_page;
        self
    }
}
