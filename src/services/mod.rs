pub mod chatbot;
pub mod completion;
