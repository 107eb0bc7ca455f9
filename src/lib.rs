//! polychat - a local chat server fronting multiple hosted LLM providers
//! behind one conversational API, with JSON-file chat history persistence.

pub mod config;
pub mod credentials;
pub mod handlers;
pub mod history;
pub mod llm;
pub mod response;
pub mod server;
pub mod session;
