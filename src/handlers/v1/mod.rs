//! V1 API handlers.

mod chat;
mod histories;
mod keys;
mod models;

pub use chat::send_message;
pub use histories::{delete_history, list_histories, load_history, save_history};
pub use keys::{get_keys, save_keys};
pub use models::list_models;
