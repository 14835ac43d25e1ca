pub mod answer_key;
pub mod chat_session;
pub mod config;
pub mod errors;
pub mod flashcard_session;
pub mod gateway;
pub mod grading;
pub mod logging;
pub mod models;
pub mod quiz_session;

pub use answer_key::{NO_MATCH, resolve_correct_index};
pub use chat_session::{CHAT_FAILURE_MESSAGE, ChatSessionController};
pub use config::{EngineConfig, StarWritePolicy};
pub use errors::{SessionError, SessionResult};
pub use flashcard_session::{FlashcardSessionController, FlashcardSessionState};
pub use gateway::{HttpRemoteGateway, RemoteGateway, SharedGateway};
pub use models::*;
pub use quiz_session::QuizSessionController;
