pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod extractor;
pub mod fallback;
pub mod formatter;
pub mod orchestrator;
pub mod transcript;
pub mod types;
pub mod wire;

pub use classifier::classify;
pub use config::AppConfig;
pub use dispatcher::{Dispatch, Dispatcher};
pub use error::ChatError;
pub use extractor::extract;
pub use fallback::FallbackTable;
pub use formatter::format;
pub use orchestrator::{Orchestrator, TurnOutcome, TurnState};
pub use transcript::{Renderer, Transcript};
pub use types::{Category, DisplayMessage, Params, RawResponse};
