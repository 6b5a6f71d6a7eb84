pub mod gemini;
pub mod openai_compatible;
pub mod traits;

pub use gemini::{GeminiProvider, DEFAULT_GEMINI_MODEL};
pub use openai_compatible::OpenAICompatibleProvider;
pub use traits::*;
