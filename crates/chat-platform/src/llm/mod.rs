pub mod gemini;
pub mod live;
pub mod sse;

pub use gemini::GeminiBackend;
