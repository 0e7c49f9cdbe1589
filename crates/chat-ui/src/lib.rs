//! Rendering layer: reads a projection of the conversation state and
//! returns the user's intents for the composition root to dispatch.

pub mod format;
pub mod intent;
pub mod panels;
pub mod state;
pub mod theme;

#[cfg(test)]
mod tests;
