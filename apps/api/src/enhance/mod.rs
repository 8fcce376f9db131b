// Enhancement protocol: prompt selection, the streaming endpoint, and the
// client that merges streamed text into the editor.
// All upstream calls go through llm_client, never directly from here.

pub mod client;
pub mod handlers;
pub mod prompts;
pub mod protocol;
pub mod target;

#[cfg(test)]
pub(crate) mod testing;
