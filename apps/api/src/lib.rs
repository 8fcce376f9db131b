pub mod config;
pub mod editor;
pub mod enhance;
pub mod errors;
pub mod export;
pub mod llm_client;
pub mod models;
pub mod preview;
pub mod routes;
pub mod sse;
pub mod state;
