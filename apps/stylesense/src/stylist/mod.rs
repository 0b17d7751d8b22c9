// Stylist: prompt building, blueprint orchestration, consultation chat.
// All model calls go through llm_client, never direct HTTP.

pub mod analysis;
pub mod chat;
pub mod gate;
pub mod orchestrator;
pub mod prompts;
pub mod recommendation;
