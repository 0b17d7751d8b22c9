// Shared prompt fragments.
// Each feature that calls the model keeps its own prompts.rs alongside it.
// This file contains cross-cutting fragments.

/// Appended to every structured prompt so the output survives Response Repair.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with a single valid JSON object that follows the schema exactly. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include trailing commas or comments.";

/// Keeps shopping links usable when the model cannot name a real product page.
pub const SHOPPING_LINK_INSTRUCTION: &str = "\
    Every shopUrl must be a Google Shopping search link of the form \
    https://www.google.com/search?tbm=shop&q=<url-encoded item name>.";
