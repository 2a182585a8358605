// Shared prompt fragments.
// Each service that needs model calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Instruction appended to every extraction prompt to keep output parseable.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with valid JSON only, matching the response schema exactly. \
    Do NOT use markdown code fences. \
    Use empty strings or empty arrays for anything not present; never invent details.";
