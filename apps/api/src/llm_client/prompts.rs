// Shared prompt fragments.
// Task-specific prompts live next to the module that uses them.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise resume parser. \
    Always return valid JSON. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
