// Shared prompt fragments.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.
// This file contains the rules every enhancement prompt repeats.

/// Fact-preservation rules appended to every enhancement prompt.
pub const FACT_RULES: &str = "\
- You keep all real facts mentioned in the original text.
- You do NOT invent new achievements, skills, numbers, dates, or names.";

/// Output-only instruction. The client writes the model output straight into
/// the form, so any wrapper text would end up on the resume.
pub const OUTPUT_ONLY: &str =
    "- You return ONLY the improved text, with no labels, quotes, or explanations.";
