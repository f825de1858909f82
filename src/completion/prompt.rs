//! Prompts for transcript question answering

/// System prompt shared by every question
pub const SYSTEM_PROMPT: &str = r#"You are an expert transcript analyst. You answer questions about a software system strictly from the evidence in a conversation transcript. You never invent facts that the transcript does not support."#;

/// Builds the per-question user prompt
///
/// The model is asked for a single JSON object so that the response parser
/// can recover the answer, the confidence label, the supporting reference and
/// the answered flag.
pub fn build_question_prompt(question: &str, transcript: &str) -> String {
    format!(
        r#"Answer the question below using only the conversation transcript that follows it.

QUESTION:
{question}

TRANSCRIPT:
{transcript}

Respond with exactly one JSON object and nothing else:
{{
    "answer": "the answer, or \"Not addressed in transcript\" when the transcript has no relevant information",
    "confidence": "High|Medium|Low|Unknown",
    "source_reference": "speaker and short context of the passage the answer comes from",
    "is_answered": true
}}

Confidence levels:
- High: the answer is stated explicitly in the transcript
- Medium: the answer can be reasonably inferred from the transcript
- Low: the transcript only offers partial or unclear information
- Unknown: the transcript contains nothing relevant

Set "is_answered" to false when the transcript contains nothing relevant. When several passages are relevant, reference the most important one."#
    )
}
