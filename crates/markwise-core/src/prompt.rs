//! Prompt template shared by all HTTP assessors.

use crate::traits::AssessRequest;

/// System prompt sent with every assessment.
pub const ASSESSOR_SYSTEM_PROMPT: &str =
    "You are an expert child literacy assessor. Return only valid JSON.";

const RESPONSE_SCHEMA: &str = r#"{
    "intent": {
        "score": 0-100,
        "understood": true/false,
        "concepts_right": ["list"],
        "concepts_missed": ["list"],
        "note": "brief"
    },
    "vocabulary": {
        "score": 0-100,
        "good_words": ["list"],
        "improve": ["suggestions"],
        "note": "brief"
    },
    "spelling": {
        "score": 0-100,
        "errors": [{"word": "wrong", "correct": "right", "type": "phonetic/typo"}],
        "phonetic_tries": ["list"],
        "note": "brief"
    },
    "grammar": {
        "score": 0-100,
        "errors": [{"type": "error", "fix": "correction"}],
        "strengths": ["list"],
        "note": "brief"
    }
}"#;

/// Render the single user prompt that asks for all four dimensions.
pub fn build_prompt(request: &AssessRequest) -> String {
    format!(
        "Evaluate this student's answer across 4 dimensions.\n\
         \n\
         QUESTION: {question}\n\
         CORRECT ANSWER: {reference}\n\
         STUDENT'S ANSWER: {answer}\n\
         DIFFICULTY: {difficulty}\n\
         CONTEXT: {context}\n\
         \n\
         Evaluate on these 4 dimensions:\n\
         \n\
         1. INTENT (Understanding): Did they grasp the main concept? (0-100)\n\
         2. VOCABULARY (Word Choice): Appropriate words for age? (0-100)\n\
         3. SPELLING (Accuracy): Consider phonetic attempts like \"becaus\"→\"because\" (0-100)\n\
         4. GRAMMAR (Structure): Sentence structure, tense, agreement (0-100)\n\
         \n\
         Return ONLY valid JSON (no markdown, no explanation):\n\
         {schema}",
        question = request.question_text,
        reference = request.reference_answer,
        answer = request.student_answer,
        difficulty = request.difficulty,
        context = request.context,
        schema = RESPONSE_SCHEMA,
    )
}
