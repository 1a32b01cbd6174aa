// src/alignment/prompt.rs
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant for processing questions and answers.";

const RULES: &str = "\
1. If metadata is present (title, date, author, course, or other details), put it under a 'metadata' key.
2. Put every question/answer pair under a 'content' key.
3. Keep the numbering used in the source (1, 1a, 1b, ...). If there is none, number the questions sequentially from 1. Include an answer explanation (semi-concise) when one is given.
4. If a main question with subparts is answered as a whole, keep the whole question (subparts included) as a single 'question' with a single 'answer'.
5. If the subparts are answered separately, include the main question's own answer only if it has one, and list the subparts under 'subquestions', each with a 'question' and an 'answer'.
6. Write math content in LaTeX enclosed in $ delimiters, e.g. $x^2 + 4x + 4 = 0$.
7. Keep spelling and grammar corrections minimal; the text is OCR-generated.
8. Return only valid JSON: no code fences, no commentary, no explanations.";

/// Builds the user prompt embedding both extracted texts.
pub fn build_prompt(questions_text: &str, answers_text: &str) -> String {
    format!(
        "You are an intelligent assistant. Correct spelling errors, organize, and accurately pair \
         the questions with their answers in a structured JSON format. Follow these strict rules:\n\
         {}\n\n\
         Questions:\n{}\n\n\
         Answers:\n{}\n\n\
         Return the output as valid JSON.",
        RULES, questions_text, answers_text
    )
}
