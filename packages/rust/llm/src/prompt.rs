//! Instructional prompt template for course generation.
//!
//! The template fixes the shape of the output (4-5 modules titled
//! `Module X: [Title]`) so heading extraction has something to match.

use coursegen_shared::Topic;

/// Build the single-turn prompt for `topic`.
pub fn build_prompt(topic: &Topic) -> String {
    format!(
        r#"You are an expert educator and curriculum designer. Create a comprehensive course on the topic: "{topic}".

The course should include:
1. A structured syllabus divided into 4-5 modules with clear titles
2. Learning objectives for each module
3. Detailed lesson content with explanations, examples, and key concepts
4. Practical exercises or activities for each module
5. Review questions at the end of each module
6. A final project or assessment

Target audience: Intermediate learners who want practical knowledge
Format: 4-5 modules, each covering a major aspect of the topic
Style: Clear, practical, with real-world examples and actionable insights

Structure your response with clear module titles in this format: "Module X: [Title]" where X is the module number.

Provide comprehensive content that would take 2-3 hours to complete per module."#
    )
}
