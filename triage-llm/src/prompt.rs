//! Classification prompt template.
//!
//! The prompt is a fixed, deterministic artifact: task instructions, the
//! closed category set with definitions, the urgency scale, six worked
//! examples, and the feedback text verbatim. Changing its wording changes
//! the backend contract, so it lives here as a single reviewed constant.

/// Template for the classification prompt. `{feedback}` is replaced with the
/// normalized feedback text.
pub const CLASSIFICATION_TEMPLATE: &str = r#"You are a feedback analysis agent. Your task is to analyze user feedback and classify it into one of four categories, then assign an urgency score.

Categories:
- "Bug Report": Identifies a technical issue or something that is broken
- "Feature Request": Suggests a new feature or enhancement to an existing one
- "Praise/Positive Feedback": Expresses satisfaction or appreciation
- "General Inquiry": Asks a question or provides a comment that doesn't fit the other categories

Urgency Scale (1-5):
- 1: Not Urgent
- 2: Low
- 3: Medium
- 4: High
- 5: Critical

Here are some examples to guide your analysis:

Example 1:
Feedback: "The login page crashes every time I try to sign in with my Google account. This is blocking me from accessing my work files."
Analysis: {"category": "Bug Report", "urgency_score": 4}

Example 2:
Feedback: "Would love to see a dark mode option in the settings. It would make using the app at night much easier."
Analysis: {"category": "Feature Request", "urgency_score": 2}

Example 3:
Feedback: "Amazing update! The new interface is so much cleaner and faster. Great job team!"
Analysis: {"category": "Praise/Positive Feedback", "urgency_score": 1}

Example 4:
Feedback: "How do I change my notification settings? I can't find the option anywhere in the menu."
Analysis: {"category": "General Inquiry", "urgency_score": 2}

Example 5:
Feedback: "URGENT: Payment processing is completely broken! Customers can't complete purchases and we're losing revenue!"
Analysis: {"category": "Bug Report", "urgency_score": 5}

Example 6:
Feedback: "The search function could be improved with filters for date, category, and price range."
Analysis: {"category": "Feature Request", "urgency_score": 3}

Now analyze the following feedback and respond with ONLY a JSON object in this exact format:
{"category": "category_name", "urgency_score": number}

Feedback to analyze: "{feedback}"

Response:"#;

/// Simple template interpolation.
///
/// Replaces `{key}` with the corresponding value.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{key}}}"), value);
    }
    result
}

/// Build the full classification prompt for one piece of feedback.
///
/// The feedback text is embedded verbatim; callers pass the already
/// normalized form.
#[must_use]
pub fn build_classification_prompt(feedback_text: &str) -> String {
    render_template(CLASSIFICATION_TEMPLATE, &[("feedback", feedback_text)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_rendering_works() {
        let rendered = render_template(
            "Hello {name}, you sent: {text}.",
            &[("name", "caller"), ("text", "hi")],
        );
        assert_eq!(rendered, "Hello caller, you sent: hi.");
    }

    #[test]
    fn template_handles_missing_vars() {
        let rendered = render_template("Hello {name}, {unknown}.", &[("name", "caller")]);
        assert_eq!(rendered, "Hello caller, {unknown}.");
    }

    #[test]
    fn prompt_embeds_feedback_verbatim() {
        let prompt = build_classification_prompt("the app crashed twice today");
        assert!(prompt.contains("Feedback to analyze: \"the app crashed twice today\""));
        assert!(!prompt.contains("{feedback}"));
    }

    #[test]
    fn prompt_lists_the_closed_category_set() {
        let prompt = build_classification_prompt("anything");
        for category in [
            "Bug Report",
            "Feature Request",
            "Praise/Positive Feedback",
            "General Inquiry",
        ] {
            assert!(prompt.contains(category), "missing category: {category}");
        }
    }

    #[test]
    fn prompt_includes_urgency_scale_and_examples() {
        let prompt = build_classification_prompt("anything");
        assert!(prompt.contains("Urgency Scale (1-5)"));
        assert!(prompt.contains("5: Critical"));
        assert!(prompt.contains("Example 6:"));
        assert!(prompt.contains("respond with ONLY a JSON object"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let a = build_classification_prompt("same input");
        let b = build_classification_prompt("same input");
        assert_eq!(a, b);
    }
}
