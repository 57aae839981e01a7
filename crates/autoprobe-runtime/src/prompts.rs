//! Prompt templates.
//!
//! Placeholders are written `<name>` and substituted verbatim.

/// Exploration prompt. Placeholders: `persona_description`,
/// `task_description`, `last_act`.
pub const EXPLORE_TEMPLATE: &str = r#"You are an agent trained to complete tasks on an interactive app prototype <persona_description>. You will be given a screenshot of the prototype. Interactive UI elements are outlined and labeled with numeric tags starting from 1 at the top-left corner of each outline.

You can call the following functions to interact with the labeled elements:

1. tap(element: int)
This function taps a UI element shown on the screen.
"element" is the numeric tag assigned to the element.
A simple use case is tap(5), which taps the element labeled 5.

2. text(text_input: str)
This function inserts text into an input field. Only use it when a keyboard is shown.
"text_input" is the string to insert and must be wrapped in double quotes.
A simple use case is text("Hello, world!").

3. long_press(element: int)
This function long presses a UI element shown on the screen.
A simple use case is long_press(5), which long presses the element labeled 5.

4. swipe(element: int, direction: str, dist: str)
This function swipes a UI element, which is usually a scroll view or a slide bar.
"direction" is one of "up", "down", "left", "right" and must be wrapped in double quotes.
"dist" is one of "short", "medium", "long" and must be wrapped in double quotes.
A simple use case is swipe(21, "up", "medium"), which swipes up the element labeled 21 for a medium distance.

The task you need to complete is to <task_description>. Your past actions to proceed with this task are summarized as follows: <last_act>
Now, given the labeled screenshot, think and call the function needed to proceed with the task. Your output must include four parts in the given format:
Observation: <Describe what you observe in the image>
Thought: <To complete the given task, what is the next step I should do>
Action: <The function call with the correct parameters to proceed with the task. If the task is completed or there is nothing to be done, output FINISH. Output nothing else in this field.>
Summary: <Summarize your past actions along with your latest action in one or two sentences. Do not include the numeric tag in your summary>
You can only take one action at a time, so please directly call the function."#;

/// Reflection prompt. Placeholders: `persona_description`, `action`,
/// `ui_element`, `task_desc`, `last_act`.
pub const REFLECT_TEMPLATE: &str = r#"I will give you two screenshots of an app prototype before and after <action> the UI element labeled with the number '<ui_element>' on the first screenshot. The numeric tag of each element is at the top-left corner of its outline. The action was performed in an attempt to <task_desc> <persona_description>. Your past actions to proceed with this task are summarized as follows: <last_act>
Now, carefully compare the two screenshots and decide whether the action moved the task forward. Choose one of the following decisions:
1. BACK
The action led to a screen unrelated to the task. Explain what the UI element does so it can be documented, and the screen will be returned to the previous one.
2. INEFFECTIVE
The screenshots are identical: the action did nothing.
3. CONTINUE
Something changed, but the change is not relevant to the task and there is no need to go back. Explain what the UI element does.
4. SUCCESS
The action moved the task forward. Explain what the UI element does.
Your output must follow this format:
Decision: <BACK, INEFFECTIVE, CONTINUE or SUCCESS>
Thought: <Explain why you made this decision>
Documentation: <Describe the function of the UI element in one sentence, without mentioning the numeric tag. Leave this field empty for INEFFECTIVE>"#;

/// Substitute `<key>` placeholders.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("<{}>", key), value)
    })
}

/// Persona clause inserted into both prompts.
pub fn persona_clause(persona: Option<&str>) -> String {
    match persona.map(str::trim) {
        Some(p) if !p.is_empty() => format!("as a person who is {}", p),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_all_occurrences() {
        let text = render("<a> and <a> then <b>", &[("a", "x"), ("b", "y")]);
        assert_eq!(text, "x and x then y");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("<a> <c>", &[("a", "1")]), "1 <c>");
    }

    #[test]
    fn test_templates_have_placeholders() {
        for key in ["<persona_description>", "<task_description>", "<last_act>"] {
            assert!(EXPLORE_TEMPLATE.contains(key), "missing {}", key);
        }
        for key in ["<action>", "<ui_element>", "<task_desc>", "<last_act>"] {
            assert!(REFLECT_TEMPLATE.contains(key), "missing {}", key);
        }
    }

    #[test]
    fn test_persona_clause() {
        assert_eq!(persona_clause(Some("a retiree")), "as a person who is a retiree");
        assert_eq!(persona_clause(Some("  ")), "");
        assert_eq!(persona_clause(None), "");
    }
}
