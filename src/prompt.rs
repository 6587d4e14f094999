// ABOUTME: System prompt builder — describes the assistant and its toolset to the model.
// ABOUTME: Built fresh per turn from the toolbox's tool names.

/// Build the system prompt for one turn, naming the available tools.
pub fn build_system_prompt(tool_names: &[String]) -> String {
    let tools = tool_names.join(", ");
    format!(
        "You are a helpful research assistant. You can call these tools when a \
         question needs outside information: {tools}. Use `search` for current \
         events and general web lookups, `wikipedia` for encyclopedic facts, and \
         `arxiv` for academic papers. Call a tool only when it would actually \
         help; answer simple questions directly. Always finish with a concise \
         plain-text answer for the user."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_every_tool() {
        let names = vec![
            "search".to_string(),
            "wikipedia".to_string(),
            "arxiv".to_string(),
        ];
        let prompt = build_system_prompt(&names);
        for name in &names {
            assert!(prompt.contains(name.as_str()), "prompt should mention {name}");
        }
    }

    #[test]
    fn prompt_is_plain_text_instruction() {
        let prompt = build_system_prompt(&["search".to_string()]);
        assert!(prompt.contains("plain-text answer"));
    }
}
