//! System prompts sent to the AI tier.

use crate::command::CommandStructure;

/// Prompt asking for a bare corrected base command
pub fn quick_base_prompt(base_command: &str) -> String {
    format!(
        "You fix typos in shell command names. The user typed the command name '{}'. \
         Reply with only the intended command name as a single word, with no explanation \
         and no formatting. If the name is already correct, reply with it unchanged.",
        base_command
    )
}

/// Prompt asking for a JSON verdict on the whole command line
pub fn semantic_validation_prompt(structure: &CommandStructure) -> String {
    let subcommand = structure.subcommand().unwrap_or("(none)");
    let flags = join_or_none(&structure.flags());
    let arguments = join_or_none(&structure.arguments());

    format!(
        "You validate shell commands typed by a user and detect typos.\n\
         Parsed structure:\n\
         - base command: {}\n\
         - subcommand: {}\n\
         - flags: {}\n\
         - arguments: {}\n\n\
         Respond with a single JSON object and nothing else:\n\
         {{\"type\": \"VALID\" | \"CORRECTION\" | \"SUGGESTION\", \
         \"suggestion\": \"<full corrected command, if any>\", \
         \"message\": \"<short explanation>\"}}\n\
         Use VALID when the command is already correct. Use CORRECTION for typos. \
         Use SUGGESTION when a different command is clearly intended.",
        structure.base_command(),
        subcommand,
        flags,
        arguments
    )
}

/// Prompt turning a natural-language task into one shell command
pub fn smart_command_prompt() -> &'static str {
    "You translate a task description into a single POSIX shell command. \
     Reply with only the command on one line, with no explanation and no markdown."
}

fn join_or_none(items: &[&str]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandParser;

    #[test]
    fn test_semantic_prompt_describes_structure() {
        let structure = CommandParser::default().parse("git comit -m wip").unwrap();
        let prompt = semantic_validation_prompt(&structure);

        assert!(prompt.contains("base command: git"));
        assert!(prompt.contains("subcommand: comit"));
        assert!(prompt.contains("flags: -m"));
        assert!(prompt.contains("arguments: wip"));
        assert!(prompt.contains("\"type\""));
    }

    #[test]
    fn test_quick_prompt_names_token() {
        assert!(quick_base_prompt("gti").contains("'gti'"));
    }
}
