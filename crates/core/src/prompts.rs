//! Prompt construction for the three agent calls.

use goalforge_providers::ChatMessage;

const AGENT_NAME: &str = "GoalForge";

const ARRAY_INSTRUCTION: &str =
    "Return the response as an array of strings that can be parsed as JSON and NOTHING ELSE.";

/// First round of a goal: nothing has been executed yet.
pub fn start_goal(goal: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!(
            "You are an autonomous task creation AI called {AGENT_NAME}."
        )),
        ChatMessage::user(format!(
            "You have the following objective `{goal}`. Create a list of zero to three \
             tasks to be completed by your AI system such that your goal is more closely \
             reached or completely reached. {ARRAY_INSTRUCTION}"
        )),
    ]
}

/// Follow-up round: propose only what is still needed after `last_task`.
pub fn create_tasks(
    goal: &str,
    existing_tasks: &[String],
    last_task: &str,
    last_result: &str,
) -> Vec<ChatMessage> {
    let pending = serde_json::to_string(existing_tasks).unwrap_or_else(|_| "[]".to_string());

    vec![
        ChatMessage::system(format!(
            "You are an AI task creation agent called {AGENT_NAME}."
        )),
        ChatMessage::user(format!(
            "You have the following objective `{goal}`. You have the following incomplete \
             tasks `{pending}` and have just executed the following task `{last_task}` and \
             received the following result `{last_result}`. Based on this, create a new task \
             to be completed by your AI system ONLY IF NEEDED such that your goal is more \
             closely reached or completely reached. Do not repeat any of the incomplete \
             tasks. {ARRAY_INSTRUCTION}"
        )),
    ]
}

pub fn execute_task(goal: &str, task: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!(
            "You are an autonomous task execution AI called {AGENT_NAME}."
        )),
        ChatMessage::user(format!(
            "You have the following objective `{goal}`. You have the following task \
             `{task}`. Execute the task and return the response as a string. \
             Markdown formatting is allowed."
        )),
    ]
}
