use crate::llm::types::ChatMessage;
use crate::rag::metadata::MetadataRecord;

pub fn system_prompt(assistant_name: &str) -> String {
    format!(
        "You are {}. ALWAYS answer using ONLY the provided Context. \
         If the user's question cannot be answered from the Context, say you don't know \
         and suggest capturing their contact details for follow-up. \
         Be concise and professional. Reply in the same language the user wrote in.",
        assistant_name
    )
}

/// One entry per match, in retrieval order, separated by blank lines.
pub fn format_context(matches: &[&MetadataRecord]) -> String {
    matches
        .iter()
        .map(|m| format!("FAQ #{} Q:{}\nA:{}", m.id, m.question, m.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn user_prompt(context: &str, question: &str) -> String {
    format!(
        "CONTEXT:\n{}\n\nUser question: {}\n\nAnswer strictly based on the context.",
        context, question
    )
}

pub fn build_messages(assistant_name: &str, context: &str, question: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system_prompt(assistant_name)),
        ChatMessage::user(user_prompt(context, question)),
    ]
}
