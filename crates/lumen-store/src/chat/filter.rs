use lumen_types::Conversation;

/// Positions in `conversations` that match `query`, in collection order.
///
/// A blank query matches everything. Otherwise the match is a case-insensitive
/// substring test against the title or any message content.
pub fn filter_conversations(conversations: &[Conversation], query: &str) -> Vec<usize> {
    if query.trim().is_empty() {
        return (0..conversations.len()).collect();
    }

    let needle = query.to_lowercase();
    conversations
        .iter()
        .enumerate()
        .filter(|(_, c)| c.matches(&needle))
        .map(|(i, _)| i)
        .collect()
}
