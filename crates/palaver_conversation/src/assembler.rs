//! Outgoing turn assembly and regeneration bookkeeping.

use palaver_core::{
    ConversationMessage, FeedbackTable, MessageReplacement, Metadata, Role, TurnMessage,
};

/// The state change a regeneration applies to the previous assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegenerationPlan {
    /// Message being superseded
    pub prior_id: String,
    /// Its fields before the change, for restoring it
    pub original: MessageReplacement,
    /// Its fields after the change
    pub replacement: MessageReplacement,
    /// Iteration of the reply that replaces it
    pub next_iteration: u32,
}

/// Plans a regeneration when the latest message is an active assistant reply.
///
/// A reply without an iteration becomes iteration 1 and its successor 2;
/// otherwise the successor continues from the prior iteration.
///
/// ```
/// use palaver_conversation::plan_regeneration;
/// use palaver_core::{ConversationMessage, Role};
///
/// let reply = ConversationMessage::builder()
///     .id("m-2")
///     .conversation_id("c")
///     .role(Role::Assistant)
///     .content("first try")
///     .build()
///     .expect("valid message");
///
/// let plan = plan_regeneration(&[reply]).expect("latest is an active reply");
/// assert_eq!(plan.replacement.iteration, Some(1));
/// assert!(plan.replacement.replaced && !plan.replacement.send_to_model);
/// assert_eq!(plan.next_iteration, 2);
/// ```
pub fn plan_regeneration(history: &[ConversationMessage]) -> Option<RegenerationPlan> {
    let prior = history.last().filter(|m| m.is_active_assistant())?;

    let (prior_iteration, next_iteration) = match *prior.iteration() {
        None => (1, 2),
        Some(n) => (n, n + 1),
    };

    Some(RegenerationPlan {
        prior_id: prior.id().clone(),
        original: prior.current_replacement(),
        replacement: MessageReplacement {
            replaced: true,
            send_to_model: false,
            iteration: Some(prior_iteration),
        },
        next_iteration,
    })
}

/// Everything [`assemble`] reads. All borrowed; nothing is mutated.
#[derive(Debug, Clone, Copy)]
pub struct AssembleInput<'a> {
    /// Stored history in creation order
    pub history: &'a [ConversationMessage],
    /// Compiled instructions, prepended as a user turn
    pub instructions: Option<&'a str>,
    /// Accumulated conversation metadata, attached to the latest user turn
    pub metadata: &'a Metadata,
    /// Feedback code table used for the latest user turn
    pub feedback: &'a FeedbackTable,
    /// Regeneration to account for, if this turn replaces a reply
    pub regeneration: Option<&'a RegenerationPlan>,
}

/// Builds the exact sequence the backend will see.
///
/// - Only model-visible messages are included, minus a reply being regenerated
/// - Platform messages go out as user turns
/// - Instructions come first, invisible to the user and never stored
/// - Only the latest stored user message is rewritten: feedback text left on
///   the reply before it is prefixed, and conversation metadata is appended
///   as `<metadata>{...}</metadata>`
///
/// # Examples
///
/// ```
/// use palaver_conversation::{AssembleInput, assemble};
/// use palaver_core::{ConversationMessage, FeedbackTable, Metadata, Role};
///
/// let message = |id: &str, role: Role, content: &str| {
///     ConversationMessage::builder()
///         .id(id)
///         .conversation_id("c")
///         .role(role)
///         .content(content)
///         .build()
///         .expect("valid message")
/// };
/// let history = [
///     message("1", Role::Platform, "Welcome!"),
///     message("2", Role::User, "hi"),
/// ];
///
/// let turns = assemble(AssembleInput {
///     history: &history,
///     instructions: Some("Be kind."),
///     metadata: &Metadata::new(),
///     feedback: &FeedbackTable::new(),
///     regeneration: None,
/// });
///
/// let roles: Vec<_> = turns.iter().map(|t| t.role).collect();
/// assert_eq!(roles, vec![Role::User, Role::User, Role::User]);
/// assert_eq!(turns[0].content, "Be kind.");
/// assert_eq!(turns[2].content, "hi");
/// ```
pub fn assemble(input: AssembleInput<'_>) -> Vec<TurnMessage> {
    let superseded = input.regeneration.map(|plan| plan.prior_id.as_str());

    let visible: Vec<&ConversationMessage> = input
        .history
        .iter()
        .filter(|m| *m.send_to_model())
        .filter(|m| Some(m.id().as_str()) != superseded)
        .collect();

    let latest_user = visible.iter().rposition(|m| *m.role() == Role::User);
    let feedback_text = latest_user.and_then(|index| {
        visible[..index]
            .iter()
            .rev()
            .find(|m| *m.role() == Role::Assistant)
            .and_then(|m| m.feedback().as_deref())
            .and_then(|code| input.feedback.text_for(code))
    });

    let mut turns = Vec::with_capacity(visible.len() + 1);
    if let Some(instructions) = input.instructions.filter(|text| !text.is_empty()) {
        turns.push(TurnMessage::new(Role::User, instructions));
    }

    for (index, message) in visible.iter().enumerate() {
        let content = if Some(index) == latest_user {
            annotate(message.content(), feedback_text, input.metadata)
        } else {
            message.content().clone()
        };
        turns.push(TurnMessage::new(message.role().outbound(), content));
    }

    turns
}

fn annotate(content: &str, feedback: Option<&str>, metadata: &Metadata) -> String {
    let mut text = match feedback {
        Some(feedback) => format!("{}\n\n{}", feedback, content),
        None => content.to_string(),
    };
    if !metadata.is_empty() {
        text.push_str("<metadata>");
        text.push_str(&serde_json::Value::Object(metadata.clone()).to_string());
        text.push_str("</metadata>");
    }
    text
}
