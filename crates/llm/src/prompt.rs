//! Prompt assembly
//!
//! Builds the chat messages for one answer: a system message holding the
//! mode template filled with the numbered context block (and, in
//! conversational mode, the conversation so far), followed by the user's
//! original question.

use answer_engine_core::{ConversationContext, Message, ModeProfile, RetrievedPassage};

/// Output of prompt assembly
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledPrompt {
    /// `[system, user]`
    pub messages: Vec<Message>,
    pub context_block: String,
    /// Empty outside conversational mode
    pub history_block: String,
}

impl AssembledPrompt {
    pub fn system_prompt(&self) -> &str {
        self.messages
            .first()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

const EMPTY_HISTORY: &str = "(no previous conversation)";

/// Fills mode templates
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptAssembler;

impl PromptAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assemble messages for `question`
    ///
    /// Passage `i` (1-based) is labelled `[i]` in the context block, which is
    /// the number the model must cite.
    pub fn assemble(
        &self,
        question: &str,
        profile: &ModeProfile,
        passages: &[RetrievedPassage],
        history: &ConversationContext,
        language: &str,
    ) -> AssembledPrompt {
        let context_block = Self::context_block(passages);
        let history_block = if profile.uses_history() {
            Self::history_block(history)
        } else {
            String::new()
        };

        let history_value = if history_block.is_empty() {
            EMPTY_HISTORY
        } else {
            history_block.as_str()
        };

        let system = fill_template(
            &profile.system_template(),
            &[
                ("language", language),
                ("mode", profile.mode.as_str()),
                ("history", history_value),
                ("context", &context_block),
            ],
        );

        tracing::trace!(
            mode = %profile.mode,
            passages = passages.len(),
            system_chars = system.len(),
            "Assembled prompt"
        );

        AssembledPrompt {
            messages: vec![Message::system(system), Message::user(question)],
            context_block,
            history_block,
        }
    }

    /// Numbered context entries separated by blank lines
    pub fn context_block(passages: &[RetrievedPassage]) -> String {
        passages
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut header = format!("[{}] Document: {}", i + 1, p.document_title);
                if let Some(ref section) = p.section {
                    header.push_str(&format!(" Section: {}", section));
                }
                if let Some(page) = p.page {
                    header.push_str(&format!(" Page: {}", page));
                }
                format!("{}\n{}", header, p.text)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Every fetched turn, untruncated
    pub fn history_block(history: &ConversationContext) -> String {
        history.exchange_lines(history.len(), None).join("\n")
    }
}

/// Single-pass `{key}` substitution
///
/// Values are inserted verbatim and never rescanned, so passage text that
/// happens to contain `{history}` is left alone. Unknown placeholders are
/// kept as written.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let values_len: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + values_len);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });

        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
