//! System prompt templates

use crate::knowledge::KnowledgeBase;
use crate::types::Message;
use crate::{ConciergeError, Result};
use handlebars::Handlebars;
use serde_json::json;
use std::fmt;
use std::str::FromStr;

const CONVERSATIONAL_TEMPLATE: &str = "You are a professional, empathetic hotel assistant.
Always use the following hotel knowledge base when answering questions.
Respond naturally and conversationally and never dump raw data.

Knowledge Base: {{knowledge}}";

const REFERENCE_TEMPLATE: &str = "You are a helpful hotel assistant. Use the following knowledge base when answering questions.
If the answer is not in the KB, answer naturally using your general knowledge.
Knowledge base:
{{knowledge}}";

/// How the knowledge base is presented to the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptStyle {
    /// Conversational instructions with compact JSON
    #[default]
    Conversational,
    /// Plain reference dump with indented JSON
    Reference,
}

impl PromptStyle {
    fn template_name(&self) -> &'static str {
        match self {
            Self::Conversational => "conversational",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template_name())
    }
}

impl FromStr for PromptStyle {
    type Err = ConciergeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "conversational" => Ok(Self::Conversational),
            "reference" => Ok(Self::Reference),
            other => Err(ConciergeError::config(format!(
                "unknown prompt style '{}', expected 'conversational' or 'reference'",
                other
            ))),
        }
    }
}

/// Renders the system prompt that carries the knowledge base
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create an engine with both prompt styles registered
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        // Prompts are plain text
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars
            .register_template_string(
                PromptStyle::Conversational.template_name(),
                CONVERSATIONAL_TEMPLATE,
            )
            .map_err(|e| ConciergeError::template(e.to_string()))?;
        handlebars
            .register_template_string(PromptStyle::Reference.template_name(), REFERENCE_TEMPLATE)
            .map_err(|e| ConciergeError::template(e.to_string()))?;
        Ok(Self { handlebars })
    }

    /// Render the system prompt text
    pub fn render(&self, style: PromptStyle, knowledge: &KnowledgeBase) -> Result<String> {
        let serialized = match style {
            PromptStyle::Conversational => knowledge.to_json()?,
            PromptStyle::Reference => knowledge.to_pretty_json()?,
        };
        self.handlebars
            .render(style.template_name(), &json!({ "knowledge": serialized }))
            .map_err(|e| ConciergeError::template(e.to_string()))
    }

    /// Render the system prompt as a ready-to-send turn
    pub fn system_message(&self, style: PromptStyle, knowledge: &KnowledgeBase) -> Result<Message> {
        self.render(style, knowledge).map(Message::system)
    }
}
