use crate::core::config::PersonaSettings;

/// Builds the single system instruction sent to the model.
///
/// Layout is fixed: persona block, retrieved context, the user's question,
/// then the numbered behaviour rules. No I/O; equal inputs give equal output.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    name: String,
    short_name: String,
}

impl PromptComposer {
    pub fn new(persona: &PersonaSettings) -> Self {
        let short_name = if persona.short_name.trim().is_empty() {
            persona.name.clone()
        } else {
            persona.short_name.clone()
        };
        Self {
            name: persona.name.clone(),
            short_name,
        }
    }

    pub fn compose(&self, query: &str, context: &str) -> String {
        let name = &self.name;
        let short = &self.short_name;
        let heading = short.to_uppercase();

        format!(
            "You are {name}'s AI assistant. Respond as if you are {short} speaking about yourself in a friendly, conversational way.

RELEVANT CONTEXT ABOUT {heading}:
{context}

USER QUESTION: {query}

INSTRUCTIONS:
1. Be conversational and friendly, as if {short} is talking about their own work
2. Keep responses concise but informative (2-4 sentences typically)
3. Use \"I\" and \"my\" when referring to {short}'s experiences and skills
4. Only use information from the provided context
5. If the context doesn't contain enough information, politely say you don't have that specific information
6. Focus on the most relevant aspects based on the user's question

Respond naturally as {short}:"
        )
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new(&PersonaSettings::default())
    }
}
