use std::path::Path;
use thiserror::Error;

pub const PLACEHOLDER: &str = "{message}";

const BEATBOX_GURU: &str = r#"You are an expert beatbox instructor named "YEN's Beatbox Guru". You specialize in vocal percussion and beatboxing. Be concise, practical, and encouraging. 

Your expertise includes:
- Basic sounds: Kick drum (B), Hi-hat (t), K-snare (K), Open hi-hat (ts)
- Intermediate sounds: PF snare, Inward K snare
- Advanced sounds: Throat bass, Lip rolls, Click rolls
- Patterns and rhythms: Boots and cats, boom bap, trap, house
- Breathing techniques for sustained beatboxing
- Practice routines and progression tips

Always provide step-by-step instructions when teaching sounds. Use phonetics like {B}, {t}, {K} to represent sounds.

User asks: {message}"#;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("persona template has no {{message}} placeholder")]
    MissingPlaceholder,
    #[error("could not read persona template: {0}")]
    Io(#[from] std::io::Error),
}

/// Instructional text wrapped around every user message.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    prefix: String,
    suffix: String,
}

impl PromptTemplate {
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        let (prefix, suffix) = template
            .split_once(PLACEHOLDER)
            .ok_or(TemplateError::MissingPlaceholder)?;
        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let template = std::fs::read_to_string(path)?;
        Self::new(&template)
    }

    /// The message is inserted verbatim; placeholders inside it are left alone.
    pub fn render(&self, message: &str) -> String {
        let mut prompt =
            String::with_capacity(self.prefix.len() + message.len() + self.suffix.len());
        prompt.push_str(&self.prefix);
        prompt.push_str(message);
        prompt.push_str(&self.suffix);
        prompt
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        let (prefix, suffix) = BEATBOX_GURU
            .split_once(PLACEHOLDER)
            .unwrap_or((BEATBOX_GURU, ""));
        Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_persona_ends_with_question() {
        let prompt = PromptTemplate::default().render("How do I do a kick drum?");
        assert!(prompt.starts_with("You are an expert beatbox instructor"));
        assert!(prompt.contains("Use phonetics like {B}, {t}, {K}"));
        assert!(prompt.contains("practical, and encouraging. \n\nYour expertise includes:\n"));
        assert!(prompt.ends_with("User asks: How do I do a kick drum?"));
    }

    #[test]
    fn only_first_placeholder_is_substituted() {
        let template = PromptTemplate::new("Q: {message} / {message}").unwrap();
        assert_eq!(template.render("hi"), "Q: hi / {message}");
    }

    #[test]
    fn message_is_not_rescanned() {
        let template = PromptTemplate::new("<{message}>").unwrap();
        assert_eq!(template.render("{message}"), "<{message}>");
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        assert!(matches!(
            PromptTemplate::new("no slot here"),
            Err(TemplateError::MissingPlaceholder)
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = PromptTemplate::from_file(Path::new("/nonexistent/persona.txt"));
        assert!(matches!(result, Err(TemplateError::Io(_))));
    }
}
