//! Prompt builder for pictogram-to-sentence generation.
//!
//! [`PromptBuilder`] constructs two kinds of prompts:
//! * **Flat** (`build`): single string, for Gemini `generateContent`.
//! * **Chat** (`build_chat`): `(system_msg, user_msg)` tuple for any
//!   OpenAI-compatible `/v1/chat/completions` endpoint.
//!
//! Spanish (`"es"`) and English (`"en"`) have dedicated instructions; any other
//! language code falls back to Spanish, the board's vocabulary language.

// ---------------------------------------------------------------------------
// System instructions
// ---------------------------------------------------------------------------

const SYSTEM_INSTRUCTION_ES: &str = "\
Act as a language assistant for a teenager with ASD.
I will give you a sequence of words/labels from pictograms.
Your task is to transform them into a natural, grammatically correct, and simple \
Spanish sentence that the teenager would say to communicate.
Use casual, age-appropriate phrasing.
Output: Return ONLY the Spanish sentence. No explanations.";

const SYSTEM_INSTRUCTION_EN: &str = "\
Act as a language assistant for a teenager with ASD.
I will give you a sequence of words/labels from pictograms.
Your task is to transform them into a natural, grammatically correct, and simple \
English sentence that the teenager would say to communicate.
Use casual, age-appropriate phrasing.
Output: Return ONLY the English sentence. No explanations.";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds sentence-generation prompts in either flat or chat-message format.
///
/// # Example
/// ```rust
/// use picto_voice::translate::PromptBuilder;
///
/// let builder = PromptBuilder::new("es");
/// let labels = vec!["Quiero".to_string(), "Agua".to_string()];
/// let (system, user) = builder.build_chat(&labels);
/// assert!(system.contains("ONLY"));
/// assert!(user.contains("Quiero, Agua"));
/// ```
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    language: String,
}

impl PromptBuilder {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }

    /// Single-string prompt: instruction followed by the input labels.
    pub fn build(&self, labels: &[String]) -> String {
        let mut prompt = String::with_capacity(512);
        prompt.push_str(self.system_instruction());
        prompt.push_str("\n\n");
        prompt.push_str(&Self::input_line(labels));
        prompt
    }

    /// `(system_msg, user_msg)` pair.
    pub fn build_chat(&self, labels: &[String]) -> (String, String) {
        (
            self.system_instruction().to_string(),
            Self::input_line(labels),
        )
    }

    fn input_line(labels: &[String]) -> String {
        format!("Input labels: {}", labels.join(", "))
    }

    fn system_instruction(&self) -> &'static str {
        match self.language.as_str() {
            "en" => SYSTEM_INSTRUCTION_EN,
            _ => SYSTEM_INSTRUCTION_ES,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
