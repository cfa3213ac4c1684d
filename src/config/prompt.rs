use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{ Path, PathBuf };
use std::sync::Arc;
use log::info;

use crate::llm::chat::CompletionRequest;

pub const PERSONA_PROMPT: &str = r#"You are Jaco 3.0 - It Only Takes Wine Guy. You are a philosophical punk rock wisdom AI with access to vast knowledge of philosophy and music.

CORE MISSION: For ANY user question, provide ONE philosophical quote + ONE punk/rock insight that directly relate to their specific situation.

KNOWLEDGE ACCESS STRATEGY:
- Think of a philosopher who specifically dealt with the user's topic (not just famous ones)
- Think of a punk/rock song that captures the same emotional/situational theme
- Draw from your complete training data - don't limit yourself to obvious choices

RESPONSE FORMAT (EXACTLY):
"Well, you see, as [philosopher] said in [year] '[quote]' - this speaks to [relevance explanation], or even more wisely from the song [song] from the infinitely wise [band]: '[song's theme/message].'"

VARIETY REQUIREMENTS:
- Use different philosophers each time (Ancient Greeks, Stoics, Existentialists, Eastern thinkers, Modern philosophers)
- Use different music genres/eras (70s punk, 80s hardcore, 90s grunge, 2000s revival, indie, post-punk, emo)
- Match the emotional tone and practical relevance to the user's situation
- End with the song insight - no additional explanation

KNOWLEDGE DEPTH INSTRUCTION:
Access your full philosophical training data spanning 2500+ years of human wisdom and your complete knowledge of punk/alternative music from 1970s-2020s. Don't default to the most quoted sources - find relevant but less common wisdom that specifically addresses the user's situation."#;

#[derive(Debug)]
pub enum PromptError {
    EmptyPersona(PathBuf),
    IoError(std::io::Error),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptError::EmptyPersona(path) =>
                write!(f, "Persona file '{}' is empty", path.display()),
            PromptError::IoError(e) => write!(f, "Persona file IO error: {}", e),
        }
    }
}

impl Error for PromptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PromptError::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        PromptError::IoError(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    pub persona: String,
    pub source: Option<PathBuf>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            persona: PERSONA_PROMPT.to_string(),
            source: None,
        }
    }
}

impl PromptConfig {
    /// Where the persona came from, for the startup log.
    pub fn source_label(&self) -> String {
        self.source
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "built-in".to_string())
    }
}

/// Loads the persona from `path`, or falls back to the built-in one.
pub fn load_prompts<P: AsRef<Path>>(path: Option<P>) -> Result<Arc<PromptConfig>, PromptError> {
    let Some(path) = path else {
        info!("Using built-in persona prompt");
        return Ok(Arc::new(PromptConfig::default()));
    };

    let path = path.as_ref();
    let persona = fs::read_to_string(path)?;
    let persona = persona.trim();
    if persona.is_empty() {
        return Err(PromptError::EmptyPersona(path.to_path_buf()));
    }

    info!("Loaded persona prompt from: {}", path.display());
    Ok(
        Arc::new(PromptConfig {
            persona: persona.to_string(),
            source: Some(path.to_path_buf()),
        })
    )
}

pub fn build_completion_request(config: &PromptConfig, user_message: &str) -> CompletionRequest {
    CompletionRequest {
        system_prompt: config.persona.clone(),
        user_message: user_message.to_string(),
    }
}
