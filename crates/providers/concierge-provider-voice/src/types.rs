//! Voice provider types

use serde::{Deserialize, Serialize};

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Executable name or path
    pub program: String,
    /// Arguments passed as-is
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Command from a program and arguments
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a whitespace separated command line. No quoting support.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Recognition settings handed to the capture command
///
/// Exposed to the child process as `STT_LANGUAGE`, `STT_INTERIM_RESULTS` and
/// `STT_MAX_ALTERNATIVES`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// BCP 47 language tag
    pub language: String,
    /// Emit partial transcripts
    pub interim_results: bool,
    /// Number of alternatives requested
    pub max_alternatives: u8,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            interim_results: false,
            max_alternatives: 1,
        }
    }
}

impl RecognitionConfig {
    /// Environment passed to the capture command
    pub fn env_vars(&self) -> [(&'static str, String); 3] {
        [
            ("STT_LANGUAGE", self.language.clone()),
            ("STT_INTERIM_RESULTS", self.interim_results.to_string()),
            ("STT_MAX_ALTERNATIVES", self.max_alternatives.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_line() {
        let spec = CommandSpec::parse("  espeak-ng  --stdin -v en-us ").unwrap();
        assert_eq!(spec.program, "espeak-ng");
        assert_eq!(spec.args, vec!["--stdin", "-v", "en-us"]);
        assert_eq!(spec.to_string(), "espeak-ng --stdin -v en-us");
        assert!(CommandSpec::parse("   ").is_none());
    }

    #[test]
    fn test_recognition_defaults() {
        let config = RecognitionConfig::default();
        let env = config.env_vars();
        assert_eq!(env[0], ("STT_LANGUAGE", "en-US".to_string()));
        assert_eq!(env[1].1, "false");
        assert_eq!(env[2].1, "1");
    }
}
