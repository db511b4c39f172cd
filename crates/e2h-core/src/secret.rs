//! Secret acquisition for keyed runs.
//!
//! Entry is modelled as a small state machine:
//!
//! ```text
//!            empty / too short
//!          +------------------+
//!          v                  |
//!     Prompting ------------->+
//!          |  valid
//!          v
//!     Confirming --mismatch--> Prompting
//!          |  match
//!          v
//!      Accepted
//! ```
//!
//! Rejections are reported through the prompt and never end the loop; only
//! a failing terminal does. A confirmed value is always a valid [`Secret`].

use e2h_digest::{Secret, SecretRejection};
use std::io;
use thiserror::Error;
use tracing::debug;

/// Prompt shown for the first entry.
pub const ENTER_PROMPT: &str = "Enter secret key";
/// Prompt shown for the confirmation entry.
pub const CONFIRM_PROMPT: &str = "Confirm secret key";

/// Failures that stop secret acquisition.
#[derive(Debug, Error)]
pub enum SecretError {
    /// The terminal could not be read.
    #[error("failed to read secret: {0}")]
    Prompt(#[source] io::Error),

    /// Interactive entry is needed but stdin is not a terminal.
    #[error("a secret is required; run interactively or pass --secret-env")]
    NotInteractive,

    /// `--secret-env` named an unset or non-UTF-8 variable.
    #[error("environment variable {0} is not set")]
    EnvMissing(String),

    /// A non-interactive secret failed the policy (no retry possible).
    #[error("secret from {source_name} rejected: {reason}")]
    Rejected {
        source_name: String,
        reason: SecretRejection,
    },
}

/// Source of secret entries. Implementations must not echo input.
pub trait SecretPrompt {
    /// Read one entry.
    fn read_secret(&mut self, prompt: &str) -> io::Result<String>;

    /// Tell the user why the last entry was refused.
    fn reject(&mut self, reason: &SecretRejection) -> io::Result<()>;
}

/// Where the machine is.
#[derive(Debug)]
pub enum AcquisitionState {
    /// Waiting for the first entry.
    Prompting,
    /// First entry passed the policy; waiting for it to be repeated.
    Confirming(Secret),
    /// Entered identically twice.
    Accepted(Secret),
}

/// Drives a [`SecretPrompt`] until a secret is accepted.
pub struct SecretAcquisition<P> {
    prompt: P,
    state: AcquisitionState,
    rejections: u32,
}

impl<P: SecretPrompt> SecretAcquisition<P> {
    pub fn new(prompt: P) -> Self {
        Self {
            prompt,
            state: AcquisitionState::Prompting,
            rejections: 0,
        }
    }

    pub fn state(&self) -> &AcquisitionState {
        &self.state
    }

    /// Entries refused so far.
    pub fn rejections(&self) -> u32 {
        self.rejections
    }

    /// Perform one transition.
    pub fn step(&mut self) -> Result<&AcquisitionState, SecretError> {
        let next = match std::mem::replace(&mut self.state, AcquisitionState::Prompting) {
            AcquisitionState::Prompting => {
                let entry = self.read(ENTER_PROMPT)?;
                match Secret::new(entry) {
                    Ok(candidate) => AcquisitionState::Confirming(candidate),
                    Err(reason) => {
                        self.refuse(&reason)?;
                        AcquisitionState::Prompting
                    }
                }
            }
            AcquisitionState::Confirming(candidate) => {
                let confirmation = self.read(CONFIRM_PROMPT)?;
                if confirmation.as_bytes() == candidate.as_bytes() {
                    AcquisitionState::Accepted(candidate)
                } else {
                    self.refuse(&SecretRejection::Mismatch)?;
                    AcquisitionState::Prompting
                }
            }
            accepted @ AcquisitionState::Accepted(_) => accepted,
        };
        self.state = next;
        Ok(&self.state)
    }

    /// Loop until a secret is accepted. There is no attempt limit.
    pub fn run(mut self) -> Result<Secret, SecretError> {
        loop {
            match std::mem::replace(&mut self.state, AcquisitionState::Prompting) {
                AcquisitionState::Accepted(secret) => {
                    debug!(rejections = self.rejections, "Secret accepted");
                    return Ok(secret);
                }
                pending => self.state = pending,
            }
            self.step()?;
        }
    }

    fn read(&mut self, prompt: &str) -> Result<String, SecretError> {
        self.prompt.read_secret(prompt).map_err(SecretError::Prompt)
    }

    fn refuse(&mut self, reason: &SecretRejection) -> Result<(), SecretError> {
        self.rejections += 1;
        debug!(reason = ?reason, "Secret entry refused");
        self.prompt.reject(reason).map_err(SecretError::Prompt)
    }
}

/// Interactively obtain a secret through `prompt`.
pub fn acquire_secret<P: SecretPrompt>(prompt: P) -> Result<Secret, SecretError> {
    SecretAcquisition::new(prompt).run()
}

/// Read a secret from an environment variable. The length policy applies;
/// there is no confirmation step.
pub fn secret_from_env(var: &str) -> Result<Secret, SecretError> {
    let value = std::env::var(var).map_err(|_| SecretError::EnvMissing(var.to_string()))?;
    Secret::new(value).map_err(|reason| SecretError::Rejected {
        source_name: format!("${var}"),
        reason,
    })
}

/// Terminal prompt with hidden input.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl SecretPrompt for TerminalPrompt {
    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .report(false)
            .interact()
            .map_err(io::Error::other)
    }

    fn reject(&mut self, reason: &SecretRejection) -> io::Result<()> {
        eprintln!("{}. Please try again.", capitalize(&reason.to_string()));
        Ok(())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a fixed list of entries and records rejections.
    struct ScriptedPrompt {
        entries: VecDeque<&'static str>,
        prompts: Vec<String>,
        rejections: Vec<SecretRejection>,
    }

    impl ScriptedPrompt {
        fn new(entries: &[&'static str]) -> Self {
            Self {
                entries: entries.iter().copied().collect(),
                prompts: Vec::new(),
                rejections: Vec::new(),
            }
        }
    }

    impl SecretPrompt for &mut ScriptedPrompt {
        fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
            self.prompts.push(prompt.to_string());
            self.entries
                .pop_front()
                .map(str::to_string)
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
        }

        fn reject(&mut self, reason: &SecretRejection) -> io::Result<()> {
            self.rejections.push(reason.clone());
            Ok(())
        }
    }

    #[test]
    fn test_accepts_matching_pair() {
        let mut prompt = ScriptedPrompt::new(&["longenoughsecret", "longenoughsecret"]);
        let secret = acquire_secret(&mut prompt).unwrap();
        assert_eq!(secret.as_bytes(), b"longenoughsecret");
        assert_eq!(prompt.prompts, vec![ENTER_PROMPT, CONFIRM_PROMPT]);
        assert!(prompt.rejections.is_empty());
    }

    #[test]
    fn test_short_then_mismatch_then_valid() {
        let mut prompt = ScriptedPrompt::new(&[
            "short",
            "longenoughsecret",
            "longenoughsecreX",
            "longenoughsecret",
            "longenoughsecret",
        ]);
        let secret = acquire_secret(&mut prompt).unwrap();
        assert_eq!(secret.as_bytes(), b"longenoughsecret");
        assert_eq!(
            prompt.rejections,
            vec![
                SecretRejection::TooShort { len: 5, min: 10 },
                SecretRejection::Mismatch,
            ]
        );
        assert_eq!(
            prompt.prompts,
            vec![ENTER_PROMPT, ENTER_PROMPT, CONFIRM_PROMPT, ENTER_PROMPT, CONFIRM_PROMPT]
        );
    }

    #[test]
    fn test_empty_entry_retries() {
        let mut prompt = ScriptedPrompt::new(&["", "0123456789", "0123456789"]);
        acquire_secret(&mut prompt).unwrap();
        assert_eq!(prompt.rejections, vec![SecretRejection::Empty]);
    }

    #[test]
    fn test_short_confirmed_value_never_accepted() {
        // A short value typed twice is refused at the first prompt both times.
        let mut prompt = ScriptedPrompt::new(&["abc", "abc"]);
        let err = acquire_secret(&mut prompt).unwrap_err();
        assert!(matches!(err, SecretError::Prompt(_)));
        assert_eq!(prompt.rejections.len(), 2);
        assert!(prompt.prompts.iter().all(|p| p == ENTER_PROMPT));
    }

    #[test]
    fn test_step_transitions() {
        let mut prompt = ScriptedPrompt::new(&["longenoughsecret", "longenoughsecret"]);
        let mut machine = SecretAcquisition::new(&mut prompt);
        assert!(matches!(machine.state(), AcquisitionState::Prompting));
        assert!(matches!(machine.step().unwrap(), AcquisitionState::Confirming(_)));
        assert!(matches!(machine.step().unwrap(), AcquisitionState::Accepted(_)));
        // Accepted is terminal.
        assert!(matches!(machine.step().unwrap(), AcquisitionState::Accepted(_)));
        assert_eq!(machine.rejections(), 0);
    }

    #[test]
    fn test_prompt_failure_propagates() {
        let mut prompt = ScriptedPrompt::new(&[]);
        assert!(matches!(acquire_secret(&mut prompt), Err(SecretError::Prompt(_))));
    }

    #[test]
    fn test_secret_from_env() {
        std::env::set_var("E2H_TEST_SECRET_OK", "longenoughsecret");
        assert!(secret_from_env("E2H_TEST_SECRET_OK").is_ok());

        std::env::set_var("E2H_TEST_SECRET_SHORT", "short");
        assert!(matches!(
            secret_from_env("E2H_TEST_SECRET_SHORT"),
            Err(SecretError::Rejected { reason: SecretRejection::TooShort { .. }, .. })
        ));

        assert!(matches!(
            secret_from_env("E2H_TEST_SECRET_UNSET_VAR"),
            Err(SecretError::EnvMissing(_))
        ));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("the secrets do not match"), "The secrets do not match");
        assert_eq!(capitalize(""), "");
    }
}
