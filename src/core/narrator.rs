use std::fmt::Display;
use std::future::Future;
use thiserror::Error;
use tracing::Instrument;

/// A failed step: `Error <action>: <message>`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error {action}: {message}")]
pub struct NarratedError {
    pub action: String,
    pub message: String,
}

impl NarratedError {
    pub const EXIT_CODE: u8 = 1;

    pub fn new(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            message: message.into(),
        }
    }

    /// 輸出錯誤訊息並回傳行程結束碼
    pub fn report(&self) -> std::process::ExitCode {
        tracing::debug!("❌ step failed: {}", self.action);
        eprintln!("{}", self);
        std::process::ExitCode::from(Self::EXIT_CODE)
    }
}

/// Labels each step of a command so that a failure is reported against the step that was
/// running. Successful steps are recorded in order.
#[derive(Debug, Default)]
pub struct ActionNarrator {
    history: Vec<String>,
}

impl ActionNarrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs an asynchronous step.
    pub async fn step<T, E, F>(
        &mut self,
        action: impl Into<String>,
        step: F,
    ) -> Result<T, NarratedError>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let action = action.into();
        tracing::debug!("▶ {}", action);
        let span = tracing::debug_span!("action", action = %action);
        let outcome = step.instrument(span).await;
        self.finish(action, outcome)
    }

    /// Runs a synchronous step.
    pub fn check<T, E, F>(&mut self, action: impl Into<String>, step: F) -> Result<T, NarratedError>
    where
        F: FnOnce() -> Result<T, E>,
        E: Display,
    {
        let action = action.into();
        tracing::debug!("▶ {}", action);
        let outcome = step();
        self.finish(action, outcome)
    }

    /// Actions that completed successfully, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn finish<T, E: Display>(
        &mut self,
        action: String,
        outcome: Result<T, E>,
    ) -> Result<T, NarratedError> {
        match outcome {
            Ok(value) => {
                self.history.push(action);
                Ok(value)
            }
            Err(e) => Err(NarratedError::new(action, e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AdminError;

    #[tokio::test]
    async fn test_step_success_records_history() {
        let mut narrator = ActionNarrator::new();
        let value = narrator
            .step("connecting", async { Ok::<_, AdminError>(42) })
            .await
            .unwrap();
        narrator
            .check("checking arguments", || Ok::<_, AdminError>(()))
            .unwrap();

        assert_eq!(value, 42);
        assert_eq!(narrator.history(), ["connecting", "checking arguments"]);
    }

    #[tokio::test]
    async fn test_step_failure_is_labelled() {
        let mut narrator = ActionNarrator::new();
        let err = narrator
            .step("looking up cluster", async {
                Err::<(), _>(AdminError::not_found("Cluster", "gis"))
            })
            .await
            .unwrap_err();

        assert_eq!(err.action, "looking up cluster");
        assert_eq!(err.to_string(), "Error looking up cluster: Cluster not found: gis");
        assert!(narrator.history().is_empty());
    }

    #[test]
    fn test_check_failure_and_exit_code() {
        let mut narrator = ActionNarrator::new();
        let err = narrator
            .check("checking arguments", || {
                Err::<(), _>(AdminError::precondition("Service name not specified"))
            })
            .unwrap_err();

        assert_eq!(err.to_string(), "Error checking arguments: Service name not specified");
        assert_eq!(NarratedError::EXIT_CODE, 1);
    }
}
