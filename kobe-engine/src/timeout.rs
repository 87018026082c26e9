use crate::engine::EngineError;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

pub const OPENING_TURN_TIMEOUT: Duration = Duration::from_secs(30);
pub const TURN_TIMEOUT: Duration = Duration::from_secs(30);
pub const TRANSLATE_TIMEOUT: Duration = Duration::from_secs(15);

pub const OPENING_TIMEOUT_MESSAGE: &str = "Timeout connecting to AI.";
pub const TURN_TIMEOUT_MESSAGE: &str = "Server response timeout.";
pub const TRANSLATE_TIMEOUT_MESSAGE: &str = "Translation timeout.";

/// Races `call` against `limit`.
///
/// When the deadline wins, `call` is dropped before returning, so a late result can
/// never be observed. When `call` wins, the timer is dropped with it.
pub async fn with_timeout<T, E, F>(
    call: F,
    limit: Duration,
    message: &str,
) -> Result<T, EngineError>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(EngineError::Transport(format!("{e:#}"))),
        Err(_) => Err(EngineError::Timeout(message.to_string())),
    }
}
