//! Client execution logic with reconnection support.

use super::{domain::ReconnectPolicy, error::ClientError, session::run_client_session};

/// Run the WebSocket client, reconnecting as `policy` allows
///
/// Returns when the user quits, or with the last error once reconnecting
/// is no longer allowed.
pub async fn run_client(
    url: String,
    token: String,
    policy: ReconnectPolicy,
) -> Result<(), ClientError> {
    let mut failed_attempts = 0;

    loop {
        tracing::info!(
            "Connecting to {} (attempt {}/{})",
            url,
            failed_attempts + 1,
            policy.max_attempts
        );

        let error = match run_client_session(&url, &token).await {
            Ok(()) => {
                // ユーザーが自分で終了した
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => e,
        };

        tracing::warn!("{}", error);
        failed_attempts += 1;

        if !policy.should_retry(&error, failed_attempts) {
            tracing::error!("Giving up after {} attempt(s)", failed_attempts);
            return Err(error);
        }

        tracing::info!("Reconnecting in {:?}...", policy.interval);
        tokio::time::sleep(policy.interval).await;
    }
}
