use std::future::Future;
use std::time::Duration;

use facemark_core::AppError;

/// Run one external step under a deadline; expiry becomes [`AppError::Timeout`].
pub(crate) async fn within<T, F>(stage: &str, limit: Duration, step: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(limit, step).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout {
            stage: stage.to_string(),
            millis: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn expiry_maps_to_timeout_error() {
        let result: Result<(), AppError> = within("persisting", Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert!(matches!(
            result,
            Err(AppError::Timeout { ref stage, millis: 10 }) if stage == "persisting"
        ));
    }

    #[tokio::test]
    async fn completed_step_passes_through() {
        let result = within("uploading", Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
