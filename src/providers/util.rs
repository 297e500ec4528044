use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retries a price-source request on transport errors.
///
/// Timeouts are terminal: the per-request deadline already bounds how long a
/// query may wait, so a timed-out fetch fails immediately instead of being
/// retried. `retries` is the number of re-attempts after the initial run.
pub async fn with_retry<F, Fut, T>(mut operation: F, retries: usize, delay_ms: u64) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) if err.is_timeout() || attempt >= retries => return Err(err.into()),
            Err(err) => {
                attempt += 1;
                debug!("Price request failed ({err}), retrying {attempt}/{retries}");
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dead_url() -> String {
        // Bind-then-drop leaves a port nothing is listening on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        url
    }

    #[tokio::test]
    async fn test_success_needs_no_retry() {
        let calls = AtomicUsize::new(0);
        let result = with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, reqwest::Error>(7) }
            },
            2,
            1,
        )
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transport_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let dead = dead_url();
        let client = reqwest::Client::new();
        let calls = AtomicUsize::new(0);

        // First attempt hits the dead port, the retry hits the live server.
        let response = with_retry(
            || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                let url = if attempt == 0 {
                    dead.clone()
                } else {
                    mock_server.uri()
                };
                let client = client.clone();
                async move { client.get(&url).send().await }
            },
            1,
            1,
        )
        .await
        .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_timeout_is_terminal() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let calls = AtomicUsize::new(0);

        let result = with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                let request = client.get(mock_server.uri());
                async move { request.send().await }
            },
            3,
            1,
        )
        .await;

        assert!(result.is_err());
        // No re-attempts: the deadline already bounded the wait.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
