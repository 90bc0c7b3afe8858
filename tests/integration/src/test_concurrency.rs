//! Signing from many tasks at once.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use awsign_sigv4::{Credentials, ServiceScope, SigningArtifacts, sign};
    use bytes::Bytes;
    use http::Request;

    use crate::{init_tracing, test_credentials, test_scope};

    fn numbered_request(n: usize) -> Request<Bytes> {
        Request::post(format!("https://example.amazonaws.com/items/{n}"))
            .header("x-amz-date", "20150830T123600Z")
            .body(Bytes::from(format!("{{\"item\":{n}}}")))
            .unwrap()
    }

    fn sign_numbered(credentials: &Credentials, scope: &ServiceScope, n: usize) -> SigningArtifacts {
        let mut request = numbered_request(n);
        sign(credentials, scope, &mut request).unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_sign_concurrently_with_shared_credentials() {
        init_tracing();
        let credentials = Arc::new(test_credentials());
        let scope = Arc::new(test_scope());

        let handles: Vec<_> = (0..32)
            .map(|n| {
                let credentials = Arc::clone(&credentials);
                let scope = Arc::clone(&scope);
                tokio::spawn(async move { (n, sign_numbered(&credentials, &scope, n)) })
            })
            .collect();

        for handle in handles {
            let (n, artifacts) = handle.await.unwrap();
            assert_eq!(artifacts, sign_numbered(&credentials, &scope, n));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_should_produce_distinct_signatures_for_distinct_requests() {
        let credentials = Arc::new(test_credentials());
        let scope = Arc::new(test_scope());

        let mut set = tokio::task::JoinSet::new();
        for n in 0..16 {
            let credentials = Arc::clone(&credentials);
            let scope = Arc::clone(&scope);
            set.spawn(async move { sign_numbered(&credentials, &scope, n).signature });
        }

        let mut signatures = Vec::new();
        while let Some(result) = set.join_next().await {
            signatures.push(result.unwrap());
        }
        signatures.sort();
        signatures.dedup();
        assert_eq!(signatures.len(), 16);
    }
}
