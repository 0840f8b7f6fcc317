use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use serde_json::Value;

use crate::{
    api::{PredictionApi, ServiceReply, UploadFile},
    error::ApiError,
    schema::AttributeValues,
};

/// Answers every call with the same reply, or with a refused connection
/// when built by [`MockApi::unreachable`]. Clones share the call log.
#[derive(Clone)]
pub struct MockApi {
    reply: Option<ServiceReply>,
    pub calls: Arc<AtomicUsize>,
    pub sent_values: Arc<Mutex<Option<AttributeValues>>>,
    pub sent_file: Arc<Mutex<Option<UploadFile>>>,
}

impl MockApi {
    fn with_reply(reply: Option<ServiceReply>) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
            sent_values: Arc::new(Mutex::new(None)),
            sent_file: Arc::new(Mutex::new(None)),
        }
    }

    pub fn replying(status: u16, body: Value) -> Self {
        Self::with_reply(Some(ServiceReply::json(status, &body)))
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self::with_reply(Some(ServiceReply {
            status,
            body: body.to_string(),
        }))
    }

    pub fn unreachable() -> Self {
        Self::with_reply(None)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn answer(&self) -> Result<ServiceReply, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(ApiError::Transport(refused_connection().await)),
        }
    }
}

/// A real connect error: the port was free a moment ago and nothing listens
/// on it now.
async fn refused_connection() -> reqwest::Error {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("reserve a local port");
    reqwest::get(format!("http://{addr}/"))
        .await
        .expect_err("nothing listens on the released port")
}

impl PredictionApi for MockApi {
    async fn predict(&self, values: &AttributeValues) -> Result<ServiceReply, ApiError> {
        *self.sent_values.lock().unwrap() = Some(values.clone());
        self.answer().await
    }

    async fn predict_csv(&self, file: &UploadFile) -> Result<ServiceReply, ApiError> {
        *self.sent_file.lock().unwrap() = Some(file.clone());
        self.answer().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn unreachable_fails_with_a_connect_error() {
        let api = MockApi::unreachable();
        let err = api.predict_csv(&UploadFile { name: "a.csv".into(), bytes: Vec::new() }).await;

        match err {
            Err(ApiError::Transport(e)) => assert!(e.is_connect(), "{e}"),
            other => panic!("expected a transport error, got {other:?}"),
        }
        assert_eq!(api.call_count(), 1);
    }
}
