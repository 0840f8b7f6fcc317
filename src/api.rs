use reqwest::{
    multipart::{Form, Part},
    Client, Response, Url,
};
use serde_json::Value;
use tracing::debug;

use crate::{error::ApiError, schema::AttributeValues};

pub const PREDICT_PATH: &str = "predict";
pub const PREDICT_CSV_PATH: &str = "predict_csv";

/// A CSV picked by the user, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Raw answer from the prediction service. The body is kept undecoded so
/// each caller decides whether the status or the JSON content wins.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceReply {
    pub status: u16,
    pub body: String,
}

impl ServiceReply {
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn parse(&self) -> Result<Value, ApiError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Text of a reply field when it carries anything truthy. Empty strings,
/// `false`, `0` and `null` count as absent; other non-strings show as their
/// JSON text.
pub fn truthy_text(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

pub fn reported_error(body: &Value) -> Option<String> {
    truthy_text(body, "error")
}

#[allow(async_fn_in_trait)]
pub trait PredictionApi {
    async fn predict(&self, values: &AttributeValues) -> Result<ServiceReply, ApiError>;

    async fn predict_csv(&self, file: &UploadFile) -> Result<ServiceReply, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpPredictionApi {
    client: Client,
    base: Url,
}

impl HttpPredictionApi {
    pub fn new(base: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base).map_err(|e| ApiError::InvalidUrl {
            url: base.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base.as_str().trim_end_matches('/'))
    }

    /// Download links may be absolute or relative to the service origin.
    pub fn resolve(&self, url: &str) -> Result<Url, ApiError> {
        self.base.join(url).map_err(|e| ApiError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    pub async fn fetch_download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.resolve(url)?;
        debug!("GET {url}");

        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

async fn read_reply(response: Response) -> Result<ServiceReply, ApiError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    debug!("Prediction service answered {status}");

    Ok(ServiceReply { status, body })
}

impl PredictionApi for HttpPredictionApi {
    async fn predict(&self, values: &AttributeValues) -> Result<ServiceReply, ApiError> {
        let url = self.endpoint(PREDICT_PATH);
        debug!("POST {url}");

        let response = self.client.post(url).json(values).send().await?;
        read_reply(response).await
    }

    async fn predict_csv(&self, file: &UploadFile) -> Result<ServiceReply, ApiError> {
        let url = self.endpoint(PREDICT_CSV_PATH);
        debug!("POST {url} ({} bytes from {})", file.bytes.len(), file.name);

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str("text/csv")?;
        let form = Form::new().part("file", part);

        let response = self.client.post(url).multipart(form).send().await?;
        read_reply(response).await
    }
}
