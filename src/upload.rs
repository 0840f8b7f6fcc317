use tracing::{error, info};

use crate::api::{reported_error, truthy_text, PredictionApi, UploadFile};

pub const NO_FILE_MESSAGE: &str = "⚠️ Please select a CSV file first.";
pub const DEFAULT_SUCCESS_MESSAGE: &str = "✅ File processed successfully!";
pub const UPLOAD_FAILED_MESSAGE: &str = "❌ Error uploading file.";
pub const DOWNLOAD_FILENAME: &str = "predicted_output.csv";

/// A result file the service asked the user to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub url: String,
    pub filename: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub message: String,
    pub download: Option<Download>,
}

/// Local state of the CSV batch panel.
#[derive(Debug, Clone, Default)]
pub struct BatchUploadController {
    file: Option<UploadFile>,
    message: Option<String>,
    pending_download: Option<Download>,
}

impl BatchUploadController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn select_file(&mut self, file: Option<UploadFile>) {
        self.file = file;
        self.message = None;
    }

    /// Hands back the file to send, or records the missing-file warning and
    /// returns `None`.
    pub fn begin_submit(&mut self) -> Option<UploadFile> {
        match &self.file {
            Some(file) => Some(file.clone()),
            None => {
                self.message = Some(NO_FILE_MESSAGE.to_string());
                None
            }
        }
    }

    pub fn finish_submit(&mut self, outcome: UploadOutcome) {
        self.message = Some(outcome.message);
        self.pending_download = outcome.download;
    }

    /// The download is started once; taking it discards it.
    pub fn take_download(&mut self) -> Option<Download> {
        self.pending_download.take()
    }

    pub async fn submit<A: PredictionApi>(&mut self, api: &A) -> Option<UploadOutcome> {
        let file = self.begin_submit()?;
        let outcome = request_batch(api, &file).await;
        self.finish_submit(outcome.clone());
        Some(outcome)
    }
}

/// One round trip to `/predict_csv`. Unlike the form, a service-reported
/// error is shown to the user as is.
pub async fn request_batch<A: PredictionApi>(api: &A, file: &UploadFile) -> UploadOutcome {
    let failed = || UploadOutcome {
        message: UPLOAD_FAILED_MESSAGE.to_string(),
        download: None,
    };

    let body = match api.predict_csv(file).await.and_then(|reply| reply.parse()) {
        Ok(body) => body,
        Err(e) => {
            error!("Batch upload of {} failed: {e}", file.name);
            return failed();
        }
    };

    if !body.is_object() {
        error!("Batch upload of {} answered with a non-object body: {body}", file.name);
        return failed();
    }

    if let Some(detail) = reported_error(&body) {
        info!("Batch upload of {} rejected: {detail}", file.name);
        return UploadOutcome {
            message: format!("❌ {detail}"),
            download: None,
        };
    }

    let message = truthy_text(&body, "message").unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
    let download = truthy_text(&body, "download_url").map(|url| Download {
        url,
        filename: DOWNLOAD_FILENAME,
    });

    UploadOutcome { message, download }
}
