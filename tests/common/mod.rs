#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use edutrack::{
    schema::AttributeValues, ApiError, PredictionApi, ServiceReply, UploadFile,
};
use serde_json::Value;

/// Answers every call with the same reply and shares its call log with the
/// test through cheap clones. Same shape as the library's unit-test mock.
#[derive(Clone)]
pub struct MockApi {
    reply: ServiceReply,
    pub calls: Arc<AtomicUsize>,
    pub sent_values: Arc<Mutex<Option<AttributeValues>>>,
    pub sent_file: Arc<Mutex<Option<UploadFile>>>,
}

impl MockApi {
    pub fn replying(status: u16, body: Value) -> Self {
        Self::raw(status, &body.to_string())
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            reply: ServiceReply {
                status,
                body: body.to_string(),
            },
            calls: Arc::new(AtomicUsize::new(0)),
            sent_values: Arc::new(Mutex::new(None)),
            sent_file: Arc::new(Mutex::new(None)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PredictionApi for MockApi {
    async fn predict(&self, values: &AttributeValues) -> Result<ServiceReply, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.sent_values.lock().unwrap() = Some(values.clone());
        Ok(self.reply.clone())
    }

    async fn predict_csv(&self, file: &UploadFile) -> Result<ServiceReply, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.sent_file.lock().unwrap() = Some(file.clone());
        Ok(self.reply.clone())
    }
}

pub const STUDENT: [(&str, &str); 13] = [
    ("Age", "17"),
    ("Gender", "1"),
    ("Ethnicity", "2"),
    ("ParentalEducation", "3"),
    ("StudyTimeWeekly", "9"),
    ("Absences", "4"),
    ("Tutoring", "1"),
    ("ParentalSupport", "2"),
    ("Extracurricular", "0"),
    ("Sports", "1"),
    ("Music", "0"),
    ("Volunteering", "1"),
    ("GPA", "3.1"),
];
