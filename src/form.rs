use tracing::{error, info};

use crate::{
    api::{reported_error, PredictionApi},
    error::FieldError,
    grade::grade_label,
    schema::AttributeValues,
};

pub const GENERIC_ERROR: &str = "⚠️ Something went wrong. Please try again!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Predicted(&'static str),
    Failed,
}

/// Local state of the single-student prediction form.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    values: AttributeValues,
    prediction: Option<&'static str>,
    error: Option<String>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &AttributeValues {
        &self.values
    }

    pub fn prediction(&self) -> Option<&'static str> {
        self.prediction
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_change(&mut self, name: &str, value: impl Into<String>) -> Result<(), FieldError> {
        self.values.set(name, value)
    }

    /// Clears the previous error and result and hands back the values to
    /// send. Returns `None` without touching the network when a field is
    /// empty or not of its declared kind.
    pub fn begin_submit(&mut self) -> Option<AttributeValues> {
        self.error = None;
        self.prediction = None;

        let problems = self.values.validate();
        if problems.is_empty() {
            return Some(self.values.clone());
        }

        let detail = problems
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        info!("Form not submitted: {detail}");
        self.error = Some(format!("⚠️ {detail}"));
        None
    }

    pub fn finish_submit(&mut self, outcome: FormOutcome) {
        match outcome {
            FormOutcome::Predicted(label) => {
                self.prediction = Some(label);
                self.error = None;
            }
            FormOutcome::Failed => {
                self.prediction = None;
                self.error = Some(GENERIC_ERROR.to_string());
            }
        }
    }

    pub async fn submit<A: PredictionApi>(&mut self, api: &A) -> Option<FormOutcome> {
        let values = self.begin_submit()?;
        let outcome = request_prediction(api, &values).await;
        self.finish_submit(outcome);
        Some(outcome)
    }
}

/// One round trip to `/predict`. Every failure collapses into
/// [`FormOutcome::Failed`]; the detail only reaches the log.
pub async fn request_prediction<A: PredictionApi>(api: &A, values: &AttributeValues) -> FormOutcome {
    let reply = match api.predict(values).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Prediction request failed: {e}");
            return FormOutcome::Failed;
        }
    };

    if !reply.is_success() {
        error!("Server error: status {}", reply.status);
        return FormOutcome::Failed;
    }

    let body = match reply.parse() {
        Ok(body) => body,
        Err(e) => {
            error!("Prediction response unreadable: {e}");
            return FormOutcome::Failed;
        }
    };

    if let Some(detail) = reported_error(&body) {
        error!("Prediction service reported: {detail}");
        return FormOutcome::Failed;
    }

    match body.get("predicted_grade_class") {
        Some(class) if !class.is_null() => FormOutcome::Predicted(grade_label(class)),
        _ => {
            error!("Prediction response has no predicted_grade_class: {body}");
            FormOutcome::Failed
        }
    }
}
