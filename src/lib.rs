//! EduTrack student grade prediction client.
//!
//! Collects the 13 student attributes, relays them to the remote prediction
//! service and shows the predicted grade, or uploads a CSV for batch
//! prediction and hands back the result file.

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod grade;
pub mod page;
pub mod routes;
pub mod schema;
pub mod theme;
pub mod upload;

#[cfg(test)]
mod mock;

pub use api::{HttpPredictionApi, PredictionApi, ServiceReply, UploadFile};
pub use config::{BuildMode, Config};
pub use error::{ApiError, FieldError};
pub use form::{FormController, FormOutcome};
pub use upload::{BatchUploadController, Download, UploadOutcome};
