use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use actix_multipart::Multipart;
use actix_web::{http::header, web, HttpResponse};
use futures_util::StreamExt;
use tracing::{info, warn};

use crate::{
    api::{PredictionApi, UploadFile},
    form::{request_prediction, FormController},
    page::render_page,
    theme::Theme,
    upload::{request_batch, BatchUploadController},
};

/// Everything the page shows. Each controller is guarded on its own and no
/// guard is held while a request to the prediction service is in flight.
pub struct AppState<A> {
    pub api: A,
    pub form: Mutex<FormController>,
    pub upload: Mutex<BatchUploadController>,
    pub theme: Mutex<Theme>,
}

impl<A> AppState<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            form: Mutex::new(FormController::new()),
            upload: Mutex::new(BatchUploadController::new()),
            theme: Mutex::new(Theme::default()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn render<A>(state: &AppState<A>) -> HttpResponse {
    let theme = *lock(&state.theme);
    let form = lock(&state.form).clone();
    let (message, download) = {
        let mut upload = lock(&state.upload);
        (upload.message().map(str::to_string), upload.take_download())
    };

    let html = render_page(theme, &form, message.as_deref(), download.as_ref());
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

async fn index<A: PredictionApi + 'static>(state: web::Data<AppState<A>>) -> HttpResponse {
    render(&state)
}

async fn predict<A: PredictionApi + 'static>(
    state: web::Data<AppState<A>>,
    fields: web::Form<HashMap<String, String>>,
) -> HttpResponse {
    let values = {
        let mut form = lock(&state.form);
        for (name, value) in fields.into_inner() {
            if let Err(e) = form.handle_change(&name, value) {
                warn!("Ignoring form input: {e}");
            }
        }
        form.begin_submit()
    };

    if let Some(values) = values {
        let outcome = request_prediction(&state.api, &values).await;
        info!("Prediction outcome: {outcome:?}");
        lock(&state.form).finish_submit(outcome);
    }

    render(&state)
}

/// Reads the `file` part. A part without a filename is what browsers send
/// when nothing was picked.
async fn read_file_part(payload: &mut Multipart) -> Result<Option<UploadFile>, actix_web::Error> {
    let mut file = None;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let disposition = field.content_disposition();
        let is_file = disposition.get_name() == Some("file");
        let filename = disposition.get_filename().map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            bytes.extend_from_slice(&chunk?);
        }

        if is_file {
            file = filename
                .filter(|name| !name.is_empty())
                .map(|name| UploadFile { name, bytes });
        }
    }

    Ok(file)
}

async fn predict_csv<A: PredictionApi + 'static>(
    state: web::Data<AppState<A>>,
    mut payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    let file = read_file_part(&mut payload).await?;

    let file = {
        let mut upload = lock(&state.upload);
        upload.select_file(file);
        upload.begin_submit()
    };

    if let Some(file) = file {
        let outcome = request_batch(&state.api, &file).await;
        lock(&state.upload).finish_submit(outcome);
    }

    Ok(render(&state))
}

async fn toggle_theme<A: PredictionApi + 'static>(state: web::Data<AppState<A>>) -> HttpResponse {
    lock(&state.theme).toggle();

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

pub fn configure<A: PredictionApi + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index::<A>))
        .route("/predict", web::post().to(predict::<A>))
        .route("/predict_csv", web::post().to(predict_csv::<A>))
        .route("/theme", web::post().to(toggle_theme::<A>));
}
