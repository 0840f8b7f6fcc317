use std::path::{Path, PathBuf};

use actix_web::{web, App, HttpServer};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use edutrack::{
    config::Config,
    form::{FormController, FormOutcome},
    routes::{self, AppState},
    schema::{display_label, FieldKind, ATTRIBUTES},
    upload::{BatchUploadController, DOWNLOAD_FILENAME},
    HttpPredictionApi, UploadFile,
};

#[derive(Parser)]
#[command(name = "edutrack")]
#[command(about = "EduTrack - student performance predictor client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the predictor page (default)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Predict one student's grade
    Predict {
        #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
    /// Upload a CSV for batch prediction and save the result
    Upload {
        csv: PathBuf,
        #[arg(long, default_value = DOWNLOAD_FILENAME)]
        out: PathBuf,
    },
    /// List the student attributes and their options
    Fields,
    /// Write an empty CSV with the attribute columns
    Template {
        #[arg(long, default_value = "students.csv")]
        out: PathBuf,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))
}

async fn start_api(api: HttpPredictionApi, host: &str, port: u16) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(api));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes::configure::<HttpPredictionApi>)
    })
    .bind((host, port))?
    .run()
    .await
}

async fn predict(api: &HttpPredictionApi, fields: Vec<(String, String)>) -> anyhow::Result<()> {
    let mut form = FormController::new();
    for (name, value) in fields {
        form.handle_change(&name, value)?;
    }

    match form.submit(api).await {
        Some(FormOutcome::Predicted(label)) => {
            println!("🎯 Predicted Grade: {label}");
            Ok(())
        }
        Some(FormOutcome::Failed) | None => {
            bail!("{}", form.error().unwrap_or("prediction failed"))
        }
    }
}

async fn upload(api: &HttpPredictionApi, csv: &Path, out: &Path) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(csv)
        .await
        .with_context(|| format!("failed to read {}", csv.display()))?;
    let name = csv
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.csv".to_string());

    let mut panel = BatchUploadController::new();
    panel.select_file(Some(UploadFile { name, bytes }));
    panel.submit(api).await;

    if let Some(message) = panel.message() {
        println!("{message}");
    }

    if let Some(download) = panel.take_download() {
        let contents = api
            .fetch_download(&download.url)
            .await
            .with_context(|| format!("failed to download {}", download.url))?;
        tokio::fs::write(out, contents)
            .await
            .with_context(|| format!("failed to write {}", out.display()))?;
        println!("📥 Saved predictions to {}", out.display());
    }

    Ok(())
}

fn list_fields() {
    for field in ATTRIBUTES.iter() {
        match field.kind {
            FieldKind::Number { step } => {
                println!("{:<18} {} (number, step {step})", field.name, display_label(field.name))
            }
            FieldKind::Choice { options } => {
                let choices: Vec<String> = options
                    .iter()
                    .enumerate()
                    .map(|(idx, option)| format!("{idx}={option}"))
                    .collect();
                println!("{:<18} {} ({})", field.name, display_label(field.name), choices.join(", "));
            }
        }
    }
}

fn write_template(out: &Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(out)
        .with_context(|| format!("failed to create {}", out.display()))?;
    writer.write_record(ATTRIBUTES.iter().map(|f| f.name))?;
    writer.flush()?;
    println!("Template written to {}.", out.display());
    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load();
    let api = HttpPredictionApi::new(config.api_base())
        .context("prediction service URL is malformed")?;

    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.host);
            let port = port.unwrap_or(config.port);

            info!("🌐 Starting EduTrack on http://{host}:{port}");
            start_api(api, &host, port)
                .await
                .with_context(|| format!("failed to serve on {host}:{port}"))?;
        }
        Commands::Predict { fields } => predict(&api, fields).await?,
        Commands::Upload { csv, out } => upload(&api, &csv, &out).await?,
        Commands::Fields => list_fields(),
        Commands::Template { out } => write_template(&out)?,
    }

    Ok(())
}
