use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::orchestrator::{BatchResult, GenerationRequest};
use crate::state::AppState;
use crate::utils::encoding::{decode_base64_image, encode_base64};
use crate::utils::timing::RequestTimer;

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    upload_file: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    session_id: String,
    stored_img: String,
}

pub async fn upload_image(
    State(state): State<AppState>,
    Json(body): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut timer = RequestTimer::start("images/upload");

    let payload = body
        .upload_file
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            timer.mark_status("error", Some("missing upload_file".to_string()));
            ApiError::Validation("No upload_file provided.".to_string())
        })?;

    let data = decode_base64_image(&payload).map_err(|err| {
        timer.mark_status("error", Some("invalid base64".to_string()));
        ApiError::Validation(format!("Invalid base64 payload: {err}"))
    })?;

    let extension = infer::get(&data)
        .map(|kind| kind.extension())
        .unwrap_or("png");
    let session_id = Uuid::new_v4().to_string();
    let stored_img = format!("{session_id}.{extension}");
    let metadata = HashMap::from([("file_name".to_string(), "img".to_string())]);

    state
        .store
        .put(
            &state.config.input_container,
            &stored_img,
            data,
            Some(metadata),
        )
        .await?;
    info!("Stored uploaded selfie as {stored_img}");

    Ok(Json(UploadResponse {
        session_id,
        stored_img,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    container_name: Option<String>,
    session_id: Option<String>,
    stored_img: Option<String>,
    filters: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    status: &'static str,
    message: &'static str,
    files: BatchResult,
}

/// Runs one stylization batch. Individual filter failures are reported
/// inside `files`; the call itself still returns 200.
pub async fn process_images(
    State(state): State<AppState>,
    Json(body): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let mut timer = RequestTimer::start("images/process");

    let input_container = body
        .container_name
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| state.config.input_container.clone());
    let request = GenerationRequest {
        session_id: body.session_id.unwrap_or_default(),
        source_image_ref: body.stored_img.unwrap_or_default(),
        filters: body.filters.unwrap_or_default(),
    };

    let files = state
        .orchestrator
        .run(&input_container, &request)
        .await
        .map_err(|err| {
            timer.mark_status("error", Some(err.to_string()));
            ApiError::from(err)
        })?;

    let failed = files
        .iter()
        .filter(|(_, outcome)| !matches!(outcome, crate::orchestrator::FilterOutcome::Success(_)))
        .count();
    timer.mark_status(
        "success",
        Some(format!("filters={} failed={failed}", files.len())),
    );

    Ok(Json(ProcessResponse {
        status: "200 OK",
        message: "Images generated successfully.",
        files,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ReturnRequest {
    image_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReturnResponse {
    base64_img: String,
}

pub async fn return_image(
    State(state): State<AppState>,
    Json(body): Json<ReturnRequest>,
) -> Result<Json<ReturnResponse>, ApiError> {
    let _timer = RequestTimer::start("images/return");

    let image_id = body
        .image_id
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("No image_id provided.".to_string()))?;

    let bytes = state
        .store
        .get(&state.config.output_container, &image_id)
        .await?;

    Ok(Json(ReturnResponse {
        base64_img: format!("data:image/png;base64,{}", encode_base64(&bytes)),
    }))
}
