use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use crate::error::{ArchiveError, Result};
use crate::moderation::{bucket_identifier, UPLOAD_BUCKET_SECONDS};
use crate::object_store::FsObjectStore;
use crate::repository::NewDocumentInput;
use crate::sanitiser;
use crate::server::AppState;

const KNOWN_LANGUAGES: &[&str] = &[
    "english", "french", "spanish", "arabic", "russian", "portuguese", "mandarin", "chinese",
    "burmese", "myanmar",
];

struct RawUpload {
    bytes: Vec<u8>,
    filename: String,
    content_type: String,
    title: Option<String>,
    country: Option<String>,
    state: Option<String>,
    document_language: Option<String>,
    description: Option<String>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    document_id: i32,
    file_url: String,
    file_path: String,
    job_id: Option<i32>,
    message: String,
}

#[derive(Serialize)]
pub struct UploadMultipleResponse {
    uploaded: usize,
    rejected: usize,
    documents: Vec<UploadResponse>,
}

pub async fn upload_single(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    enforce_upload_rate_limit(&state).await?;
    let raw = parse_multipart(multipart).await?;
    let response = ingest(&state, raw).await?;
    let _ = headers;
    Ok(Json(response))
}

pub async fn upload_multiple(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadMultipleResponse>> {
    enforce_upload_rate_limit(&state).await?;

    const MAX_FILES: usize = 10;
    let mut uploads = Vec::new();
    let mut shared_title = None;
    let mut shared_country = None;
    let mut shared_state = None;
    let mut shared_language = None;
    let mut shared_description = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| ArchiveError::InputInvalid(e.to_string()))? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => shared_title = field.text().await.ok(),
            "country" => shared_country = field.text().await.ok(),
            "state" => shared_state = field.text().await.ok(),
            "document_language" => shared_language = field.text().await.ok(),
            "description" => shared_description = field.text().await.ok(),
            "file" | "files" => {
                if uploads.len() >= MAX_FILES {
                    continue;
                }
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
                let bytes = field.bytes().await.map_err(|e| ArchiveError::InputInvalid(e.to_string()))?.to_vec();
                uploads.push((filename, content_type, bytes));
            }
            _ => {}
        }
    }

    let mut documents = Vec::new();
    let mut rejected = 0;
    for (filename, content_type, bytes) in uploads {
        let raw = RawUpload {
            bytes,
            filename,
            content_type,
            title: shared_title.clone(),
            country: shared_country.clone(),
            state: shared_state.clone(),
            document_language: shared_language.clone(),
            description: shared_description.clone(),
        };
        match ingest(&state, raw).await {
            Ok(response) => documents.push(response),
            Err(_) => rejected += 1,
        }
    }

    Ok(Json(UploadMultipleResponse { uploaded: documents.len(), rejected, documents }))
}

async fn enforce_upload_rate_limit(state: &AppState) -> Result<()> {
    let identifier = bucket_identifier("upload", UPLOAD_BUCKET_SECONDS);
    state
        .upload_limiter
        .check_and_record(&identifier, UPLOAD_BUCKET_SECONDS)
        .await
        .map_err(|e| ArchiveError::RateLimited { retry_after_seconds: e.retry_after_seconds as i64 })
}

async fn parse_multipart(mut multipart: Multipart) -> Result<RawUpload> {
    let mut bytes = None;
    let mut filename = None;
    let mut content_type = String::from("application/octet-stream");
    let mut title = None;
    let mut country = None;
    let mut state = None;
    let mut document_language = None;
    let mut description = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| ArchiveError::InputInvalid(e.to_string()))? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
                bytes = Some(field.bytes().await.map_err(|e| ArchiveError::InputInvalid(e.to_string()))?.to_vec());
            }
            "title" => title = field.text().await.ok(),
            "country" => country = field.text().await.ok(),
            "state" => state = field.text().await.ok(),
            "document_language" => document_language = field.text().await.ok(),
            "description" => description = field.text().await.ok(),
            _ => {}
        }
    }

    Ok(RawUpload {
        bytes: bytes.ok_or_else(|| ArchiveError::InputInvalid("missing file field".into()))?,
        filename: filename.unwrap_or_else(|| "upload".to_string()),
        content_type,
        title,
        country,
        state,
        document_language,
        description,
    })
}

async fn ingest(state: &AppState, raw: RawUpload) -> Result<UploadResponse> {
    let language = raw
        .document_language
        .as_deref()
        .map(|l| l.to_lowercase())
        .filter(|l| KNOWN_LANGUAGES.contains(&l.as_str()))
        .unwrap_or_else(|| "english".to_string());

    let sanitised = sanitiser::sanitise(&raw.bytes, &raw.content_type, &raw.filename, chrono::Utc::now())?;
    let key = FsObjectStore::content_key(&sanitised.pdf_bytes, "pdf");
    state.object_store.put(&key, &sanitised.pdf_bytes).await?;

    let title = raw.title.unwrap_or_else(|| raw.filename.clone());
    let country = raw.country.unwrap_or_default();
    let state_field = raw.state.unwrap_or_default();
    let file_url = state.object_store.presigned_url(&key, 3600);

    let document = state
        .documents
        .create(NewDocumentInput {
            title: &title,
            country: &country,
            state: &state_field,
            description: raw.description.as_deref(),
            document_language: &language,
            file_path: &key,
            file_url: &file_url,
            original_filename: &raw.filename,
            file_size: sanitised.pdf_bytes.len() as i64,
            content_type: "application/pdf",
        })
        .await?;

    Ok(UploadResponse {
        document_id: document.id,
        file_url,
        file_path: document.file_path,
        job_id: None,
        message: "document received and pending review".to_string(),
    })
}
