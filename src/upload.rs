//! Binary uploads to the remote object store.
//!
//! Only the public URL comes back into local state, and only after the
//! upload succeeded. Validation failures never reach the network.

use std::path::Path;

use chrono::{DateTime, Local};
use log::{error, info, warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use uuid::Uuid;

use crate::errors::{AppError, AssetKind};
use crate::models::{UserProfile, WorkoutVideo};
use crate::storage::{KeyValueStore, RecordStore};

pub const PROFILE_PICTURES_BUCKET: &str = "profile-pictures";
pub const WORKOUT_VIDEOS_BUCKET: &str = "workout-videos";

pub const MAX_PROFILE_PICTURE_BYTES: u64 = 5 * 1024 * 1024;
pub const MAX_VIDEO_BYTES: u64 = 50 * 1024 * 1024;

impl AssetKind {
    pub fn bucket(self) -> &'static str {
        match self {
            Self::ProfilePicture => PROFILE_PICTURES_BUCKET,
            Self::WorkoutVideo => WORKOUT_VIDEOS_BUCKET,
        }
    }

    pub fn max_bytes(self) -> u64 {
        match self {
            Self::ProfilePicture => MAX_PROFILE_PICTURE_BYTES,
            Self::WorkoutVideo => MAX_VIDEO_BYTES,
        }
    }

    pub fn mime_prefix(self) -> &'static str {
        match self {
            Self::ProfilePicture => "image/",
            Self::WorkoutVideo => "video/",
        }
    }
}

/// A file picked for upload.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    /// Sniffs the MIME type from the content.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime = infer::get(&bytes).map(|t| t.mime_type().to_string());
        Self {
            name: name.into(),
            mime,
            bytes,
        }
    }

    /// Reads `path` for an upload of `kind`. The size limit is checked against
    /// the file's metadata first, so an oversized file is never loaded.
    pub async fn read(path: &Path, kind: AssetKind) -> Result<Self, AppError> {
        let size = tokio::fs::metadata(path).await?.len();
        if size > kind.max_bytes() {
            let err = too_large(kind);
            warn!("{}: {err}", path.display());
            return Err(err);
        }

        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn extension(&self) -> Option<&str> {
        infer::get(&self.bytes)
            .map(|t| t.extension())
            .or_else(|| self.name.rsplit_once('.').map(|(_, ext)| ext))
    }
}

fn too_large(kind: AssetKind) -> AppError {
    AppError::validation(
        kind,
        format!("file must be at most {} MB", kind.max_bytes() / (1024 * 1024)),
    )
}

/// Size first, then type.
pub fn validate(kind: AssetKind, size: u64, mime: Option<&str>) -> Result<(), AppError> {
    if size == 0 {
        return Err(AppError::validation(kind, "file is empty"));
    }
    if size > kind.max_bytes() {
        return Err(too_large(kind));
    }
    match mime {
        Some(m) if m.starts_with(kind.mime_prefix()) => Ok(()),
        Some(m) => Err(AppError::validation(
            kind,
            format!("expected a {}* file, got {m}", kind.mime_prefix()),
        )),
        None => Err(AppError::validation(kind, "unable to detect file type")),
    }
}

/// The remote object store. Implementations only move bytes and hand back URLs.
#[allow(async_fn_in_trait)]
pub trait ObjectStorage {
    async fn upload(&self, bucket: &str, file_name: &str, mime: &str, bytes: Vec<u8>) -> Result<(), AppError>;
    fn public_url(&self, bucket: &str, file_name: &str) -> String;
}

/// Supabase-style storage REST endpoint.
pub struct HttpStorage {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpStorage {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

impl ObjectStorage for HttpStorage {
    async fn upload(&self, bucket: &str, file_name: &str, mime: &str, bytes: Vec<u8>) -> Result<(), AppError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, file_name);
        let resp = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("apikey", &self.api_key)
            .header(CONTENT_TYPE, mime)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Upload(format!("{status}: {body}")));
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, file_name: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, bucket, file_name)
    }
}

async fn push<O: ObjectStorage>(storage: &O, kind: AssetKind, file_name: &str, file: LocalFile) -> Result<String, AppError> {
    let mime = file.mime.clone().unwrap_or_default();
    info!("uploading {} ({} bytes) to {}/{}", kind, file.size(), kind.bucket(), file_name);

    if let Err(e) = storage.upload(kind.bucket(), file_name, &mime, file.bytes).await {
        error!("{kind} upload failed: {e}");
        return Err(e);
    }
    Ok(storage.public_url(kind.bucket(), file_name))
}

fn check(kind: AssetKind, file: &LocalFile) -> Result<(), AppError> {
    validate(kind, file.size(), file.mime.as_deref()).inspect_err(|e| warn!("{e}"))
}

/// Uploads a new profile picture and points the stored profile at it.
pub async fn upload_profile_picture<S: KeyValueStore, O: ObjectStorage>(
    store: &RecordStore<S>,
    storage: &O,
    file: LocalFile,
) -> Result<UserProfile, AppError> {
    let kind = AssetKind::ProfilePicture;
    check(kind, &file)?;

    let file_name = format!("profile-{}.{}", Uuid::new_v4(), file.extension().unwrap_or("img"));
    let url = push(storage, kind, &file_name, file).await?;

    let mut profile = store.profile();
    profile.profile_picture = Some(url);
    store
        .save_profile(&profile)
        .map_err(|e| AppError::Upload(format!("uploaded but could not save profile: {e:#}")))?;
    Ok(profile)
}

/// Spaces and path separators don't survive as object keys.
fn object_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect()
}

pub async fn upload_video<S: KeyValueStore, O: ObjectStorage>(
    store: &RecordStore<S>,
    storage: &O,
    title: &str,
    file: LocalFile,
    now: DateTime<Local>,
) -> Result<WorkoutVideo, AppError> {
    let kind = AssetKind::WorkoutVideo;
    check(kind, &file)?;
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::validation(kind, "please enter a title for your video"));
    }

    let file_name = format!("workout-{}-{}", now.timestamp_millis(), object_safe(&file.name));
    let size = file.size();
    let url = push(storage, kind, &file_name, file).await?;

    let video = WorkoutVideo {
        id: Uuid::now_v7().to_string(),
        title: title.to_string(),
        url,
        upload_date: now.date_naive().format("%Y-%m-%d").to_string(),
        size,
    };

    let mut videos = store.videos();
    videos.push(video.clone());
    store
        .save_videos(&videos)
        .map_err(|e| AppError::Upload(format!("uploaded but could not save video list: {e:#}")))?;
    Ok(video)
}
