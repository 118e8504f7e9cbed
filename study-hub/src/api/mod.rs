//! HTTP API layer exposing the materials tree and the upload sandbox.

mod error;

pub use error::ApiError;

use axum::{
    body::Body,
    extract::{
        multipart::MultipartError, rejection::JsonRejection, DefaultBodyLimit, Multipart, Path,
        State,
    },
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_hub_core::storage::tree::MaterialSource;
use study_hub_core::storage::{
    MaterialsTree, NewMaterial, NodeRecord, NodeUpdate, SourceFields, TreeDocument, TreeStore,
};
use study_hub_core::uploads::{Disposition, PathGuard, StoredFile, UploadService};
use study_hub_core::StoreError;
use tokio_util::io::ReaderStream;
use tracing::warn;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub materials: Arc<TreeStore>,
    pub uploads: Arc<UploadService>,
    pub guard: Arc<PathGuard>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FolderRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    parent_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MaterialRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    parent_id: String,
    #[serde(default)]
    material_type: String,
    #[serde(default)]
    description: String,
    #[serde(flatten)]
    source: SourceFields,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveRequest {
    #[serde(default)]
    new_parent_id: String,
}

#[derive(Serialize)]
struct DeleteResponse {
    status: &'static str,
    removed: Vec<String>,
}

pub fn router(materials: Arc<TreeStore>, uploads: Arc<UploadService>) -> Router {
    let limit = usize::try_from(uploads.max_bytes())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);
    let state = AppState {
        guard: Arc::new(PathGuard::new(uploads.dir())),
        materials,
        uploads,
    };
    Router::new()
        .route("/materials", get(get_tree))
        .route("/materials/folder", post(create_folder))
        .route("/materials/material", post(create_material))
        .route(
            "/materials/upload",
            post(upload_file).layer(DefaultBodyLimit::max(limit)),
        )
        .route("/materials/download/{id}", get(download_file))
        .route("/materials/view/{id}", get(view_file))
        .route(
            "/materials/{id}",
            get(get_node).put(update_node).delete(delete_node),
        )
        .route("/materials/{id}/move", put(move_node))
        .with_state(state)
}

/// Run a synchronous store operation off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> study_hub_core::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError(StoreError::Io(std::io::Error::other(e))))?
        .map_err(ApiError)
}

fn record_of(tree: &MaterialsTree, id: &str) -> study_hub_core::Result<NodeRecord> {
    tree.to_record(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

async fn get_tree(State(state): State<AppState>) -> Result<Json<TreeDocument>, ApiError> {
    let materials = state.materials.clone();
    let doc = blocking(move || materials.read(|tree| Ok(tree.to_document()))).await?;
    Ok(Json(doc))
}

async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NodeRecord>, ApiError> {
    let materials = state.materials.clone();
    let record = blocking(move || materials.read(|tree| record_of(tree, &id))).await?;
    Ok(Json(record))
}

async fn create_folder(
    State(state): State<AppState>,
    payload: Result<Json<FolderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NodeRecord>), ApiError> {
    let Json(req) = payload?;
    let materials = state.materials.clone();
    let record = blocking(move || {
        materials.mutate(|tree| {
            let id = tree.add_folder(&req.parent_id, &req.name)?;
            record_of(tree, &id)
        })
    })
    .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn create_material(
    State(state): State<AppState>,
    payload: Result<Json<MaterialRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NodeRecord>), ApiError> {
    let Json(req) = payload?;
    let materials = state.materials.clone();
    let record = blocking(move || {
        materials.mutate(|tree| {
            let id = tree.add_material(
                &req.parent_id,
                NewMaterial {
                    name: req.name,
                    material_type: req.material_type,
                    description: req.description,
                    source: req.source,
                },
            )?;
            record_of(tree, &id)
        })
    })
    .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NodeUpdate>, JsonRejection>,
) -> Result<Json<NodeRecord>, ApiError> {
    let Json(update) = payload?;
    let materials = state.materials.clone();
    let record = blocking(move || {
        materials.mutate(|tree| {
            tree.update_node(&id, &update)?;
            record_of(tree, &id)
        })
    })
    .await?;
    Ok(Json(record))
}

async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let materials = state.materials.clone();
    let removed = blocking(move || materials.mutate(|tree| tree.delete_node(&id))).await?;
    for node in &removed {
        if let Some(MaterialSource::File { file_path, .. }) = node.material().map(|m| &m.source) {
            warn!(id = %node.id(), path = %file_path, "uploaded file left behind by delete");
        }
    }
    Ok(Json(DeleteResponse {
        status: "removed",
        removed: removed.iter().map(|n| n.id().to_string()).collect(),
    }))
}

async fn move_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<TreeDocument>, ApiError> {
    let Json(req) = payload?;
    let materials = state.materials.clone();
    let doc = blocking(move || {
        materials.mutate(|tree| {
            tree.move_node(&id, &req.new_parent_id)?;
            Ok(tree.to_document())
        })
    })
    .await?;
    Ok(Json(doc))
}

async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<StoredFile>, ApiError> {
    let limit = state.uploads.max_bytes();
    let multipart_err = |e: MultipartError| ApiError::multipart(e, limit);
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_err)? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let uploads = state.uploads.clone();
        let mut pending = blocking(move || uploads.begin(&name)).await?;
        while let Some(chunk) = field.chunk().await.map_err(multipart_err)? {
            // a failed write drops the upload on the blocking thread, removing the file
            pending = blocking(move || {
                pending.write_chunk(&chunk)?;
                Ok(pending)
            })
            .await?;
        }
        let stored = blocking(move || pending.finish()).await?;
        return Ok(Json(stored));
    }
    Err(ApiError(StoreError::Validation(
        "multipart field \"file\" is required".to_string(),
    )))
}

async fn download_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    serve_file(state, id, Disposition::Attachment).await
}

async fn view_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    serve_file(state, id, Disposition::Inline).await
}

async fn serve_file(
    state: AppState,
    id: String,
    disposition: Disposition,
) -> Result<Response, ApiError> {
    let materials = state.materials.clone();
    let guard = state.guard.clone();
    let served = blocking(move || {
        let node = materials.read(|tree| {
            tree.find_by_id(&id)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(id.clone()))
        })?;
        guard.resolve(&node)
    })
    .await?;

    let file = tokio::fs::File::open(&served.path)
        .await
        .map_err(StoreError::from)?;
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(served.content_type),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(served.size));
    let disposition = HeaderValue::from_str(&served.content_disposition(disposition))
        .map_err(|e| StoreError::Validation(format!("invalid file name: {}", e)))?;
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}
