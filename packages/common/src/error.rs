use thiserror::Error;

/// Errors raised while loading shared resources such as asset manifests
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Asset '{asset_id}' has an empty url")]
    EmptyAssetUrl { asset_id: String },
}

pub type CommonResult<T> = Result<T, CommonError>;
