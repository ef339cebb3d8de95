use tracing::{error, warn};

use super::upload::TempUpload;
use crate::{
    error::AppError,
    storage::{AssetRef, MediaStore},
};

/// Uploads `file` to `folder`. Provider and network failures both surface as
/// `AssetUploadFailed`.
pub async fn upload_asset(
    media: &dyn MediaStore,
    file: &TempUpload,
    folder: &str,
) -> Result<AssetRef, AppError> {
    media
        .upload(file.path(), &file.content_type, folder)
        .await
        .map_err(|e| {
            error!(error = ?e, %folder, file_name = ?file.file_name, "media upload failed");
            AppError::AssetUploadFailed(folder.to_string())
        })
}

/// Swaps the asset behind a record field.
///
/// Without a new file the old reference is returned untouched. Otherwise the
/// new file is uploaded first; only once that succeeded is the old asset
/// destroyed, and a failed destroy is logged rather than returned.
pub async fn replace_asset(
    media: &dyn MediaStore,
    old: Option<AssetRef>,
    new_file: Option<&TempUpload>,
    folder: &str,
) -> Result<Option<AssetRef>, AppError> {
    let Some(file) = new_file else {
        return Ok(old);
    };

    let fresh = upload_asset(media, file, folder).await?;
    if let Some(old) = old {
        discard_asset(media, &old).await;
    }
    Ok(Some(fresh))
}

/// Best-effort removal of an asset no record references any more.
pub async fn discard_asset(media: &dyn MediaStore, asset: &AssetRef) {
    if let Err(e) = media.destroy(&asset.id).await {
        warn!(error = ?e, asset_id = %asset.id, "failed to destroy orphaned asset");
    }
}
