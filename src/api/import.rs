use std::path::Path;

use axum::extract::Multipart;
use tempfile::NamedTempFile;

use crate::api::envelope::Envelope;
use crate::catalog::categories::normalize_and_register;
use crate::db::category_repository::CategoryRepository;
use crate::db::models::{new_id, Tool};
use crate::db::tool_repository::ToolRepository;
use crate::error::AppError;
use crate::import::spreadsheet::{read_first_sheet, ImportRow};

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Extension used for the temporary copy; the workbook reader picks its
/// format from it.
fn workbook_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|e| WORKBOOK_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or_else(|| "xlsx".to_string())
}

/// Store the multipart field named "file" in a temporary file under
/// `upload_dir`. The file is removed when the returned handle is dropped.
async fn receive_upload(
    upload_dir: &Path,
    multipart: &mut Multipart,
) -> Result<NamedTempFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let extension = workbook_extension(field.file_name());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;

        let upload = tempfile::Builder::new()
            .prefix("import-")
            .suffix(&format!(".{extension}"))
            .tempfile_in(upload_dir)
            .map_err(|e| AppError::Internal(format!("Failed to create upload file: {e}")))?;

        tokio::fs::write(upload.path(), &data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {e}")))?;

        return Ok(upload);
    }

    Err(AppError::BadRequest("No file uploaded".into()))
}

/// Core import logic: turn mapped sheet rows into tools and bulk-insert them.
///
/// Every row must carry a name; otherwise nothing is written. Category
/// strings are normalized and registered like on single creation. The
/// insert is one ordered batch: a failure part-way leaves the earlier rows
/// stored.
pub async fn process_import(
    tools: &dyn ToolRepository,
    categories: &dyn CategoryRepository,
    rows: Vec<ImportRow>,
) -> Result<Vec<Tool>, AppError> {
    if let Some(row) = rows.iter().find(|r| r.name.is_none()) {
        return Err(AppError::BadRequest(format!(
            "Row {} has no name",
            row.row_number
        )));
    }

    let mut imported = Vec::with_capacity(rows.len());
    for row in rows {
        let category = match row.category.as_deref() {
            Some(raw) => normalize_and_register(categories, raw).await?,
            None => None,
        };

        imported.push(Tool {
            id: new_id(),
            name: row.name.unwrap_or_default(),
            category,
            subtitle: row.subtitle,
            rating: row.rating,
            website_link: row.website_link,
            image_link: row.image_link,
            features: row.features,
            sharable_link: row.sharable_link,
            subscription: None,
        });
    }

    let inserted = tools.insert_many(&imported).await?;
    tracing::info!("Imported {} tools", inserted);

    Ok(imported)
}

/// Axum handler for `POST /api/tools/import`.
///
/// Accepts a multipart form with a single spreadsheet field named "file".
pub async fn import_tools_handler(
    axum::extract::State(state): axum::extract::State<crate::app::AppState>,
    mut multipart: Multipart,
) -> Result<Envelope<Vec<Tool>>, AppError> {
    let upload = receive_upload(&state.upload_dir, &mut multipart).await?;

    let path = upload.path().to_path_buf();
    let rows = tokio::task::spawn_blocking(move || read_first_sheet(&path))
        .await
        .map_err(|e| AppError::Internal(format!("Workbook parsing aborted: {e}")))??;

    let imported = process_import(
        state.tool_repo.as_ref(),
        state.category_repo.as_ref(),
        rows,
    )
    .await?;

    // Remove the upload now; on the error paths above dropping `upload` does it.
    if let Err(e) = upload.close() {
        tracing::warn!("Failed to remove upload file: {e}");
    }

    Ok(Envelope::created(
        format!("{} tools imported successfully.", imported.len()),
        imported,
    ))
}
