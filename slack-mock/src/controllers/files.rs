use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use futures_util::TryStreamExt;

use crate::controllers::chat::{invalid_arguments, storage_error};
use crate::middleware::bearer::require_bearer;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/files.upload").route(web::post().to(upload_file)));
}

/// Collected multipart form fields; file content is only sized, never stored.
#[derive(Default)]
struct UploadForm {
    channels: Option<String>,
    title: Option<String>,
    initial_comment: Option<String>,
    file_name: Option<String>,
    mimetype: Option<String>,
    file_size: i64,
    has_file: bool,
}

async fn read_upload_form(payload: &mut Multipart) -> Result<UploadForm, actix_multipart::MultipartError> {
    let mut form = UploadForm::default();

    while let Some(mut field) = payload.try_next().await? {
        let name = field
            .content_disposition()
            .get_name()
            .unwrap_or("")
            .to_string();

        if name == "file" {
            form.has_file = true;
            form.file_name = field
                .content_disposition()
                .get_filename()
                .map(|s| s.to_string());
            form.mimetype = field.content_type().map(|m| m.to_string());
            while let Some(chunk) = field.try_next().await? {
                form.file_size += chunk.len() as i64;
            }
        } else {
            let mut data = Vec::new();
            while let Some(chunk) = field.try_next().await? {
                data.extend_from_slice(&chunk);
            }
            let value = String::from_utf8_lossy(&data).to_string();
            match name.as_str() {
                "channels" => form.channels = Some(value),
                "title" => form.title = Some(value),
                "initial_comment" => form.initial_comment = Some(value),
                _ => {}
            }
        }
    }

    Ok(form)
}

async fn upload_file(
    state: web::Data<AppState>,
    req: HttpRequest,
    mut payload: Multipart,
) -> impl Responder {
    if let Err(resp) = require_bearer(&state.config, &req) {
        return resp;
    }

    let form = match read_upload_form(&mut payload).await {
        Ok(form) => form,
        Err(e) => {
            log::warn!("Malformed multipart payload: {}", e);
            return invalid_arguments();
        }
    };

    if !form.has_file || form.channels.is_none() {
        return invalid_arguments();
    }

    let file_name = form.file_name.unwrap_or_else(|| "upload".to_string());
    let mimetype = form
        .mimetype
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let filetype = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    log::info!(
        "Uploading file {} ({} bytes) to channels {}",
        file_name,
        form.file_size,
        form.channels.as_deref().unwrap_or("")
    );

    let file = match state.db.create_file(
        &file_name,
        form.title.as_deref(),
        &mimetype,
        &filetype,
        form.file_size,
        None,
    ) {
        Ok(file) => file,
        Err(e) => {
            log::error!("Failed to record upload: {}", e);
            return storage_error();
        }
    };

    // An initial comment becomes a message in every named channel
    if let Some(comment) = form.initial_comment.filter(|c| !c.is_empty()) {
        let channels = form.channels.unwrap_or_default();
        for channel_name in channels.split(',').map(str::trim) {
            let channel = match state.db.get_channel_by_name(channel_name) {
                Ok(Some(channel)) => channel,
                Ok(None) => continue,
                Err(e) => {
                    log::error!("Channel lookup failed during upload: {}", e);
                    continue;
                }
            };
            let text = format!("{}\nUploaded: {}", comment, file_name);
            if let Err(e) = state.db.create_message(&channel.id, "FileUploader", &text, None) {
                log::error!("Failed to post upload comment to {}: {}", channel_name, e);
            }
        }
    }

    HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "file": file.to_slack_json()
    }))
}
