use super::service::{self, Input, Outcome, Spreadsheet, NO_RESULTS_MESSAGE};
use crate::boundary::BoundarySet;
use crate::conf::Conf;
use crate::export;
use crate::filter::Selection;
use crate::photo::PhotoLibrary;
use crate::{Error, Result};
use actix_multipart::Multipart;
use actix_web::http::header::ContentDisposition;
use actix_web::web::{self, Data, Json};
use actix_web::{post, HttpResponse};
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize, Deserialize)]
pub struct RenderResponse {
    pub row_count: usize,
    pub districts: Vec<String>,
    pub usages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[post("/render")]
pub async fn render(
    payload: Multipart,
    boundaries: Data<BoundarySet>,
    conf: Data<Conf>,
) -> Result<Json<RenderResponse>> {
    let outcome = run(payload, boundaries, &conf).await?;
    let html = match &outcome.map {
        Some(map) => Some(export::to_html(map)?),
        None => None,
    };
    Ok(Json(RenderResponse {
        row_count: outcome.row_count,
        districts: outcome.options.districts,
        usages: outcome.options.usages,
        html,
        message: outcome.message,
    }))
}

#[post("/export")]
pub async fn export_html(
    payload: Multipart,
    boundaries: Data<BoundarySet>,
    conf: Data<Conf>,
) -> Result<HttpResponse> {
    let outcome = run(payload, boundaries, &conf).await?;
    let Some(map) = outcome.map else {
        return Err(Error::InvalidInput(NO_RESULTS_MESSAGE.into()));
    };
    Ok(HttpResponse::Ok()
        .content_type(export::CONTENT_TYPE)
        .insert_header(ContentDisposition::attachment(export::FILE_NAME))
        .body(export::to_html(&map)?))
}

async fn run(payload: Multipart, boundaries: Data<BoundarySet>, conf: &Conf) -> Result<Outcome> {
    let input = read_input(payload, conf.max_upload_bytes).await?;
    // Parsing workbooks and encoding photos is CPU bound
    let outcome = web::block(move || service::run(input, &boundaries)).await??;
    Ok(outcome)
}

/// Drains the form into memory. The byte limit covers all parts together.
async fn read_input(mut payload: Multipart, max_bytes: usize) -> Result<Input> {
    let mut spreadsheet = None;
    let mut photos = PhotoLibrary::default();
    let mut selection = Selection::default();
    let mut total_bytes = 0;
    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|it| it.get_filename())
            .filter(|it| !it.is_empty())
            .map(|it| it.to_string());
        let mut bytes = vec![];
        while let Some(chunk) = field.try_next().await? {
            total_bytes += chunk.len();
            if total_bytes > max_bytes {
                return Err(Error::InvalidInput(format!(
                    "Upload is larger than {max_bytes} bytes"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        match (name.as_str(), file_name) {
            ("spreadsheet", Some(file_name)) => {
                spreadsheet = Some(Spreadsheet { file_name, bytes })
            }
            ("photos", Some(file_name)) => photos.insert(file_name, bytes),
            ("district", _) => selection.districts.push(field_text(&name, bytes)?),
            ("usage", _) => selection.usages.push(field_text(&name, bytes)?),
            (name, _) => debug!(name, "Ignoring form field"),
        }
    }
    let Some(spreadsheet) = spreadsheet else {
        return Err(Error::InvalidInput("Spreadsheet file is required".into()));
    };
    Ok(Input {
        spreadsheet,
        photos,
        selection,
    })
}

fn field_text(name: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map(|it| it.trim().to_string())
        .map_err(|_| Error::InvalidInput(format!("Field {name} is not valid UTF-8")))
}
