use actix_web::{post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use super::auth::authenticate;
use super::AppState;
use crate::domain::error::{AppError, Result};
use crate::domain::import::{CandidateRecord, ColumnMapping};
use crate::infrastructure::import::{
    build_candidates, decode_text, guess_column_mapping, looks_like_header_row, tokenize,
};

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

/// What the preview screen needs to render the mapping step: the detected
/// (or synthesized) headers, the guessed mapping and the candidate rows it
/// produces.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub headers: Vec<String>,
    pub has_headers: bool,
    pub mapping: ColumnMapping,
    pub candidates: Vec<CandidateRecord>,
    pub row_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct BatchImportRequest {
    pub clients: Vec<CandidateRecord>,
}

/// Pasted spreadsheet data.
#[post("/clients/import/parse")]
pub async fn parse_paste(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ParseRequest>,
) -> Result<HttpResponse> {
    authenticate(&data, &req).await?;
    Ok(HttpResponse::Ok().json(build_preview(&body.text)?))
}

/// Uploaded file contents, decoded before parsing.
#[post("/clients/import/parse-file")]
pub async fn parse_file(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    authenticate(&data, &req).await?;
    let text = decode_text(&body);
    Ok(HttpResponse::Ok().json(build_preview(&text)?))
}

#[post("/clients/batch-import")]
pub async fn batch_import(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<BatchImportRequest>,
) -> Result<HttpResponse> {
    let agent = authenticate(&data, &req).await?;
    let report = data.batch_import.execute(&agent.id, &body.clients).await?;
    Ok(HttpResponse::Ok().json(report))
}

fn build_preview(text: &str) -> Result<ImportPreview> {
    let grid = tokenize(text);
    if grid.is_empty() {
        return Err(AppError::ValidationError("No data found".to_string()));
    }

    let first_row = &grid[0];
    let has_headers = looks_like_header_row(first_row);
    let headers: Vec<String> = if has_headers {
        first_row.clone()
    } else {
        // Placeholder labels also drive the purely positional mapping guess.
        (1..=first_row.len())
            .map(|index| format!("Column {index}"))
            .collect()
    };
    let mapping = guess_column_mapping(&headers);
    let candidates = build_candidates(&grid, has_headers, &mapping);

    Ok(ImportPreview {
        headers,
        has_headers,
        mapping,
        candidates,
        row_count: grid.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_with_headers() {
        let preview =
            build_preview("First Name,Last Name,Email\nJohn,Doe,john@x.com").unwrap();
        assert!(preview.has_headers);
        assert_eq!(preview.headers, ["First Name", "Last Name", "Email"]);
        assert_eq!(preview.mapping.first_name, Some(0));
        assert_eq!(preview.mapping.email, Some(2));
        assert_eq!(preview.candidates.len(), 1);
        assert_eq!(preview.row_count, 2);
    }

    #[test]
    fn test_preview_without_headers_synthesizes_labels() {
        let preview = build_preview("John\tDoe\tjohn@x.com").unwrap();
        assert!(!preview.has_headers);
        assert_eq!(preview.headers, ["Column 1", "Column 2", "Column 3"]);
        assert_eq!(preview.mapping.first_name, Some(0));
        assert_eq!(preview.mapping.last_name, Some(1));
        assert_eq!(preview.mapping.email, Some(2));
        assert_eq!(preview.mapping.phone_number, None);
        assert_eq!(preview.candidates.len(), 1);
    }

    #[test]
    fn test_empty_input_is_an_input_error() {
        let err = build_preview("\n \n").unwrap_err();
        assert_eq!(err.to_string(), "No data found");
    }
}
