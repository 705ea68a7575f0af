//! REST API types for frontend integration.
//!
//! One upload returns everything the four UI steps need: the raw preview,
//! the pivoted table, the hospitals-only table with its chart, and the name
//! under which the export will be saved.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{ChartError, PipelineError, ServerError};
use crate::export::Download;
use crate::models::PivotTable;
use crate::parser::{Preview, SourceFormat};
use crate::transform::PipelineOutput;

/// Response sent to the frontend after an upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Status: "ready", "warning"
    pub status: String,

    /// RFC 3339 timestamp
    pub processed_at: String,

    /// Name of the uploaded file, when the browser sent one
    pub file_name: Option<String>,

    pub source: SourceFormat,

    /// "Vista previa del archivo original"
    pub preview: Preview,

    pub record_count: usize,
    pub normalized_count: usize,

    /// All facilities
    pub pivot: PivotTable,

    /// Hospitals only
    pub hospitals: PivotTable,

    /// Inline SVG chart of `hospitals`
    pub chart_svg: Option<String>,

    /// Why there is no chart
    pub chart_error: Option<String>,

    /// File name and MIME type of the export
    pub download: Download,
}

impl UploadResponse {
    pub fn new(
        output: PipelineOutput,
        file_name: Option<String>,
        chart: Result<String, ChartError>,
        download: Download,
    ) -> Self {
        let (chart_svg, chart_error) = match chart {
            Ok(svg) => (Some(svg), None),
            Err(e) => (None, Some(e.to_string())),
        };
        let status = if chart_error.is_none() { "ready" } else { "warning" };

        UploadResponse {
            job_id: Uuid::new_v4().to_string(),
            status: status.to_string(),
            processed_at: Utc::now().to_rfc3339(),
            file_name,
            source: output.source,
            preview: output.preview,
            record_count: output.record_count,
            normalized_count: output.normalized_count,
            pivot: output.pivot,
            hospitals: output.hospitals,
            chart_svg,
            chart_error,
            download,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
    })
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // The file was read but its content is unusable
            ServerError::Pipeline(PipelineError::Sheet(_))
            | ServerError::Pipeline(PipelineError::Record(_))
            | ServerError::Pipeline(PipelineError::Chart(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Pipeline(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(error_response(&self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RecordError, SheetError};
    use crate::models::PivotRow;

    fn output() -> PipelineOutput {
        let table = PivotTable {
            index_name: "Establecimiento".into(),
            categories: vec!["SATISFECHO".into()],
            rows: vec![PivotRow { facility: "HN ROOSEVELT".into(), counts: vec![10] }],
        };
        PipelineOutput {
            source: SourceFormat::Workbook { sheet: "Hoja1".into() },
            preview: Preview { headers: vec![], rows: vec![], total_rows: 0 },
            record_count: 1,
            normalized_count: 1,
            pivot: table.clone(),
            hospitals: table,
        }
    }

    fn download() -> Download {
        Download {
            file_name: "Datos_Limpios_Solicitudes.xlsx".into(),
            content_type: crate::export::XLSX_MIME.into(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_ready_response() {
        let response = UploadResponse::new(output(), Some("a.xlsx".into()), Ok("<svg/>".into()), download());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "ready");
        assert_eq!(json["fileName"], "a.xlsx");
        assert_eq!(json["chartSvg"], "<svg/>");
        assert!(json["chartError"].is_null());
        assert_eq!(json["hospitals"]["rows"][0]["facility"], "HN ROOSEVELT");
        assert_eq!(json["download"]["fileName"], "Datos_Limpios_Solicitudes.xlsx");
        // Bytes travel through /api/export only
        assert!(json["download"].get("bytes").is_none());
    }

    #[test]
    fn test_missing_chart_is_warning() {
        let response = UploadResponse::new(output(), None, Err(ChartError::NoData), download());
        assert_eq!(response.status, "warning");
        assert!(response.chart_svg.is_none());
        assert_eq!(response.chart_error.as_deref(), Some("No hospital rows to plot"));
    }

    #[test]
    fn test_error_status_codes() {
        let missing = ServerError::Pipeline(PipelineError::Record(RecordError::MissingColumn {
            column: "Valoraciones".into(),
            available: vec![],
        }));
        assert_eq!(missing.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let unreadable = ServerError::Pipeline(PipelineError::Sheet(SheetError::NoWorksheet));
        assert_eq!(unreadable.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let bad = ServerError::BadRequest("No file provided".into());
        assert_eq!(bad.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_body() {
        let body = error_response("boom");
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "boom");
    }
}
