//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::distribute_profit_sharing;
use crate::error::{EngineError, EngineResult};
use crate::models::ScheduleMode;
use crate::processing::{
    PAYSLIP_SHEET, PROFIT_SHARING_SHEET, WORK_HOURS_FILE_NAME, WORK_HOURS_SHEET,
    WorkHoursColumns, build_payslips, essalud_file_name, process_essalud, process_work_hours,
    read_profit_sharing_employees,
};
use crate::render::{PasswordSource, protect_batch, render_certificate, render_payslip};
use crate::spreadsheet::{CellValue, read_table, write_workbook};

use super::request::{EXCEL_EXTENSIONS, PDF_EXTENSIONS, UploadForm, extension_allowed};
use super::response::{
    ApiError, ApiErrorResponse, CertificateBatchResponse, CertificateListing, HealthResponse,
    PDF_CONTENT_TYPE, PayslipBatchResponse, PayslipListing, ProtectionBatchResponse,
    ProtectionListing, XLSX_CONTENT_TYPE, attachment_response, document_url, json_response,
};
use super::state::AppState;

const FILE_FIELD: &str = "archivo";
const PROTECTOR_FILES_FIELD: &str = "archivos";
const SHEET_FIELD: &str = "nombre_hoja";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.config().config().limits.max_upload_bytes;
    Router::new()
        .route("/health", get(health_handler))
        .route("/work-hours", post(work_hours_handler))
        .route("/essalud", post(essalud_handler))
        .route("/payslips", post(payslips_handler))
        .route("/profit-sharing", post(profit_sharing_handler))
        .route("/pdf-protector", post(pdf_protector_handler))
        .route("/documents/:id/:name", get(document_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Logs a failed request and turns it into its JSON error response.
fn failure(correlation_id: Uuid, error: ApiErrorResponse) -> Response {
    warn!(
        correlation_id = %correlation_id,
        status = error.status.as_u16(),
        code = %error.error.code,
        error = %error.error.message,
        "Request failed"
    );
    error.into_response()
}

/// Reads the whole multipart form, rejecting requests that are not multipart.
async fn read_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadForm, ApiErrorResponse> {
    let multipart = multipart.map_err(|rejection| ApiErrorResponse {
        status: rejection.status(),
        error: ApiError::new("INVALID_UPLOAD", rejection.body_text()),
    })?;
    Ok(UploadForm::read(multipart).await?)
}

/// Stores the PDFs of one batch, dropping expired documents first.
fn store_documents(state: &AppState, documents: Vec<(String, Vec<u8>)>) -> EngineResult<Vec<Uuid>> {
    let purged = state.store().purge_expired();
    if purged > 0 {
        debug!(purged, "Purged expired documents");
    }
    state.store().insert_batch(documents)
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Response {
    json_response(
        StatusCode::OK,
        &HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            store: state.store().stats(),
        },
    )
}

/// Handler for POST /work-hours.
///
/// Accepts a time-record workbook and returns it with the computed hour columns.
async fn work_hours_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing work hours upload");

    perform_work_hours(&state, multipart, correlation_id)
        .await
        .unwrap_or_else(|err| failure(correlation_id, err))
}

async fn perform_work_hours(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    correlation_id: Uuid,
) -> Result<Response, ApiErrorResponse> {
    let form = read_form(multipart).await?;
    let file = form.require_file(FILE_FIELD, &EXCEL_EXTENSIONS)?;

    let defaults = WorkHoursColumns::default();
    let column = |field: &str, default: String| {
        form.text(field).map(str::to_string).unwrap_or(default)
    };
    let columns = WorkHoursColumns {
        start: column("columna_inicio", defaults.start),
        end: column("columna_fin", defaults.end),
        break_start: column("columna_refrigerio_inicio", defaults.break_start),
        break_end: column("columna_refrigerio_fin", defaults.break_end),
    };
    let mode = if form.flag("usar_horarios_flexibles") {
        ScheduleMode::Flexible
    } else {
        ScheduleMode::Standard
    };

    let start_time = Instant::now();
    let sheet = form.text(SHEET_FIELD).unwrap_or(WORK_HOURS_SHEET);
    let table = read_table(&file.bytes, Some(sheet))?;
    let report = process_work_hours(&table, &columns, mode, state.config().work_hours())?;
    let bytes = write_workbook(std::slice::from_ref(&report.sheet))?;

    info!(
        correlation_id = %correlation_id,
        file = %file.file_name,
        mode = ?mode,
        rows_processed = report.rows_processed,
        rows_skipped = report.rows_skipped,
        duration_us = start_time.elapsed().as_micros(),
        "Work hours calculated"
    );
    Ok(attachment_response(bytes, WORK_HOURS_FILE_NAME, XLSX_CONTENT_TYPE))
}

/// Handler for POST /essalud.
///
/// Accepts a contribution workbook and returns the results and summary sheets.
async fn essalud_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing ESSALUD upload");

    perform_essalud(&state, multipart, correlation_id)
        .await
        .unwrap_or_else(|err| failure(correlation_id, err))
}

async fn perform_essalud(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    correlation_id: Uuid,
) -> Result<Response, ApiErrorResponse> {
    let form = read_form(multipart).await?;
    let file = form.require_file(FILE_FIELD, &EXCEL_EXTENSIONS)?;

    let start_time = Instant::now();
    let table = read_table(&file.bytes, form.text(SHEET_FIELD))?;
    let report = process_essalud(&table, state.config().essalud())?;
    let bytes = write_workbook(&report.sheets)?;

    info!(
        correlation_id = %correlation_id,
        file = %file.file_name,
        rows = report.summary.rows,
        total_final_amount = %report.summary.total_final_amount,
        employees_with_subsidy = report.summary.employees_with_subsidy,
        duration_us = start_time.elapsed().as_micros(),
        "ESSALUD contributions calculated"
    );
    let file_name = essalud_file_name(Local::now().naive_local());
    Ok(attachment_response(bytes, &file_name, XLSX_CONTENT_TYPE))
}

/// Handler for POST /payslips.
///
/// Renders one payslip PDF per payable row and lists the stored documents.
async fn payslips_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payslip upload");

    perform_payslips(&state, multipart, correlation_id)
        .await
        .unwrap_or_else(|err| failure(correlation_id, err))
}

async fn perform_payslips(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    correlation_id: Uuid,
) -> Result<Response, ApiErrorResponse> {
    let form = read_form(multipart).await?;
    let file = form.require_file(FILE_FIELD, &EXCEL_EXTENSIONS)?;

    let start_time = Instant::now();
    let sheet = form.text(SHEET_FIELD).unwrap_or(PAYSLIP_SHEET);
    let table = read_table(&file.bytes, Some(sheet))?;
    let payslips = build_payslips(&table, state.config())?;
    state.store().ensure_fits(payslips.len())?;

    let company = state.config().company();
    let mut documents = Vec::with_capacity(payslips.len());
    for payslip in &payslips {
        documents.push((payslip.file_name(), render_payslip(payslip, company)?));
    }
    let ids = store_documents(state, documents)?;

    let mut boletas = Vec::with_capacity(payslips.len());
    for (payslip, id) in payslips.into_iter().zip(ids) {
        let file_name = payslip.file_name();
        boletas.push(PayslipListing {
            nombre: payslip.employee.name,
            dni: payslip.employee.dni,
            periodo: payslip.employee.period.to_string(),
            neto_pagar: payslip.totals.net_pay,
            neto_pagar_letras: payslip.net_pay_words,
            id,
            url: document_url(id, &file_name),
            nombre_archivo: file_name,
        });
    }

    info!(
        correlation_id = %correlation_id,
        file = %file.file_name,
        payslips = boletas.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Payslips generated"
    );
    Ok(json_response(
        StatusCode::OK,
        &PayslipBatchResponse {
            total: boletas.len(),
            boletas,
        },
    ))
}

/// Handler for POST /profit-sharing.
///
/// Distributes the profit pool and renders one certificate per worker.
async fn profit_sharing_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing profit-sharing upload");

    perform_profit_sharing(&state, multipart, correlation_id)
        .await
        .unwrap_or_else(|err| failure(correlation_id, err))
}

fn parse_profit_amount(form: &UploadForm) -> Result<Decimal, ApiErrorResponse> {
    const FIELD: &str = "monto_utilidades";
    let text = form.text(FIELD).ok_or_else(|| {
        ApiErrorResponse::bad_request(ApiError::invalid_field(
            FIELD,
            "The amount to distribute is required",
        ))
    })?;
    match CellValue::Text(text.to_string()).as_decimal() {
        Ok(Some(amount)) if amount > Decimal::ZERO => Ok(amount),
        _ => Err(ApiErrorResponse::bad_request(ApiError::invalid_field(
            FIELD,
            format!("'{}' is not a positive amount", text),
        ))),
    }
}

fn parse_fiscal_year(form: &UploadForm) -> Result<i32, ApiErrorResponse> {
    const FIELD: &str = "ejercicio";
    match form.text(FIELD) {
        None => Ok(Local::now().year() - 1),
        Some(text) => text
            .parse::<i32>()
            .ok()
            .filter(|year| (1900..=9999).contains(year))
            .ok_or_else(|| {
                ApiErrorResponse::bad_request(ApiError::invalid_field(
                    FIELD,
                    format!("'{}' is not a year", text),
                ))
            }),
    }
}

async fn perform_profit_sharing(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    correlation_id: Uuid,
) -> Result<Response, ApiErrorResponse> {
    let form = read_form(multipart).await?;
    let file = form.require_file(FILE_FIELD, &EXCEL_EXTENSIONS)?;
    let amount = parse_profit_amount(&form)?;
    let fiscal_year = parse_fiscal_year(&form)?;

    let start_time = Instant::now();
    let sheet = form.text(SHEET_FIELD).unwrap_or(PROFIT_SHARING_SHEET);
    let table = read_table(&file.bytes, Some(sheet))?;
    let employees = read_profit_sharing_employees(&table)?;
    let (pool, shares) = distribute_profit_sharing(employees, amount, fiscal_year)?;

    let company = state.config().company();
    let issued_on = Local::now().date_naive();
    state.store().ensure_fits(shares.len())?;
    let mut documents = Vec::with_capacity(shares.len());
    for share in &shares {
        documents.push((
            share.file_name(),
            render_certificate(share, &pool, company, issued_on)?,
        ));
    }
    let ids = store_documents(state, documents)?;

    let mut certificados = Vec::with_capacity(shares.len());
    for (share, id) in shares.into_iter().zip(ids) {
        let file_name = share.file_name();
        certificados.push(CertificateListing {
            nombre: share.employee.name,
            dni: share.employee.dni,
            por_dias: share.by_days,
            por_remuneracion: share.by_remuneration,
            total: share.total,
            neto_pagar: share.net,
            neto_pagar_letras: share.net_words,
            id,
            url: document_url(id, &file_name),
            nombre_archivo: file_name,
        });
    }

    info!(
        correlation_id = %correlation_id,
        file = %file.file_name,
        fiscal_year,
        amount = %amount,
        certificates = certificados.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Profit-sharing certificates generated"
    );
    Ok(json_response(
        StatusCode::OK,
        &CertificateBatchResponse {
            ejercicio: pool.fiscal_year,
            monto_utilidades: pool.amount,
            total_dias: pool.total_days,
            total_remuneraciones: pool.total_remuneration,
            certificados,
        },
    ))
}

/// Handler for POST /pdf-protector.
///
/// Password-protects every uploaded PDF independently and lists the outcomes.
async fn pdf_protector_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing PDF protection batch");

    perform_pdf_protection(&state, multipart, correlation_id)
        .await
        .unwrap_or_else(|err| failure(correlation_id, err))
}

async fn perform_pdf_protection(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    correlation_id: Uuid,
) -> Result<Response, ApiErrorResponse> {
    let form = read_form(multipart).await?;
    let uploads = form.files(PROTECTOR_FILES_FIELD);
    if uploads.is_empty() {
        return Err(ApiErrorResponse::bad_request(ApiError::no_file(
            PROTECTOR_FILES_FIELD,
        )));
    }

    let mut advertencias = Vec::new();
    let mut files = Vec::with_capacity(uploads.len());
    for upload in &uploads {
        if extension_allowed(&upload.file_name, &PDF_EXTENSIONS) {
            files.push((upload.file_name.clone(), upload.bytes.clone()));
        } else {
            warn!(
                correlation_id = %correlation_id,
                file = %upload.file_name,
                "Skipping upload that is not a PDF"
            );
            advertencias.push(format!("{}: only PDF files are accepted", upload.file_name));
        }
    }
    if files.is_empty() {
        return Err(ApiErrorResponse::bad_request(ApiError::invalid_file_type(
            &uploads[0].file_name,
            &PDF_EXTENSIONS,
        )));
    }

    let source = if form.flag("usar_nombre_archivo") {
        PasswordSource::FileName
    } else {
        match form.text("contraseña").or_else(|| form.text("contrasena")) {
            Some(password) => PasswordSource::Manual(password.to_string()),
            None => {
                return Err(ApiErrorResponse::bad_request(ApiError::invalid_field(
                    "contraseña",
                    "A password is required unless it is taken from the file names",
                )));
            }
        }
    };

    state.store().ensure_fits(files.len())?;
    let start_time = Instant::now();
    let outcomes = protect_batch(&files, &source, state.config().pdf_owner_password());

    let mut documents = Vec::with_capacity(outcomes.len());
    let mut results = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome.result {
            Ok(protected) => {
                documents.push((outcome.file_name.clone(), protected.bytes));
                results.push((outcome.file_name, Ok(protected.password)));
            }
            Err(message) => {
                warn!(
                    correlation_id = %correlation_id,
                    file = %outcome.file_name,
                    error = %message,
                    "PDF could not be protected"
                );
                results.push((outcome.file_name, Err(message)));
            }
        }
    }
    let mut ids = store_documents(state, documents)?.into_iter();

    let mut resultados = Vec::with_capacity(results.len());
    for (archivo, result) in results {
        let listing = match result {
            Ok(password) => {
                let id = ids.next();
                ProtectionListing {
                    url: id.map(|id| document_url(id, &archivo)),
                    archivo,
                    exito: true,
                    contrasena: Some(password),
                    id,
                    mensaje: None,
                }
            }
            Err(message) => ProtectionListing {
                archivo,
                exito: false,
                contrasena: None,
                id: None,
                url: None,
                mensaje: Some(message),
            },
        };
        resultados.push(listing);
    }

    let protegidos = resultados.iter().filter(|r| r.exito).count();
    let fallidos = resultados.len() - protegidos;
    info!(
        correlation_id = %correlation_id,
        protected = protegidos,
        failed = fallidos,
        skipped = advertencias.len(),
        duration_us = start_time.elapsed().as_micros(),
        "PDF protection batch finished"
    );

    let status = if protegidos == 0 {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::OK
    };
    Ok(json_response(
        status,
        &ProtectionBatchResponse {
            protegidos,
            fallidos,
            resultados,
            advertencias,
        },
    ))
}

/// The download name for a stored document that has none.
fn fallback_name(name: &str) -> String {
    if name.to_lowercase().ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{}.pdf", name)
    }
}

/// Handler for GET /documents/:id/:name.
async fn document_handler(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let document = Uuid::parse_str(&id)
        .map_err(|_| EngineError::DocumentNotFound { id: id.clone() })
        .and_then(|uuid| state.store().get(&uuid));

    match document {
        Ok(document) => {
            info!(
                correlation_id = %correlation_id,
                document_id = %id,
                bytes = document.bytes.len(),
                "Serving stored document"
            );
            let file_name = if document.file_name.is_empty() {
                fallback_name(&name)
            } else {
                document.file_name.clone()
            };
            attachment_response(document.bytes.clone(), &file_name, PDF_CONTENT_TYPE)
        }
        Err(err) => failure(correlation_id, err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use tower::ServiceExt;

    const BOUNDARY: &str = "planilla-test-boundary";

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/planilla.yaml").expect("Failed to load config");
        AppState::new(config)
    }

    fn multipart_request(uri: &str, fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, name, value
                )
                .as_bytes(),
            );
        }
        for (name, file_name, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    BOUNDARY, name, file_name
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_fallback_name() {
        assert_eq!(fallback_name("boleta"), "boleta.pdf");
        assert_eq!(fallback_name("boleta.PDF"), "boleta.PDF");
    }

    #[tokio::test]
    async fn test_health_returns_ok() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["store"]["capacity"], 512);
    }

    #[tokio::test]
    async fn test_missing_file_returns_no_file() {
        let router = create_router(create_test_state());
        let request = multipart_request("/essalud", &[("nombre_hoja", "Hoja1")], &[]);

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["code"], "NO_FILE");
    }

    #[tokio::test]
    async fn test_wrong_extension_returns_invalid_file_type() {
        let router = create_router(create_test_state());
        let request = multipart_request("/work-hours", &[], &[("archivo", "horas.csv", b"a,b")]);

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["code"], "INVALID_FILE_TYPE");
    }

    #[tokio::test]
    async fn test_non_multipart_request_is_rejected() {
        let router = create_router(create_test_state());
        let request = Request::builder()
            .method("POST")
            .uri("/payslips")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();

        assert!(response.status().is_client_error());
        let json = json_body(response).await;
        assert_eq!(json["code"], "INVALID_UPLOAD");
    }

    #[tokio::test]
    async fn test_unreadable_workbook_returns_invalid_spreadsheet() {
        let router = create_router(create_test_state());
        let request = multipart_request(
            "/essalud",
            &[],
            &[("archivo", "planilla.xlsx", b"not a workbook")],
        );

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["code"], "INVALID_SPREADSHEET");
    }

    #[tokio::test]
    async fn test_profit_sharing_requires_amount() {
        let router = create_router(create_test_state());
        let request = multipart_request(
            "/profit-sharing",
            &[("monto_utilidades", "-5")],
            &[("archivo", "utilidades.xlsx", b"x")],
        );

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["code"], "INVALID_FIELD");
    }

    #[tokio::test]
    async fn test_protector_requires_password_without_file_name_mode() {
        let router = create_router(create_test_state());
        let request = multipart_request(
            "/pdf-protector",
            &[],
            &[("archivos", "a.pdf", b"%PDF-1.5")],
        );

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["code"], "INVALID_FIELD");
    }

    #[tokio::test]
    async fn test_protector_rejects_batch_without_pdfs() {
        let router = create_router(create_test_state());
        let request = multipart_request(
            "/pdf-protector",
            &[("contraseña", "12345678")],
            &[("archivos", "a.docx", b"x"), ("archivos", "b.txt", b"y")],
        );

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["code"], "INVALID_FILE_TYPE");
    }

    #[tokio::test]
    async fn test_unknown_document_returns_404() {
        let router = create_router(create_test_state());
        let uri = format!("/documents/{}/boleta.pdf", Uuid::new_v4());
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json_body(response).await;
        assert_eq!(json["code"], "DOCUMENT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_document_id_returns_404() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/documents/not-a-uuid/boleta.pdf")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stored_document_is_downloadable() {
        let state = create_test_state();
        let id = state.store().insert("BOLETA_1_03_2024.pdf", b"%PDF-1.5 test".to_vec());
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri(format!("/documents/{}/x", id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            PDF_CONTENT_TYPE
        );
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("BOLETA_1_03_2024.pdf"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"%PDF-1.5 test");
    }
}
