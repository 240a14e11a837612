//! Integration tests for the payroll API.
//!
//! Every workflow is driven end to end through the router: a workbook is
//! built in memory, uploaded as multipart form data, and the returned
//! workbook, JSON listing or stored PDF is checked. Scenarios covered:
//! - ESSALUD contributions (every rule branch) and the summary sheet
//! - Work hours in standard and flexible mode
//! - Payslips with ONP and AFP deductions, and their downloads
//! - Profit-sharing certificates
//! - PDF protection batches
//! - Batches larger than the document store
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tower::ServiceExt;

use planilla_engine::api::{AppState, create_router};
use planilla_engine::config::ConfigLoader;
use planilla_engine::render::Canvas;
use planilla_engine::spreadsheet::{CellValue, SheetData, Table, read_table, write_workbook};

// =============================================================================
// Test Helpers
// =============================================================================

const BOUNDARY: &str = "planilla-integration-boundary";

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/planilla.yaml").expect("Failed to load config")
}

fn create_router_for_test() -> Router {
    create_router(AppState::new(load_config()))
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn json_decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => decimal(s),
        other => decimal(&other.to_string()),
    }
}

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn workbook(sheet: &str, headers: &[&str], rows: Vec<Vec<CellValue>>) -> Vec<u8> {
    write_workbook(&[SheetData {
        name: sheet.to_string(),
        headers: headers.iter().map(|h| h.to_string()).collect(),
        rows,
    }])
    .unwrap()
}

struct Upload<'a> {
    fields: Vec<(&'a str, &'a str)>,
    files: Vec<(&'a str, &'a str, Vec<u8>)>,
}

impl<'a> Upload<'a> {
    fn new() -> Self {
        Self {
            fields: Vec::new(),
            files: Vec::new(),
        }
    }

    fn field(mut self, name: &'a str, value: &'a str) -> Self {
        self.fields.push((name, value));
        self
    }

    fn file(mut self, name: &'a str, file_name: &'a str, bytes: Vec<u8>) -> Self {
        self.files.push((name, file_name, bytes));
        self
    }

    fn into_body(self) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in &self.fields {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                    BOUNDARY, name, value
                )
                .as_bytes(),
            );
        }
        for (name, file_name, bytes) in &self.files {
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
        body
    }
}

async fn post_upload(router: Router, uri: &str, upload: Upload<'_>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(upload.into_body()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

async fn get(router: Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

fn number(table: &Table, row: usize, column: &str) -> f64 {
    let col = table
        .column_index(column)
        .unwrap_or_else(|| panic!("missing column {}", column));
    match table.cell(row, col) {
        CellValue::Number(n) => *n,
        other => panic!("expected a number in {} row {}, got {:?}", column, row, other),
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.005,
        "expected {}, got {}",
        expected,
        actual
    );
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (status, _, body) = get(create_router_for_test(), "/health").await;
    assert_eq!(status, StatusCode::OK);

    let body = json(&body);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"]["documents"], 0);
}

// =============================================================================
// ESSALUD
// =============================================================================

const ESSALUD_HEADERS: [&str; 7] = [
    "Nombre",
    "fecha_ingreso",
    "fecha_cese",
    "Importe Bruto",
    "Días Subsidio",
    "Dias_Mes",
    "Importe ESSALUD EJB",
];

fn essalud_row(
    name: &str,
    cese: &str,
    gross: f64,
    subsidy: f64,
    days: f64,
    ejb: f64,
) -> Vec<CellValue> {
    vec![
        text(name),
        text("01/02/2020"),
        if cese.is_empty() {
            CellValue::Empty
        } else {
            text(cese)
        },
        CellValue::Number(gross),
        CellValue::Number(subsidy),
        CellValue::Number(days),
        CellValue::Number(ejb),
    ]
}

#[tokio::test]
async fn test_essalud_applies_every_rule() {
    let bytes = workbook(
        "Planilla",
        &ESSALUD_HEADERS,
        vec![
            // ordinary remuneration, above the EJB amount
            essalud_row("ANA", "", 2000.0, 0.0, 30.0, 150.0),
            // below the minimum remuneration
            essalud_row("LUIS", "", 1000.0, 0.0, 30.0, 0.0),
            // subsidy days
            essalud_row("EVA", "", 1500.0, 10.0, 30.0, 50.0),
            // terminated
            essalud_row("JOSE", "15/03/2024", 800.0, 0.0, 15.0, 0.0),
        ],
    );

    let (status, headers, body) = post_upload(
        create_router_for_test(),
        "/essalud",
        Upload::new().file("archivo", "planilla.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("essalud_procesado_"));

    let results = read_table(&body, Some("Resultados ESSALUD")).unwrap();
    assert_eq!(results.rows.len(), 4);
    // original columns come first, computed columns are appended
    assert_eq!(&results.headers[..7], &ESSALUD_HEADERS.map(String::from)[..]);
    assert_eq!(
        &results.headers[7..],
        &[
            "DIAS PLAME".to_string(),
            "Importe_Calculado".to_string(),
            "CALCULO DIAS PLAME".to_string(),
            "IMPORTE ESSALUD FINAL".to_string(),
        ]
    );

    assert_close(number(&results, 0, "Importe_Calculado"), 180.0);
    assert_close(number(&results, 0, "IMPORTE ESSALUD FINAL"), 180.0);

    assert_close(number(&results, 1, "Importe_Calculado"), 101.7);
    assert_close(number(&results, 1, "IMPORTE ESSALUD FINAL"), 101.7);

    assert_close(number(&results, 2, "DIAS PLAME"), 20.0);
    assert_close(number(&results, 2, "Importe_Calculado"), 0.0);
    assert_close(number(&results, 2, "CALCULO DIAS PLAME"), 67.8);
    assert_close(number(&results, 2, "IMPORTE ESSALUD FINAL"), 67.8);

    assert_close(number(&results, 3, "Importe_Calculado"), 72.0);
    assert_close(number(&results, 3, "IMPORTE ESSALUD FINAL"), 72.0);

    let summary = read_table(&body, Some("Resumen")).unwrap();
    assert_eq!(summary.headers, vec!["Métrica".to_string(), "Valor".to_string()]);
    assert_close(number(&summary, 1, "Valor"), 421.5);
    assert_close(number(&summary, 2, "Valor"), 1.0);
    assert_close(number(&summary, 3, "Valor"), 1.0);
}

#[tokio::test]
async fn test_essalud_final_amount_is_never_below_its_inputs() {
    let rows = vec![
        essalud_row("A", "", 3000.0, 5.0, 31.0, 400.0),
        essalud_row("B", "", 0.0, 0.0, 30.0, 12.5),
        essalud_row("C", "01/01/2024", 5000.0, 3.0, 30.0, 100.0),
    ];
    let bytes = workbook("Hoja1", &ESSALUD_HEADERS, rows);

    let (status, _, body) = post_upload(
        create_router_for_test(),
        "/essalud",
        Upload::new().file("archivo", "planilla.xlsx", bytes),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let results = read_table(&body, Some("Resultados ESSALUD")).unwrap();
    for row in 0..results.rows.len() {
        let final_amount = number(&results, row, "IMPORTE ESSALUD FINAL");
        assert!(final_amount + 1e-9 >= number(&results, row, "Importe_Calculado"));
        assert!(final_amount + 1e-9 >= number(&results, row, "CALCULO DIAS PLAME"));
        assert!(final_amount + 1e-9 >= number(&results, row, "Importe ESSALUD EJB"));
    }
}

#[tokio::test]
async fn test_essalud_reports_all_missing_columns() {
    let bytes = workbook(
        "Hoja1",
        &["fecha_ingreso", "Importe Bruto", "Días Subsidio", "Importe ESSALUD EJB"],
        vec![vec![
            text("01/01/2020"),
            CellValue::Number(1500.0),
            CellValue::Number(0.0),
            CellValue::Number(0.0),
        ]],
    );

    let (status, _, body) = post_upload(
        create_router_for_test(),
        "/essalud",
        Upload::new().file("archivo", "planilla.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json(&body);
    assert_eq!(body["code"], "MISSING_COLUMNS");
    assert_eq!(body["details"], "fecha_cese, Dias_Mes");
}

#[tokio::test]
async fn test_essalud_zero_month_days_with_subsidy_names_the_row() {
    let bytes = workbook(
        "Hoja1",
        &ESSALUD_HEADERS,
        vec![
            essalud_row("ANA", "", 2000.0, 0.0, 30.0, 0.0),
            essalud_row("EVA", "", 1500.0, 10.0, 0.0, 0.0),
        ],
    );

    let (status, _, body) = post_upload(
        create_router_for_test(),
        "/essalud",
        Upload::new().file("archivo", "planilla.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json(&body);
    assert_eq!(body["code"], "INVALID_CELL");
    assert_eq!(body["details"], "Row 3, column 'Dias_Mes'");
}

#[tokio::test]
async fn test_essalud_unknown_sheet() {
    let bytes = workbook("Hoja1", &ESSALUD_HEADERS, vec![essalud_row("ANA", "", 2000.0, 0.0, 30.0, 0.0)]);

    let (status, _, body) = post_upload(
        create_router_for_test(),
        "/essalud",
        Upload::new()
            .field("nombre_hoja", "Datos")
            .file("archivo", "planilla.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["code"], "SHEET_NOT_FOUND");
}

// =============================================================================
// Work hours
// =============================================================================

const HOURS_HEADERS: [&str; 5] = [
    "Nombre",
    "Hora Inicio",
    "Hora Fin",
    "Hora Refrigerio Inicio",
    "Hora Refrigerio Fin",
];

fn hours_row(name: &str, times: [&str; 4]) -> Vec<CellValue> {
    let mut row = vec![text(name)];
    row.extend(times.iter().map(|t| {
        if t.is_empty() {
            CellValue::Empty
        } else {
            text(t)
        }
    }));
    row
}

#[tokio::test]
async fn test_work_hours_standard_mode() {
    let bytes = workbook(
        "Horas",
        &HOURS_HEADERS,
        vec![
            hours_row("ANA", ["08:00", "19:00", "13:00", "14:00"]),
            hours_row("LUIS", ["07:00", "20:00", "12:00", "13:00"]),
            hours_row("VACACIONES", ["", "", "", ""]),
        ],
    );

    let (status, headers, body) = post_upload(
        create_router_for_test(),
        "/work-hours",
        Upload::new().file("archivo", "horas.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("reporte_horas_calculadas.xlsx"));

    let report = read_table(&body, Some("Reporte")).unwrap();
    assert_eq!(report.rows.len(), 3);
    assert!(report.column_index("Horas Nocturnas").is_none());

    assert_close(number(&report, 0, "Minutos Refrigerio"), 60.0);
    assert_close(number(&report, 0, "Horas Trabajadas"), 10.0);
    assert_close(number(&report, 0, "Horas Ordinarias"), 8.0);
    assert_close(number(&report, 0, "Horas Extra 25%"), 2.0);
    assert_close(number(&report, 0, "Horas Extra 35%"), 0.0);

    assert_close(number(&report, 1, "Horas Trabajadas"), 12.0);
    assert_close(number(&report, 1, "Horas Extra 25%"), 2.0);
    assert_close(number(&report, 1, "Horas Extra 35%"), 2.0);

    // rows without times are copied through untouched
    let worked = report.column_index("Horas Trabajadas").unwrap();
    assert!(report.cell(2, worked).is_blank());
    assert_eq!(report.text(2, 0), "VACACIONES");
}

#[tokio::test]
async fn test_work_hours_flexible_mode_with_custom_columns() {
    let bytes = workbook(
        "Turnos",
        &["Nombre", "Entrada", "Salida"],
        vec![vec![text("NOCHE"), text("22:00"), text("06:00")]],
    );

    let (status, _, body) = post_upload(
        create_router_for_test(),
        "/work-hours",
        Upload::new()
            .field("nombre_hoja", "Turnos")
            .field("columna_inicio", "Entrada")
            .field("columna_fin", "Salida")
            .field("usar_horarios_flexibles", "on")
            .file("archivo", "turnos.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let report = read_table(&body, Some("Reporte")).unwrap();
    assert_close(number(&report, 0, "Horas Trabajadas"), 8.0);
    assert_close(number(&report, 0, "Horas Nocturnas"), 8.0);
    assert_close(number(&report, 0, "Minutos Refrigerio"), 0.0);
}

#[tokio::test]
async fn test_work_hours_standard_mode_rejects_end_before_start() {
    let bytes = workbook(
        "Horas",
        &HOURS_HEADERS,
        vec![hours_row("ANA", ["18:00", "08:00", "12:00", "13:00"])],
    );

    let (status, _, body) = post_upload(
        create_router_for_test(),
        "/work-hours",
        Upload::new().file("archivo", "horas.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["code"], "INVALID_CELL");
}

// =============================================================================
// Payslips
// =============================================================================

const PAYSLIP_HEADERS: [&str; 8] = [
    "DNI",
    "Nombre",
    "Cargo",
    "Periodo",
    "Fecha Ingreso",
    "Sueldo Basico",
    "Sistema Pension",
    "Asignacion Familiar",
];

fn payslip_row(dni: &str, name: &str, salary: f64, system: &str, family: f64) -> Vec<CellValue> {
    vec![
        text(dni),
        text(name),
        text("ASISTENTE"),
        text("03/2024"),
        text("15/01/2022"),
        CellValue::Number(salary),
        text(system),
        CellValue::Number(family),
    ]
}

#[tokio::test]
async fn test_payslips_are_listed_and_downloadable() {
    let router = create_router_for_test();
    let bytes = workbook(
        "Empleados",
        &PAYSLIP_HEADERS,
        vec![
            payslip_row("45678912", "MARIA LOPEZ", 1500.0, "ONP", 0.0),
            payslip_row("87654321", "JUAN PEREZ", 2000.0, "AFP Integra", 0.0),
        ],
    );

    let (status, _, body) = post_upload(
        router.clone(),
        "/payslips",
        Upload::new().file("archivo", "boletas.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["total"], 2);

    let first = &body["boletas"][0];
    assert_eq!(first["dni"], "45678912");
    assert_eq!(first["periodo"], "03/2024");
    assert_eq!(first["nombre_archivo"], "BOLETA_45678912_03_2024.pdf");
    assert_eq!(json_decimal(&first["neto_pagar"]), decimal("1305"));
    assert_eq!(
        first["neto_pagar_letras"],
        "MIL TRESCIENTOS CINCO CON 00/100 SOLES"
    );

    // AFP Integra at 11.55%
    let second = &body["boletas"][1];
    assert_eq!(json_decimal(&second["neto_pagar"]), decimal("1769"));

    let url = first["url"].as_str().unwrap();
    let (status, headers, pdf) = get(router, url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert!(pdf.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_payslips_unknown_pension_system() {
    let bytes = workbook(
        "Empleados",
        &PAYSLIP_HEADERS,
        vec![payslip_row("45678912", "MARIA LOPEZ", 1500.0, "AFP Futura", 0.0)],
    );

    let (status, _, body) = post_upload(
        create_router_for_test(),
        "/payslips",
        Upload::new().file("archivo", "boletas.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json(&body);
    assert_eq!(body["code"], "INVALID_CELL");
    assert_eq!(body["details"], "Row 2, column 'Sistema Pension'");
}

#[tokio::test]
async fn test_expired_documents_are_not_found() {
    let mut config = load_config().config().clone();
    config.store.ttl_seconds = 0;
    let router = create_router(AppState::new(ConfigLoader::from_config(config).unwrap()));

    let bytes = workbook(
        "Empleados",
        &PAYSLIP_HEADERS,
        vec![payslip_row("45678912", "MARIA LOPEZ", 1500.0, "ONP", 0.0)],
    );
    let (status, _, body) = post_upload(
        router.clone(),
        "/payslips",
        Upload::new().file("archivo", "boletas.xlsx", bytes),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let url = json(&body)["boletas"][0]["url"].as_str().unwrap().to_string();
    let (status, _, body) = get(router, &url).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["code"], "DOCUMENT_NOT_FOUND");
}

// =============================================================================
// Profit sharing
// =============================================================================

#[tokio::test]
async fn test_profit_sharing_certificates() {
    let router = create_router_for_test();
    let bytes = workbook(
        "Empleados",
        &["DNI", "Nombre", "Cargo", "Dias Laborados", "Remuneracion Computable"],
        vec![
            vec![
                text("12345678"),
                text("ANA TORRES"),
                text("CONTADORA"),
                CellValue::Number(360.0),
                CellValue::Number(24000.0),
            ],
            vec![
                text("87654321"),
                text("LUIS RAMOS"),
                CellValue::Empty,
                CellValue::Number(180.0),
                CellValue::Number(12000.0),
            ],
        ],
    );

    let (status, _, body) = post_upload(
        router.clone(),
        "/profit-sharing",
        Upload::new()
            .field("monto_utilidades", "9,000.00")
            .field("ejercicio", "2023")
            .file("archivo", "utilidades.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["ejercicio"], 2023);
    assert_eq!(json_decimal(&body["total_dias"]), decimal("540"));

    let first = &body["certificados"][0];
    assert_eq!(first["nombre_archivo"], "Certificado_Liquidacion_ANA_TORRES.pdf");
    assert_eq!(json_decimal(&first["por_dias"]), decimal("3000"));
    assert_eq!(json_decimal(&first["por_remuneracion"]), decimal("3000"));
    assert_eq!(json_decimal(&first["total"]), decimal("6000"));

    let second = &body["certificados"][1];
    assert_eq!(json_decimal(&second["neto_pagar"]), decimal("3000"));

    let (status, _, pdf) = get(router, first["url"].as_str().unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(pdf.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_profit_sharing_with_zero_days_is_a_calculation_error() {
    let bytes = workbook(
        "Empleados",
        &["DNI", "Nombre", "Dias Laborados", "Remuneracion Computable"],
        vec![vec![
            text("12345678"),
            text("ANA TORRES"),
            CellValue::Number(0.0),
            CellValue::Number(24000.0),
        ]],
    );

    let (status, _, body) = post_upload(
        create_router_for_test(),
        "/profit-sharing",
        Upload::new()
            .field("monto_utilidades", "1000")
            .file("archivo", "utilidades.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json(&body)["code"], "CALCULATION_ERROR");
}

// =============================================================================
// PDF protector
// =============================================================================

fn sample_pdf(text: &str) -> Vec<u8> {
    let mut canvas = Canvas::new();
    canvas.draw_string(50.0, 700.0, text);
    canvas.finish("Documento").unwrap()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[tokio::test]
async fn test_protector_uses_passwords_from_file_names() {
    let router = create_router_for_test();

    let (status, _, body) = post_upload(
        router.clone(),
        "/pdf-protector",
        Upload::new()
            .field("usar_nombre_archivo", "on")
            .file("archivos", "BOLETA_45678912_03_2024.pdf", sample_pdf("boleta"))
            .file("archivos", "sin_dni.pdf", sample_pdf("otro"))
            .file("archivos", "notas.txt", b"texto".to_vec()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["protegidos"], 1);
    assert_eq!(body["fallidos"], 1);
    assert_eq!(body["advertencias"].as_array().unwrap().len(), 1);

    let protected = &body["resultados"][0];
    assert_eq!(protected["exito"], true);
    assert_eq!(protected["contraseña"], "45678912");

    let failed = &body["resultados"][1];
    assert_eq!(failed["exito"], false);
    assert!(failed["mensaje"].is_string());

    let (status, _, pdf) = get(router, protected["url"].as_str().unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(pdf.starts_with(b"%PDF"));
    assert!(contains(&pdf, b"/Encrypt"));
}

#[tokio::test]
async fn test_protector_with_manual_password() {
    let (status, _, body) = post_upload(
        create_router_for_test(),
        "/pdf-protector",
        Upload::new()
            .field("contrasena", "clave123")
            .file("archivos", "informe.pdf", sample_pdf("informe")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["resultados"][0]["contraseña"], "clave123");
}

#[tokio::test]
async fn test_protector_batch_where_every_file_fails() {
    let (status, _, body) = post_upload(
        create_router_for_test(),
        "/pdf-protector",
        Upload::new()
            .field("contrasena", "clave123")
            .file("archivos", "roto.pdf", b"%PDF-1.4 truncated".to_vec()),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(&body);
    assert_eq!(body["protegidos"], 0);
    assert_eq!(body["resultados"][0]["archivo"], "roto.pdf");
}

// =============================================================================
// Error cases
// =============================================================================

#[tokio::test]
async fn test_missing_file_on_every_upload_endpoint() {
    for uri in ["/work-hours", "/essalud", "/payslips", "/profit-sharing", "/pdf-protector"] {
        let (status, _, body) = post_upload(
            create_router_for_test(),
            uri,
            Upload::new().field("nombre_hoja", "Hoja1"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(json(&body)["code"], "NO_FILE", "{}", uri);
    }
}

#[tokio::test]
async fn test_upload_size_is_capped() {
    let mut config = load_config().config().clone();
    config.limits.max_upload_bytes = 256;
    let router = create_router(AppState::new(ConfigLoader::from_config(config).unwrap()));

    let (status, _, body) = post_upload(
        router,
        "/essalud",
        Upload::new().file("archivo", "grande.xlsx", vec![b'x'; 4096]),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json(&body)["code"], "UPLOAD_TOO_LARGE");
}

fn router_with_capacity(capacity: usize) -> Router {
    let mut config = load_config().config().clone();
    config.store.capacity = capacity;
    create_router(AppState::new(ConfigLoader::from_config(config).unwrap()))
}

#[tokio::test]
async fn test_payslip_batch_larger_than_the_store_is_rejected() {
    let router = router_with_capacity(2);
    let bytes = workbook(
        "Empleados",
        &PAYSLIP_HEADERS,
        vec![
            payslip_row("45678912", "MARIA LOPEZ", 1500.0, "ONP", 0.0),
            payslip_row("87654321", "JUAN PEREZ", 2000.0, "AFP Integra", 0.0),
            payslip_row("11223344", "ROSA DIAZ", 1800.0, "ONP", 0.0),
        ],
    );

    let (status, _, body) = post_upload(
        router.clone(),
        "/payslips",
        Upload::new().file("archivo", "boletas.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let body = json(&body);
    assert_eq!(body["code"], "BATCH_TOO_LARGE");
    assert_eq!(body["details"], "Split the upload into batches of at most 2 documents");

    // nothing from the refused batch was stored
    let (_, _, health) = get(router, "/health").await;
    assert_eq!(json(&health)["store"]["documents"], 0);
}

#[tokio::test]
async fn test_batch_filling_the_store_keeps_every_url_alive() {
    let router = router_with_capacity(2);
    let bytes = workbook(
        "Empleados",
        &PAYSLIP_HEADERS,
        vec![
            payslip_row("45678912", "MARIA LOPEZ", 1500.0, "ONP", 0.0),
            payslip_row("87654321", "JUAN PEREZ", 2000.0, "AFP Integra", 0.0),
        ],
    );

    let (status, _, body) = post_upload(
        router.clone(),
        "/payslips",
        Upload::new().file("archivo", "boletas.xlsx", bytes),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for payslip in json(&body)["boletas"].as_array().unwrap() {
        let (status, _, pdf) = get(router.clone(), payslip["url"].as_str().unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(pdf.starts_with(b"%PDF"));
    }
}

#[tokio::test]
async fn test_protector_batch_larger_than_the_store_is_rejected() {
    let (status, _, body) = post_upload(
        router_with_capacity(1),
        "/pdf-protector",
        Upload::new()
            .field("contrasena", "clave123")
            .file("archivos", "uno.pdf", sample_pdf("uno"))
            .file("archivos", "dos.pdf", sample_pdf("dos")),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json(&body)["code"], "BATCH_TOO_LARGE");
}

#[tokio::test]
async fn test_remuneration_beyond_decimal_range_is_an_invalid_cell() {
    let bytes = workbook(
        "Empleados",
        &["DNI", "Nombre", "Dias Laborados", "Remuneracion Computable"],
        vec![vec![
            text("12345678"),
            text("ANA TORRES"),
            CellValue::Number(360.0),
            CellValue::Number(1e30),
        ]],
    );

    let (status, _, body) = post_upload(
        create_router_for_test(),
        "/profit-sharing",
        Upload::new()
            .field("monto_utilidades", "1000")
            .file("archivo", "utilidades.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json(&body);
    assert_eq!(body["code"], "INVALID_CELL");
    assert_eq!(body["details"], "Row 2, column 'Remuneracion Computable'");
}

#[tokio::test]
async fn test_payslip_income_total_out_of_range_is_a_calculation_error() {
    let mut row = payslip_row("45678912", "MARIA LOPEZ", 0.0, "ONP", 0.0);
    row[5] = text("50000000000000000000000000000");
    row[7] = text("50000000000000000000000000000");
    let bytes = workbook("Empleados", &PAYSLIP_HEADERS, vec![row]);

    let (status, _, body) = post_upload(
        create_router_for_test(),
        "/payslips",
        Upload::new().file("archivo", "boletas.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(&body);
    assert_eq!(body["code"], "CALCULATION_ERROR");
    assert!(
        body["details"]
            .as_str()
            .unwrap()
            .contains("row 2: total income is out of range"),
        "{}",
        body["details"]
    );
}

#[tokio::test]
async fn test_numeric_dni_keeps_its_leading_zero() {
    let mut row = payslip_row("", "MARIA LOPEZ", 1500.0, "ONP", 0.0);
    row[0] = CellValue::Number(1234567.0);
    let bytes = workbook("Empleados", &PAYSLIP_HEADERS, vec![row]);

    let (status, _, body) = post_upload(
        create_router_for_test(),
        "/payslips",
        Upload::new().file("archivo", "boletas.xlsx", bytes),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let first = &json(&body)["boletas"][0];
    assert_eq!(first["dni"], "01234567");
    assert_eq!(first["nombre_archivo"], "BOLETA_01234567_03_2024.pdf");
}
