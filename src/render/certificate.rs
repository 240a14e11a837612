//! Profit-sharing certificate (certificado de utilidades) layout.

use chrono::NaiveDate;

use super::canvas::{Canvas, Font, PAGE_HEIGHT, PAGE_WIDTH};
use super::payslip::money;
use crate::calculation::PROFIT_SHARING_LEGAL_REF;
use crate::config::CompanyConfig;
use crate::error::EngineResult;
use crate::models::{PayrollPeriod, ProfitShare, ProfitSharingPool};

const MARGIN: f32 = 50.0;
const LABEL_X: f32 = 50.0;
const VALUE_X: f32 = 200.0;
const AMOUNT_X: f32 = 540.0;

/// Renders one worker's profit-sharing liquidation as a one-page PDF.
pub fn render_certificate(
    share: &ProfitShare,
    pool: &ProfitSharingPool,
    company: &CompanyConfig,
    issued_on: NaiveDate,
) -> EngineResult<Vec<u8>> {
    let mut c = Canvas::new();
    let centre = PAGE_WIDTH / 2.0;
    let right_edge = PAGE_WIDTH - MARGIN;
    let employee = &share.employee;
    let mut y = PAGE_HEIGHT - 60.0;

    c.set_font(Font::Bold, 14.0);
    c.draw_centred_string(centre, y, "LIQUIDACIÓN DE DISTRIBUCIÓN DE UTILIDADES");
    y -= 18.0;
    c.set_font(Font::Regular, 10.0);
    c.draw_centred_string(
        centre,
        y,
        &format!("EJERCICIO {} - {}", pool.fiscal_year, PROFIT_SHARING_LEGAL_REF),
    );

    y -= 30.0;
    c.set_font(Font::Bold, 10.0);
    c.draw_string(LABEL_X, y, "Empleador :");
    c.draw_string(LABEL_X, y - 15.0, "Domicilio :");
    c.draw_string(LABEL_X, y - 30.0, "R.U.C.    :");
    c.set_font(Font::Regular, 10.0);
    c.draw_string(VALUE_X - 70.0, y, &company.name);
    c.draw_string(VALUE_X - 70.0, y - 15.0, &company.address);
    c.draw_string(VALUE_X - 70.0, y - 30.0, &company.ruc);

    y -= 45.0;
    c.line(MARGIN, y, right_edge, y);

    y -= 20.0;
    c.set_font(Font::Bold, 11.0);
    c.draw_string(LABEL_X, y, "DATOS DEL TRABAJADOR");
    y -= 18.0;
    c.set_font(Font::Bold, 10.0);
    c.draw_string(LABEL_X, y, "Nombre :");
    c.draw_string(LABEL_X, y - 15.0, "DNI    :");
    c.draw_string(LABEL_X, y - 30.0, "Cargo  :");
    c.set_font(Font::Regular, 10.0);
    c.draw_string(VALUE_X - 70.0, y, &employee.name);
    c.draw_string(VALUE_X - 70.0, y - 15.0, &employee.dni);
    c.draw_string(
        VALUE_X - 70.0,
        y - 30.0,
        employee.position.as_deref().unwrap_or("-"),
    );

    y -= 45.0;
    c.line(MARGIN, y, right_edge, y);

    y -= 20.0;
    c.set_font(Font::Bold, 10.0);
    c.draw_string(LABEL_X, y, "DISTRIBUCIÓN");
    c.draw_right_string(380.0, y, "TRABAJADOR");
    c.draw_right_string(460.0, y, "TOTAL EMPRESA");
    c.draw_right_string(AMOUNT_X, y, "IMPORTE");

    c.set_font(Font::Regular, 10.0);
    y -= 18.0;
    c.draw_string(LABEL_X, y, "Monto a distribuir");
    c.draw_right_string(AMOUNT_X, y, &money(pool.amount));

    y -= 15.0;
    c.draw_string(LABEL_X, y, "50% por días laborados");
    c.draw_right_string(380.0, y, &employee.days_worked.normalize().to_string());
    c.draw_right_string(460.0, y, &pool.total_days.normalize().to_string());
    c.draw_right_string(AMOUNT_X, y, &money(share.by_days));

    y -= 15.0;
    c.draw_string(LABEL_X, y, "50% por remuneraciones");
    c.draw_right_string(380.0, y, &money(employee.remuneration));
    c.draw_right_string(460.0, y, &money(pool.total_remuneration));
    c.draw_right_string(AMOUNT_X, y, &money(share.by_remuneration));

    y -= 10.0;
    c.line(300.0, y, right_edge, y);

    y -= 15.0;
    c.set_font(Font::Bold, 10.0);
    c.draw_string(LABEL_X, y, "TOTAL PARTICIPACIÓN");
    c.draw_right_string(AMOUNT_X, y, &money(share.total));

    y -= 15.0;
    c.set_font(Font::Regular, 10.0);
    c.draw_string(LABEL_X, y, "Retención Renta 5ta categoría");
    c.draw_right_string(AMOUNT_X, y, &money(employee.withholding));

    y -= 10.0;
    c.line(300.0, y, right_edge, y);

    y -= 18.0;
    c.set_font(Font::Bold, 11.0);
    c.draw_string(LABEL_X, y, "NETO A PAGAR");
    c.draw_right_string(AMOUNT_X, y, &money(share.net));

    y -= 15.0;
    c.set_font(Font::Regular, 9.0);
    c.draw_string(LABEL_X, y, &format!("SON: {}", share.net_words));

    y -= 30.0;
    c.set_font(Font::Regular, 10.0);
    let month = PayrollPeriod::from_date(issued_on);
    c.draw_right_string(
        right_edge,
        y,
        &format!(
            "Lima, {} de {} de {}",
            issued_on.format("%d"),
            capitalize(month.month_name()),
            month.year
        ),
    );

    y -= 80.0;
    c.line(100.0, y, 250.0, y);
    c.line(350.0, y, 500.0, y);
    y -= 12.0;
    c.set_font(Font::Bold, 9.0);
    c.draw_centred_string(175.0, y, "Empleador");
    c.draw_centred_string(425.0, y, "Trabajador");

    c.finish(&format!(
        "Certificado de utilidades {} {}",
        pool.fiscal_year, employee.name
    ))
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
