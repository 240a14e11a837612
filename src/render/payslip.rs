//! Payslip (boleta de pago) layout.

use rust_decimal::Decimal;

use super::canvas::{Canvas, Font, PAGE_HEIGHT, PAGE_WIDTH};
use crate::config::CompanyConfig;
use crate::error::EngineResult;
use crate::models::{PayItem, Payslip};

const MARGIN: f32 = 50.0;
const ITEM_HEIGHT: f32 = 15.0;

/// Formats an amount as `S/ 1234.50`.
pub fn money(amount: Decimal) -> String {
    format!("S/ {:.2}", amount)
}

fn draw_items(canvas: &mut Canvas, items: &[PayItem], x: f32, right: f32, top: f32) -> f32 {
    let mut y = top;
    for item in items {
        canvas.draw_string(x, y, &item.concept);
        canvas.draw_right_string(right, y, &money(item.amount));
        y -= ITEM_HEIGHT;
    }
    y
}

/// Renders a payslip as a one-page PDF.
///
/// The page carries the statutory header, the employer and worker blocks,
/// the income / deduction / contribution columns with their totals, the net
/// pay in figures and in words, the payment date and two signature lines.
pub fn render_payslip(payslip: &Payslip, company: &CompanyConfig) -> EngineResult<Vec<u8>> {
    let mut c = Canvas::new();
    let right_edge = PAGE_WIDTH - MARGIN;
    let top = PAGE_HEIGHT;
    let employee = &payslip.employee;
    let period = &employee.period;

    c.set_font(Font::Bold, 12.0);
    c.draw_right_string(
        right_edge,
        top - 40.0,
        &format!("BOLETA DE PAGO {} {}", period.month_name(), period.year),
    );
    c.draw_right_string(right_edge, top - 55.0, "D.S. N°017-2001-TR DEL 07-06-01");

    c.set_font(Font::Bold, 10.0);
    c.draw_string(MARGIN, top - 80.0, "Razon Social:");
    c.draw_string(MARGIN, top - 95.0, "Domicilio   :");
    c.draw_string(MARGIN, top - 110.0, "R.U.C.      :");
    c.set_font(Font::Regular, 10.0);
    c.draw_string(130.0, top - 80.0, &company.name);
    c.draw_string(130.0, top - 95.0, &company.address);
    c.draw_string(130.0, top - 110.0, &company.ruc);

    c.line(MARGIN, top - 125.0, right_edge, top - 125.0);

    c.set_font(Font::Bold, 11.0);
    c.draw_string(MARGIN, top - 145.0, "DATOS DEL TRABAJADOR");
    c.set_font(Font::Bold, 10.0);
    c.draw_string(MARGIN, top - 165.0, "Nombre :");
    c.draw_string(MARGIN, top - 180.0, "Cargo :");
    c.set_font(Font::Regular, 10.0);
    c.draw_string(130.0, top - 165.0, &employee.name);
    c.draw_string(130.0, top - 180.0, &employee.position);

    let mut y = top - 200.0;
    c.set_font(Font::Bold, 9.0);
    c.draw_string(MARGIN, y, "Código :");
    c.draw_string(120.0, y, &employee.dni);
    c.draw_string(180.0, y, "T.Pensión :");
    c.draw_string(250.0, y, &employee.pension_system);
    c.draw_string(350.0, y, "F.Ingr.:");
    let hire_date = employee
        .hire_date
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default();
    c.draw_string(400.0, y, &hire_date);
    c.draw_string(480.0, y, "D.Trab :");
    c.draw_string(525.0, y, &employee.days_worked.normalize().to_string());

    y -= 20.0;
    c.line(MARGIN, y, right_edge, y);

    y -= 15.0;
    c.set_font(Font::Bold, 10.0);
    c.draw_string(MARGIN, y, "REMUNERACIONES");
    c.draw_string(300.0, y, "DESCUENTOS TRABAJADOR");
    c.draw_string(480.0, y, "APORTES EMPLEADOR");

    y -= 10.0;
    c.line(MARGIN, y, right_edge, y);

    y -= 25.0;
    c.set_font(Font::Regular, 9.0);
    let incomes_end = draw_items(&mut c, &payslip.incomes, MARGIN, 250.0, y);
    let deductions_end = draw_items(&mut c, &payslip.deductions, 300.0, 450.0, y);
    let contributions_end = draw_items(&mut c, &payslip.contributions, 480.0, 550.0, y);
    let mut y = incomes_end.min(deductions_end).min(contributions_end);

    y -= 10.0;
    c.line(MARGIN, y, right_edge, y);

    let totals = &payslip.totals;
    y -= 25.0;
    c.set_font(Font::Bold, 9.0);
    c.draw_string(MARGIN, y, "TOTAL HABER");
    c.draw_right_string(250.0, y, &money(totals.total_income));
    c.draw_string(300.0, y, "TOTAL DESCUENTOS");
    c.draw_right_string(450.0, y, &money(totals.total_deductions));
    c.draw_string(480.0, y, "TOTAL APORTES");
    c.draw_right_string(550.0, y, &money(totals.total_contributions));

    y -= 10.0;
    c.line(MARGIN, y, right_edge, y);

    y -= 20.0;
    c.draw_string(MARGIN, y, "NETO A PAGAR EN:");
    c.draw_right_string(250.0, y, &money(totals.net_pay));

    y -= 15.0;
    c.set_font(Font::Regular, 9.0);
    c.draw_string(MARGIN, y, &format!("SON: {}", payslip.net_pay_words));

    y -= 20.0;
    c.set_font(Font::Bold, 9.0);
    c.draw_string(MARGIN, y, "Fecha de Pago :");
    c.draw_string(130.0, y, &payslip.payment_date.format("%d/%m/%Y").to_string());

    y -= 60.0;
    c.line(100.0, y, 250.0, y);
    c.line(350.0, y, 500.0, y);

    y -= 10.0;
    c.draw_centred_string(175.0, y, "Empleador");
    c.draw_centred_string(425.0, y, "Trabajador");

    c.finish(&format!("Boleta de pago {} {}", employee.dni, period))
}
