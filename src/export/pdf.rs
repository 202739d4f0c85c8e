//! PDF rendition of the weekly report
//!
//! Page 1 (portrait) holds the summary and daily table, page 2 (landscape)
//! a calories-in vs calories-burned chart rendered with plotters.

use chrono::{DateTime, Utc};
use printpdf::image_crate::{DynamicImage, ImageFormat, RgbImage};
use printpdf::*;

use super::ExportError;
use crate::stats::{average_sleep_hours, DailyTotals, WeeklyReport};

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_TITLE: (u8, u8, u8) = (0, 112, 192);
const COLOR_INTAKE: (u8, u8, u8) = (0, 176, 80);
const COLOR_BURNED: (u8, u8, u8) = (255, 140, 0);
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);
const COLOR_ERROR: (u8, u8, u8) = (255, 0, 0);

const LETTER_WIDTH: f32 = 215.9;
const LETTER_HEIGHT: f32 = 279.4;
const MARGIN_LEFT: f32 = 15.0;

// ============================================================================
// Chart Generation (plotters)
// ============================================================================

/// Calories in vs burned per day, as PNG bytes
pub fn generate_calorie_chart(
    days: &[DailyTotals],
    width: u32,
    height: u32,
) -> Result<Vec<u8>, ExportError> {
    use plotters::prelude::*;

    if days.is_empty() {
        return Err(ExportError::Chart("no data to chart".to_string()));
    }

    let chart_err = |e: &dyn std::fmt::Display| ExportError::Chart(e.to_string());
    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| chart_err(&e))?;

        let y_max = days
            .iter()
            .flat_map(|d| [d.kalori_masuk, d.kalori_terbakar])
            .max()
            .unwrap_or(0)
            .max(100) as f64
            * 1.1;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0..(days.len() as i32), 0.0..y_max)
            .map_err(|e| chart_err(&e))?;

        chart
            .configure_mesh()
            .x_labels(days.len().min(10))
            .x_label_formatter(&|x| {
                if *x >= 0 && (*x as usize) < days.len() {
                    let date = &days[*x as usize].tanggal;
                    date.split('-').skip(1).collect::<Vec<_>>().join("/")
                } else {
                    String::new()
                }
            })
            .y_desc("kkal")
            .draw()
            .map_err(|e| chart_err(&e))?;

        let series = [
            ("Kalori masuk", COLOR_INTAKE, days.iter().map(|d| d.kalori_masuk).collect::<Vec<_>>()),
            ("Kalori terbakar", COLOR_BURNED, days.iter().map(|d| d.kalori_terbakar).collect()),
        ];

        for (label, (r, g, b), values) in series {
            let color = RGBColor(r, g, b);
            let points: Vec<(i32, f64)> = values
                .iter()
                .enumerate()
                .map(|(i, v)| (i as i32, *v as f64))
                .collect();

            chart
                .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
                .map_err(|e| chart_err(&e))?
                .label(label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });

            chart
                .draw_series(points.iter().map(|(x, y)| Circle::new((*x, *y), 3, color.filled())))
                .map_err(|e| chart_err(&e))?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| chart_err(&e))?;

        root.present().map_err(|e| chart_err(&e))?;
    }

    // Convert RGB buffer to PNG
    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ExportError::Chart("failed to create image from buffer".to_string()))?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| chart_err(&e))?;

    Ok(png_bytes)
}

// ============================================================================
// PDF Generation Helper Functions
// ============================================================================

fn rgb_to_printpdf(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn add_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    x: Mm,
    y: Mm,
    size: f32,
    color: (u8, u8, u8),
) {
    layer.set_fill_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.use_text(text, size, x, y, font);
}

fn add_line(
    layer: &PdfLayerReference,
    x1: Mm,
    y1: Mm,
    x2: Mm,
    y2: Mm,
    color: (u8, u8, u8),
    width: f32,
) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![(Point::new(x1, y1), false), (Point::new(x2, y2), false)],
        is_closed: false,
    };
    layer.add_line(line);
}

// ============================================================================
// Report
// ============================================================================

/// Render the weekly report for `nama` as PDF bytes
pub fn render(
    nama: &str,
    report: &WeeklyReport,
    days: &[DailyTotals],
    generated: DateTime<Utc>,
) -> Result<Vec<u8>, ExportError> {
    let pdf_err = |e: &dyn std::fmt::Display| ExportError::Pdf(e.to_string());

    let start = report.period.start.format("%Y-%m-%d").to_string();
    let end = report.period.end.format("%Y-%m-%d").to_string();

    let (doc, page1, layer1) = PdfDocument::new(
        "Laporan Kesehatan LifeMon",
        Mm(LETTER_WIDTH),
        Mm(LETTER_HEIGHT),
        "Layer 1",
    );

    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| pdf_err(&e))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| pdf_err(&e))?;

    let layer = doc.get_page(page1).get_layer(layer1);
    let mut y = LETTER_HEIGHT - 20.0;

    add_text(
        &layer,
        &font_bold,
        "Laporan Kesehatan Mingguan",
        Mm(MARGIN_LEFT),
        Mm(y),
        18.0,
        COLOR_TITLE,
    );
    y -= 10.0;

    add_text(&layer, &font, &format!("Nama: {}", nama), Mm(MARGIN_LEFT), Mm(y), 11.0, COLOR_BLACK);
    y -= 6.0;
    add_text(
        &layer,
        &font,
        &format!("Periode: {} s/d {}", start, end),
        Mm(MARGIN_LEFT),
        Mm(y),
        11.0,
        COLOR_BLACK,
    );
    add_text(
        &layer,
        &font,
        &format!("Dibuat: {}", generated.format("%Y-%m-%d %H:%M UTC")),
        Mm(120.0),
        Mm(y),
        11.0,
        COLOR_BLACK,
    );
    y -= 10.0;

    add_line(&layer, Mm(MARGIN_LEFT), Mm(y), Mm(200.0), Mm(y), COLOR_GRAY, 0.5);
    y -= 8.0;

    // Summary
    let kalori_masuk: i64 = days.iter().map(|d| d.kalori_masuk).sum();
    let kalori_terbakar: i64 = days.iter().map(|d| d.kalori_terbakar).sum();
    let menit: i64 = days.iter().map(|d| d.menit_olahraga).sum();
    let sleep = average_sleep_hours(&report.sleep_logs);

    add_text(&layer, &font_bold, "Ringkasan", Mm(MARGIN_LEFT), Mm(y), 12.0, COLOR_BLACK);
    y -= 7.0;
    add_text(
        &layer,
        &font,
        &format!("Kalori masuk: {} kkal", kalori_masuk),
        Mm(MARGIN_LEFT),
        Mm(y),
        10.0,
        COLOR_INTAKE,
    );
    add_text(
        &layer,
        &font,
        &format!("Kalori terbakar: {} kkal", kalori_terbakar),
        Mm(80.0),
        Mm(y),
        10.0,
        COLOR_BURNED,
    );
    y -= 6.0;
    add_text(
        &layer,
        &font,
        &format!("Olahraga: {} sesi, {} menit", report.exercise_logs.len(), menit),
        Mm(MARGIN_LEFT),
        Mm(y),
        10.0,
        COLOR_BLACK,
    );
    add_text(
        &layer,
        &font,
        &format!("Rata-rata tidur: {:.1} jam", sleep.hours),
        Mm(80.0),
        Mm(y),
        10.0,
        COLOR_BLACK,
    );
    add_text(
        &layer,
        &font,
        &format!("Catatan makanan: {}", report.food_logs.len()),
        Mm(140.0),
        Mm(y),
        10.0,
        COLOR_BLACK,
    );
    y -= 12.0;

    // Daily table
    add_text(&layer, &font_bold, "Rincian Harian", Mm(MARGIN_LEFT), Mm(y), 12.0, COLOR_BLACK);
    y -= 7.0;

    let col_widths = [25.0, 20.0, 28.0, 28.0, 22.0, 16.0, 20.0];
    let headers = ["Tanggal", "Hari", "Kalori Masuk", "Terbakar", "Menit", "Sesi", "Tidur (jam)"];

    let mut col_x = MARGIN_LEFT;
    for (i, header) in headers.iter().enumerate() {
        add_text(&layer, &font_bold, header, Mm(col_x), Mm(y), 8.0, COLOR_BLACK);
        col_x += col_widths[i];
    }
    y -= 5.0;

    if days.is_empty() {
        add_text(
            &layer,
            &font,
            "Belum ada data pada periode ini.",
            Mm(MARGIN_LEFT),
            Mm(y),
            9.0,
            COLOR_GRAY,
        );
    }

    for day in days {
        col_x = MARGIN_LEFT;
        let values = [
            day.tanggal.clone(),
            day.hari.clone(),
            day.kalori_masuk.to_string(),
            day.kalori_terbakar.to_string(),
            day.menit_olahraga.to_string(),
            day.sesi_olahraga.to_string(),
            format!("{:.1}", day.jam_tidur),
        ];

        for (i, value) in values.iter().enumerate() {
            add_text(&layer, &font, value, Mm(col_x), Mm(y), 8.0, COLOR_BLACK);
            col_x += col_widths[i];
        }
        y -= 4.5;
    }

    // ========================================================================
    // Page 2 - Landscape for Chart
    // ========================================================================
    let (page2, layer2) = doc.add_page(Mm(LETTER_HEIGHT), Mm(LETTER_WIDTH), "Chart Page");
    let layer2 = doc.get_page(page2).get_layer(layer2);
    let mut y2 = LETTER_WIDTH - 20.0;

    add_text(&layer2, &font_bold, "Tren Kalori", Mm(MARGIN_LEFT), Mm(y2), 16.0, COLOR_TITLE);
    add_text(&layer2, &font, &format!("{} - {}", start, end), Mm(120.0), Mm(y2), 11.0, COLOR_BLACK);
    y2 -= 10.0;

    if days.is_empty() {
        add_text(
            &layer2,
            &font,
            "Belum ada data untuk ditampilkan.",
            Mm(MARGIN_LEFT),
            Mm(y2 - 10.0),
            10.0,
            COLOR_GRAY,
        );
    } else {
        match generate_calorie_chart(days, 1000, 400) {
            Ok(png_bytes) => {
                let dynamic_image =
                    printpdf::image_crate::load_from_memory(&png_bytes).map_err(|e| pdf_err(&e))?;
                let pdf_image = Image::from_dynamic_image(&dynamic_image);

                // 1000x400 pixels at 120 DPI = ~212mm x 85mm
                let transform = ImageTransform {
                    translate_x: Some(Mm(MARGIN_LEFT)),
                    translate_y: Some(Mm(y2 - 90.0)),
                    dpi: Some(120.0),
                    ..Default::default()
                };
                pdf_image.add_to_layer(layer2.clone(), transform);
            }
            Err(e) => {
                tracing::warn!("calorie chart skipped: {}", e);
                add_text(
                    &layer2,
                    &font,
                    &format!("Grafik gagal dibuat: {}", e),
                    Mm(MARGIN_LEFT),
                    Mm(y2 - 10.0),
                    9.0,
                    COLOR_ERROR,
                );
            }
        }
    }

    doc.save_to_bytes().map_err(|e| pdf_err(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{daily_breakdown, weekly_report};
    use crate::models::FoodLog;
    use chrono::TimeZone;

    #[test]
    fn test_empty_window_still_renders() {
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
        let report = weekly_report(&[], &[], &[], now);
        let bytes = render("Budi", &report, &[], now).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_renders_with_data() {
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
        let food = vec![FoodLog {
            id: 1,
            user_id: 1,
            nama_makanan: "Nasi".to_string(),
            kalori: 650,
            tanggal: "2025-01-09".to_string(),
            created_at: String::new(),
        }];
        let report = weekly_report(&food, &[], &[], now);
        let days = daily_breakdown(&report);
        let bytes = render("Budi", &report, &days, now).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_chart_requires_data() {
        assert!(generate_calorie_chart(&[], 100, 100).is_err());
    }
}
