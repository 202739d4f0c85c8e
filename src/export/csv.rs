//! CSV rendition of the daily breakdown

use crate::stats::DailyTotals;

pub const HEADER: [&str; 7] = [
    "tanggal",
    "hari",
    "kalori_masuk",
    "kalori_terbakar",
    "menit_olahraga",
    "sesi_olahraga",
    "jam_tidur",
];

/// Quote a text field when it contains a delimiter, quote or line break
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One header line plus one CRLF-terminated row per day
pub fn render(days: &[DailyTotals]) -> String {
    let mut out = HEADER.join(",");
    out.push_str("\r\n");

    for day in days {
        let row = [
            escape(&day.tanggal),
            escape(&day.hari),
            day.kalori_masuk.to_string(),
            day.kalori_terbakar.to_string(),
            day.menit_olahraga.to_string(),
            day.sesi_olahraga.to_string(),
            format!("{:.1}", day.jam_tidur),
        ];
        out.push_str(&row.join(","));
        out.push_str("\r\n");
    }

    out
}
