use crate::app::Tone;
use eframe::egui::Color32;

pub trait ColorExt {
    fn from_hex(hex: &str) -> Option<Self>
    where
        Self: Sized;
}

impl ColorExt for Color32 {
    fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

fn hex_or_gray(code: &str) -> Color32 {
    <Color32 as ColorExt>::from_hex(code).unwrap_or(Color32::GRAY)
}

pub fn accent() -> Color32 {
    hex_or_gray("#a159e1")
}

/// Colour for a status message, one per outcome kind.
pub fn tone_color(tone: Tone) -> Color32 {
    hex_or_gray(match tone {
        Tone::Info => "#969696",
        Tone::Success => "#00b400",
        Tone::Warning => "#d99a00",
        Tone::Failure => "#dc3232",
        Tone::Invalid => "#4a90d9",
    })
}
