pub struct FileSizeUtils;

impl FileSizeUtils {
    const UNITS: [&'static str; 4] = ["B", "KB", "MB", "GB"];

    /// Human readable size for the "ready to sync" line.
    pub fn format_size(bytes: u64) -> String {
        let mut value = bytes as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < Self::UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }

        match unit {
            0 => format!("{} B", bytes),
            _ => format!("{:.1} {}", value, Self::UNITS[unit]),
        }
    }
}
