//! Path and filename helpers

use chrono::{DateTime, TimeZone};

/// Prefix of every per-request work directory
pub const WORK_DIR_PREFIX: &str = "media_processing_";

/// Output filename stamped with the render time
pub fn output_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("combined_video_{}.mp4", at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_output_file_name_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(output_file_name(&at), "combined_video_20240307_090502.mp4");
    }
}
