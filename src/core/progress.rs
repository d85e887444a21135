//! Parsing of curl's progress meter.
//!
//! curl redraws its meter on stderr by emitting `\r` followed by a row of
//! right-aligned columns:
//!
//! ```text
//!   % Total    % Received % Xferd  Average Speed   Time    Time     Time  Current
//!                                  Dload  Upload   Total   Spent    Left  Speed
//! \r 45 12.0M   45  5.4M    0     0  1.2M      0  0:00:10  0:00:04  0:00:06 1.3M
//! ```

/// Marker that starts every progress redraw.
pub const PROGRESS_MARKER: char = '\r';

const PERCENT_COLUMN: usize = 1;
const ETA_COLUMN: usize = 11;
const RATE_COLUMN: usize = 12;

/// One snapshot of the transfer as reported by the meter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub percent: u8,
    /// Current speed, unit-suffixed by curl (e.g. `1.3M`).
    pub rate: String,
    /// Time left, formatted by curl (e.g. `0:00:06`).
    pub eta: String,
}

impl ProgressUpdate {
    /// Status line shown on the progress sink.
    pub fn status_line(&self) -> String {
        format!(
            "Progress: {}% (Rate: {}/s, Estimated time remaining: {})",
            self.percent, self.rate, self.eta
        )
    }
}

/// Parse one diagnostic line. Anything that is not a meter redraw is `None`.
pub fn parse_progress_line(line: &str) -> Option<ProgressUpdate> {
    let body = line.strip_prefix(PROGRESS_MARKER)?;

    // Column 0 is the padding in front of the right-aligned percentage, so a
    // meter at 100% (no padding) still lines up.
    let columns: Vec<&str> = std::iter::once("")
        .chain(body.split_whitespace())
        .collect();
    let column = |idx: usize| columns.get(idx).copied().unwrap_or_default();

    Some(ProgressUpdate {
        percent: parse_percent(column(PERCENT_COLUMN)),
        rate: column(RATE_COLUMN).to_string(),
        eta: column(ETA_COLUMN).to_string(),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_percent(raw: &str) -> u8 {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => value.clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const METER_LINE: &str =
        "\r  45.0 12.0M   45  5.4M    0     0   1.2M      0  0:00:10  0:00:04  0:00:06 1.3M    0";

    #[test]
    fn test_non_progress_lines_are_ignored() {
        assert_eq!(parse_progress_line(""), None);
        assert_eq!(parse_progress_line("  % Total    % Received % Xferd"), None);
        assert_eq!(
            parse_progress_line("curl: (22) The requested URL returned error: 404"),
            None
        );
        assert_eq!(parse_progress_line(" \r 45 12.0M"), None);
    }

    #[test]
    fn test_meter_columns_are_extracted() {
        let update = parse_progress_line(METER_LINE).unwrap();
        assert_eq!(
            update,
            ProgressUpdate {
                percent: 45,
                rate: "1.3M".to_string(),
                eta: "0:00:06".to_string(),
            }
        );
    }

    #[test]
    fn test_real_curl_row() {
        let line = "\r 12 1024M   12  128M    0     0  10.5M      0  0:01:37  0:00:12  0:01:25 11.2M";
        let update = parse_progress_line(line).unwrap();
        assert_eq!(update.percent, 12);
        assert_eq!(update.eta, "0:01:25");
        assert_eq!(update.rate, "11.2M");
    }

    #[test]
    fn test_complete_meter_without_padding() {
        let line = "\r100 12.0M  100 12.0M    0     0  2400k      0  0:00:05  0:00:05 --:--:-- 2550k";
        let update = parse_progress_line(line).unwrap();
        assert_eq!(update.percent, 100);
        assert_eq!(update.eta, "--:--:--");
        assert_eq!(update.rate, "2550k");
    }

    #[test]
    fn test_short_lines_yield_empty_fields() {
        assert_eq!(parse_progress_line("\r").unwrap(), ProgressUpdate::default());

        let update = parse_progress_line("\r  7 100k").unwrap();
        assert_eq!(update.percent, 7);
        assert!(update.rate.is_empty());
        assert!(update.eta.is_empty());
    }

    #[test]
    fn test_malformed_percent_defaults_to_zero() {
        let update = parse_progress_line("\r  ?? 12.0M").unwrap();
        assert_eq!(update.percent, 0);
    }

    #[test]
    fn test_status_line_format() {
        let update = parse_progress_line(METER_LINE).unwrap();
        assert_eq!(
            update.status_line(),
            "Progress: 45% (Rate: 1.3M/s, Estimated time remaining: 0:00:06)"
        );
    }
}
