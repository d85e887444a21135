use regex::Regex;
use std::sync::LazyLock;

/// curl starts every failure line with its numeric exit code, e.g. `curl: (22) `.
static CURL_ERROR_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^curl: \(\d+\) ").expect("marker pattern is valid"));

/// Pull the human-readable reason out of curl's stderr.
///
/// Returns the text following the first `curl: (<code>)` marker, up to the
/// next marker or the end of the output. Without a marker the message is
/// empty.
pub fn extract_error_message(stderr: &str) -> String {
    CURL_ERROR_MARKER
        .split(stderr)
        .nth(1)
        .map(|message| message.trim_matches(|c| c == '\r' || c == '\n').to_string())
        .unwrap_or_default()
}

/// The numeric exit code quoted in the first marker, if any.
pub fn extract_error_code(stderr: &str) -> Option<i32> {
    let marker = CURL_ERROR_MARKER.find(stderr)?;
    marker
        .as_str()
        .trim_start_matches("curl: (")
        .trim_end_matches(") ")
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_http_failure() {
        let stderr = "curl: (22) The requested URL returned error: 404\n";
        assert_eq!(
            extract_error_message(stderr),
            "The requested URL returned error: 404"
        );
    }

    #[test]
    fn test_missing_marker_is_empty() {
        assert_eq!(extract_error_message(""), "");
        assert_eq!(extract_error_message("Warning: something odd\n"), "");
        assert_eq!(extract_error_message("curl: unknown option --frob\n"), "");
    }

    #[test]
    fn test_meter_noise_before_marker() {
        let stderr = "  % Total    % Received % Xferd\n\r  0     0    0     0    0     0      0      0 --:--:-- --:--:-- --:--:--     0\ncurl: (6) Could not resolve host: example.invalid\n";
        assert_eq!(
            extract_error_message(stderr),
            "Could not resolve host: example.invalid"
        );
    }

    #[test]
    fn test_only_first_marker_is_used() {
        let stderr = "curl: (56) Recv failure: Connection reset by peer\ncurl: (23) Failure writing output to destination\n";
        assert_eq!(
            extract_error_message(stderr),
            "Recv failure: Connection reset by peer"
        );
    }

    #[test]
    fn test_marker_must_start_a_line() {
        let stderr = "Warning: server said 'curl: (22) fake' in a header\n";
        assert_eq!(extract_error_message(stderr), "");
        assert_eq!(extract_error_code(stderr), None);

        let stderr = "Warning: quoted curl: (7) inline\ncurl: (28) Operation timed out\n";
        assert_eq!(extract_error_message(stderr), "Operation timed out");
        assert_eq!(extract_error_code(stderr), Some(28));
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            extract_error_code("curl: (22) The requested URL returned error: 404"),
            Some(22)
        );
        assert_eq!(extract_error_code("no marker here"), None);
    }
}
