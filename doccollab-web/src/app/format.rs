use js_sys::Date;
use wasm_bindgen::JsValue;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Relative wording for an age in seconds. `None` once it is a week or older,
/// where callers print a calendar date instead.
pub fn format_elapsed(seconds: i64) -> Option<String> {
    let text = if seconds < MINUTE {
        "Just now".to_string()
    } else if seconds < HOUR {
        format!("{}min ago", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{}h ago", seconds / HOUR)
    } else {
        match seconds / DAY {
            1 => "Yesterday".to_string(),
            days if days < 7 => format!("{} days ago", days),
            _ => return None,
        }
    };

    Some(text)
}

/// Formats an ISO-8601 timestamp relative to now, e.g. "5min ago".
pub fn format_timestamp(iso: &str) -> String {
    let date = Date::new(&JsValue::from_str(iso));
    let millis = date.get_time();
    if millis.is_nan() {
        return iso.to_string();
    }

    let seconds = ((Date::now() - millis) / 1000.0).floor() as i64;

    match format_elapsed(seconds) {
        Some(text) => text,
        None => date
            .to_locale_date_string("en-US", &JsValue::UNDEFINED)
            .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_times() {
        assert_eq!(format_elapsed(0).as_deref(), Some("Just now"));
        assert_eq!(format_elapsed(59).as_deref(), Some("Just now"));
        assert_eq!(format_elapsed(60).as_deref(), Some("1min ago"));
        assert_eq!(format_elapsed(3599).as_deref(), Some("59min ago"));
        assert_eq!(format_elapsed(2 * HOUR + 10).as_deref(), Some("2h ago"));
    }

    #[test]
    fn days() {
        assert_eq!(format_elapsed(DAY).as_deref(), Some("Yesterday"));
        assert_eq!(format_elapsed(2 * DAY - 1).as_deref(), Some("Yesterday"));
        assert_eq!(format_elapsed(3 * DAY).as_deref(), Some("3 days ago"));
        assert_eq!(format_elapsed(7 * DAY), None);
    }

    #[test]
    fn future_timestamps_read_as_now() {
        assert_eq!(format_elapsed(-30).as_deref(), Some("Just now"));
    }
}
