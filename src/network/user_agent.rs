//! User agent generation

use rand::seq::SliceRandom;

const ANDROID_VERSIONS: [&str; 4] = ["11", "12", "13", "14"];
const WEBVIEW_VERSIONS: [&str; 4] = ["120.0.0.0", "122.0.0.0", "124.0.0.0", "126.0.0.0"];

/// Generate a mobile browser user agent, optionally with a product suffix
pub fn generate_user_agent(suffix: Option<&str>) -> String {
    let mut rng = rand::thread_rng();
    let android = ANDROID_VERSIONS.choose(&mut rng).unwrap_or(&"14");
    let webview = WEBVIEW_VERSIONS.choose(&mut rng).unwrap_or(&"126.0.0.0");

    let mut ua = format!(
        "Mozilla/5.0 (Linux; Android {}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Mobile Safari/537.36",
        android, webview
    );
    if let Some(suffix) = suffix.filter(|s| !s.is_empty()) {
        ua.push(' ');
        ua.push_str(suffix);
    }
    ua
}

/// Accept header for the JSON suggestion endpoints
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_user_agent() {
        let ua = generate_user_agent(None);
        assert!(ua.starts_with("Mozilla/5.0 (Linux; Android"));
        assert!(ua.ends_with("Mobile Safari/537.36"));
    }

    #[test]
    fn test_suffix_is_appended() {
        let ua = generate_user_agent(Some("SystemSearch/0.1"));
        assert!(ua.ends_with(" SystemSearch/0.1"));
    }
}
