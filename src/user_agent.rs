use woothee::parser::{Parser, WootheeResult};

/// Browser, OS and device descriptors parsed from a User-Agent header.
///
/// Parsing never fails: empty or unrecognized input yields empty-string
/// fields so a tracked request is still recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub browser_family: String,
    pub browser_version: String,
    pub os_family: String,
    pub os_version: String,
    pub device_family: String,
}

impl ClientInfo {
    pub fn from_user_agent(ua: &str) -> Self {
        if ua.trim().is_empty() {
            return Self::default();
        }

        match Parser::new().parse(ua) {
            Some(result) => Self::from_woothee(&result),
            None => Self::default(),
        }
    }

    /// `"<family> <version>"`, trimmed when the version is unknown.
    pub fn browser(&self) -> String {
        format!("{} {}", self.browser_family, self.browser_version)
            .trim()
            .to_string()
    }

    /// `"<family> <version>"`, trimmed when the version is unknown.
    pub fn os(&self) -> String {
        format!("{} {}", self.os_family, self.os_version)
            .trim()
            .to_string()
    }

    fn from_woothee(result: &WootheeResult) -> Self {
        Self {
            browser_family: clean(result.name),
            browser_version: clean(result.version),
            os_family: clean(result.os),
            os_version: clean(&result.os_version),
            device_family: device_family(result.category),
        }
    }
}

fn clean(value: &str) -> String {
    if value == "UNKNOWN" {
        String::new()
    } else {
        value.trim().to_string()
    }
}

fn device_family(category: &str) -> String {
    match category {
        "pc" => "Desktop",
        "smartphone" | "mobilephone" => "Mobile",
        "tablet" => "Tablet",
        "appliance" => "Smart TV",
        "crawler" => "Bot",
        "misc" => "Other",
        _ => "",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_DESKTOP: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    #[test]
    fn chrome_on_windows() {
        let info = ClientInfo::from_user_agent(CHROME_DESKTOP);
        assert_eq!(info.browser_family, "Chrome");
        assert!(info.browser().starts_with("Chrome"));
        assert!(info.os().starts_with("Windows"));
        assert_eq!(info.device_family, "Desktop");
    }

    #[test]
    fn empty_input_yields_empty_fields() {
        let info = ClientInfo::from_user_agent("");
        assert_eq!(info, ClientInfo::default());
        assert_eq!(info.browser(), "");
        assert_eq!(info.os(), "");
    }

    #[test]
    fn whitespace_input_yields_empty_fields() {
        assert_eq!(ClientInfo::from_user_agent("   "), ClientInfo::default());
    }

    #[test]
    fn crawler_maps_to_bot() {
        let info =
            ClientInfo::from_user_agent("Googlebot/2.1 (+http://www.google.com/bot.html)");
        assert_eq!(info.device_family, "Bot");
    }

    #[test]
    fn iphone_maps_to_mobile() {
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Mobile/15E148 Safari/604.1";
        let info = ClientInfo::from_user_agent(ua);
        assert_eq!(info.browser_family, "Safari");
        assert_eq!(info.device_family, "Mobile");
    }
}
