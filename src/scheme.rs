/// The special schemes of the WHATWG URL Standard, plus a catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemeType {
    Http,
    Https,
    Ws,
    Wss,
    Ftp,
    File,
    #[default]
    NotSpecial,
}

impl SchemeType {
    /// Classify a lowercase scheme string.
    /// Filters by length and first byte before comparing in full.
    pub fn from_scheme(scheme: &str) -> SchemeType {
        let bytes = scheme.as_bytes();

        match (bytes.len(), bytes.first()) {
            (2, Some(b'w')) if bytes == b"ws" => SchemeType::Ws,
            (3, Some(b'w')) if bytes == b"wss" => SchemeType::Wss,
            (3, Some(b'f')) if bytes == b"ftp" => SchemeType::Ftp,
            (4, Some(b'h')) if bytes == b"http" => SchemeType::Http,
            (4, Some(b'f')) if bytes == b"file" => SchemeType::File,
            (5, Some(b'h')) if bytes == b"https" => SchemeType::Https,
            _ => SchemeType::NotSpecial,
        }
    }

    pub fn is_special(self) -> bool {
        self != SchemeType::NotSpecial
    }

    /// The port omitted from serialization for this scheme.
    pub fn default_port(self) -> Option<u16> {
        match self {
            SchemeType::Http | SchemeType::Ws => Some(80),
            SchemeType::Https | SchemeType::Wss => Some(443),
            SchemeType::Ftp => Some(21),
            SchemeType::File | SchemeType::NotSpecial => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_special_schemes() {
        assert_eq!(SchemeType::from_scheme("http"), SchemeType::Http);
        assert_eq!(SchemeType::from_scheme("https"), SchemeType::Https);
        assert_eq!(SchemeType::from_scheme("ws"), SchemeType::Ws);
        assert_eq!(SchemeType::from_scheme("wss"), SchemeType::Wss);
        assert_eq!(SchemeType::from_scheme("ftp"), SchemeType::Ftp);
        assert_eq!(SchemeType::from_scheme("file"), SchemeType::File);
        assert_eq!(SchemeType::from_scheme("custom"), SchemeType::NotSpecial);
        assert_eq!(SchemeType::from_scheme(""), SchemeType::NotSpecial);
    }

    #[test]
    fn default_ports() {
        assert_eq!(SchemeType::Http.default_port(), Some(80));
        assert_eq!(SchemeType::Https.default_port(), Some(443));
        assert_eq!(SchemeType::Ftp.default_port(), Some(21));
        assert_eq!(SchemeType::File.default_port(), None);
        assert_eq!(SchemeType::NotSpecial.default_port(), None);
    }
}
