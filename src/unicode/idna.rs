use crate::checkers::is_combining_mark;
use crate::unicode::idna_mapper::{IdnaMapper, Status};
use crate::unicode::punycode;
use unicode_normalization::{UnicodeNormalization, is_nfc};

const ACE_PREFIX: &str = "xn--";

/// Switches for the UTS #46 ToASCII pipeline.
///
/// `check_bidi` and `check_joiners` are accepted but not enforced; the
/// corresponding validity criteria are not implemented.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToAsciiParams {
    pub use_std3_ascii_rules: bool,
    pub check_hyphens: bool,
    pub check_bidi: bool,
    pub check_joiners: bool,
    pub transitional_processing: bool,
    pub verify_dns_length: bool,
    pub ignore_invalid_punycode: bool,
}

/// The processed domain plus whether any validity criterion failed.
/// Errors do not stop processing; the caller decides how to react.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToAsciiResult {
    pub domain: String,
    pub had_errors: bool,
}

/// UTS #46 ToASCII: map each code point through the table, NFC-normalize,
/// decode and validate label by label, then ACE-encode every label that is
/// still non-ASCII.
pub fn to_ascii(domain: &str, params: &ToAsciiParams) -> ToAsciiResult {
    let mapped = map(
        domain,
        params.use_std3_ascii_rules,
        params.transitional_processing,
    );
    let normalized: String = mapped.nfc().collect();
    let mut result = convert_and_validate(&normalized, params);
    result.domain = ace_encode_labels(&result.domain, &mut result.had_errors);

    if params.verify_dns_length && !dns_length_ok(&result.domain) {
        result.had_errors = true;
    }

    result
}

fn ace_encode_labels(domain: &str, had_errors: &mut bool) -> String {
    let mut output = String::with_capacity(domain.len());
    for (index, label) in domain.split('.').enumerate() {
        if index > 0 {
            output.push('.');
        }
        if label.is_ascii() {
            output.push_str(label);
        } else {
            match punycode::encode(label) {
                Ok(encoded) => {
                    output.push_str(ACE_PREFIX);
                    output.push_str(&encoded);
                }
                Err(_) => {
                    *had_errors = true;
                    output.push_str(label);
                }
            }
        }
    }
    output
}

fn map(domain: &str, use_std3_ascii_rules: bool, transitional_processing: bool) -> String {
    let mapper = IdnaMapper::current();
    let mut mapped = String::with_capacity(domain.len());

    for c in domain.chars() {
        let row = mapper.mapping(c as u32);
        match row.status {
            Status::Disallowed => mapped.push(c),
            Status::DisallowedStd3Valid => {
                // Without STD3 rules these behave as valid.
                mapped.push(c);
            }
            Status::DisallowedStd3Mapped => {
                if use_std3_ascii_rules {
                    mapped.push(c);
                } else if let Some(replacement) = &row.mapping {
                    mapped.push_str(replacement);
                }
            }
            Status::Mapped => {
                if transitional_processing && c == '\u{1E9E}' {
                    mapped.push_str("ss");
                } else if let Some(replacement) = &row.mapping {
                    mapped.push_str(replacement);
                }
            }
            Status::Deviation => {
                if transitional_processing {
                    if let Some(replacement) = &row.mapping {
                        mapped.push_str(replacement);
                    }
                } else {
                    mapped.push(c);
                }
            }
            Status::Ignored => {}
            Status::Valid => mapped.push(c),
        }
    }

    mapped
}

fn convert_and_validate(normalized: &str, params: &ToAsciiParams) -> ToAsciiResult {
    let mut had_errors = false;
    let mut output = String::with_capacity(normalized.len());

    for (index, label) in normalized.split('.').enumerate() {
        if index > 0 {
            output.push('.');
        }

        if label.starts_with(ACE_PREFIX) {
            if !label.is_ascii() {
                had_errors = true;
                output.push_str(label);
                continue;
            }

            match punycode::decode(&label[ACE_PREFIX.len()..]) {
                Ok(decoded) => {
                    if !is_valid_label(&decoded, false, params) {
                        had_errors = true;
                    }
                    output.push_str(&decoded);
                }
                Err(_) => {
                    if !params.ignore_invalid_punycode {
                        had_errors = true;
                    }
                    output.push_str(label);
                }
            }
        } else {
            if !is_valid_label(label, params.transitional_processing, params) {
                had_errors = true;
            }
            output.push_str(label);
        }
    }

    ToAsciiResult {
        domain: output,
        had_errors,
    }
}

fn is_valid_label(label: &str, transitional_processing: bool, params: &ToAsciiParams) -> bool {
    if !is_nfc(label) {
        return false;
    }

    if params.check_hyphens {
        let code_points: Vec<char> = label.chars().collect();
        if code_points.len() >= 4 && code_points[2] == '-' && code_points[3] == '-' {
            return false;
        }
        if label.starts_with('-') || label.ends_with('-') {
            return false;
        }
    } else if label.starts_with(ACE_PREFIX) {
        return false;
    }

    if label.contains('.') {
        return false;
    }

    if let Some(first) = label.chars().next() {
        if is_combining_mark(first) {
            return false;
        }
    }

    let mapper = IdnaMapper::current();
    label.chars().all(|c| match mapper.mapping(c as u32).status {
        Status::Valid => true,
        Status::Deviation => !transitional_processing,
        Status::DisallowedStd3Valid => !params.use_std3_ascii_rules,
        _ => false,
    })
}

/// DNS length limits: 1..=253 for the whole name (root label excluded),
/// 1..=63 per label.
fn dns_length_ok(domain: &str) -> bool {
    let trimmed = domain.strip_suffix('.').unwrap_or(domain);
    if trimmed.is_empty() || trimmed.len() > 253 {
        return false;
    }
    trimmed
        .split('.')
        .all(|label| !label.is_empty() && label.len() <= 63)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn to_ascii_default(domain: &str) -> ToAsciiResult {
        to_ascii(domain, &ToAsciiParams::default())
    }

    #[test]
    fn ascii_domains_pass_through_lowercased() {
        let result = to_ascii_default("Example.COM");
        assert!(!result.had_errors);
        assert_eq!(result.domain, "example.com");
    }

    #[test]
    fn keeps_trailing_root_label() {
        let result = to_ascii_default("example.com.");
        assert!(!result.had_errors);
        assert_eq!(result.domain, "example.com.");
    }

    #[test]
    fn valid_ace_labels_survive_the_decode_validate_encode_trip() {
        let result = to_ascii_default("xn--ihqwcrb4cv8a8dqg056pqjye.test");
        assert!(!result.had_errors);
        assert_eq!(result.domain, "xn--ihqwcrb4cv8a8dqg056pqjye.test");
    }

    #[test]
    fn unicode_labels_are_ace_encoded() {
        let result = to_ascii_default("他们为什么不说中文.test");
        assert!(!result.had_errors);
        assert_eq!(result.domain, "xn--ihqwcrb4cv8a8dqg056pqjye.test");

        let result = to_ascii_default("日本.jp");
        assert!(!result.had_errors);
        assert_eq!(result.domain, "xn--wgv71a.jp");
    }

    #[test]
    fn flags_invalid_ace_labels() {
        let result = to_ascii_default("xn--a-ecp.test");
        assert!(result.had_errors || !result.domain.starts_with("xn--"));

        let result = to_ascii_default("xn--!!!.test");
        assert!(result.had_errors);
        assert!(result.domain.starts_with("xn--"));
    }

    #[test]
    fn sharp_s_is_deviation() {
        let plain = to_ascii_default("faß.de");
        assert!(!plain.had_errors);
        assert_eq!(plain.domain, "xn--fa-hia.de");

        let transitional = to_ascii(
            "faß.de",
            &ToAsciiParams {
                transitional_processing: true,
                ..ToAsciiParams::default()
            },
        );
        assert!(!transitional.had_errors);
        assert_eq!(transitional.domain, "fass.de");
    }

    #[test]
    fn disallowed_code_points_flag_errors() {
        let result = to_ascii_default("exa\u{0088}mple.com");
        assert!(result.had_errors);
    }

    #[test]
    fn combining_mark_may_not_start_a_label() {
        let result = to_ascii_default("\u{0301}a.com");
        assert!(result.had_errors);
    }

    #[test]
    fn underscore_allowed_without_std3() {
        let result = to_ascii_default("foo_bar.example");
        assert!(!result.had_errors);
        assert_eq!(result.domain, "foo_bar.example");
    }

    #[test]
    fn check_hyphens_rejects_interior_double_hyphen() {
        let params = ToAsciiParams {
            check_hyphens: true,
            ..ToAsciiParams::default()
        };
        assert!(to_ascii("ab--cd.test", &params).had_errors);
        assert!(to_ascii("-leading.test", &params).had_errors);
        assert!(!to_ascii("a-b.test", &params).had_errors);
    }

    #[test]
    fn verify_dns_length_limits() {
        let params = ToAsciiParams {
            verify_dns_length: true,
            ..ToAsciiParams::default()
        };
        let long_label = "a".repeat(64);
        assert!(to_ascii(&format!("{long_label}.com"), &params).had_errors);
        assert!(!to_ascii("ok.com", &params).had_errors);
    }
}
