use crate::character_sets::{C0_CONTROL, FORBIDDEN_DOMAIN, FORBIDDEN_HOST};
use crate::checkers::{ends_in_a_number, is_url_code_point};
use crate::error::{Diagnostics, ValidationError};
use crate::host::{Host, IpAddress};
use crate::ipv4::parse_ipv4;
use crate::ipv6::parse_ipv6;
use crate::unicode::idna::{self, ToAsciiParams};
use crate::unicode::percent_encode::{percent_decode, utf8_percent_encode};

/// Parse a host string captured by the URL parser. `is_opaque` is set for
/// non-special schemes. Fatal errors land in `errors` and yield `None`.
pub fn parse_host(input: &str, is_opaque: bool, errors: &mut Diagnostics) -> Option<Host> {
    if input.starts_with('[') {
        if !input.ends_with(']') {
            errors.push(ValidationError::Ipv6Unclosed);
            return None;
        }
        let pieces = parse_ipv6(&input[1..input.len() - 1], errors)?;
        return Some(Host::Ip(IpAddress::V6(pieces)));
    }

    if is_opaque {
        return parse_opaque(input, errors).map(Host::Opaque);
    }

    let decoded = percent_decode(input);
    let result = idna::to_ascii(
        &decoded,
        &ToAsciiParams {
            check_bidi: true,
            ..ToAsciiParams::default()
        },
    );
    if result.had_errors || result.domain.is_empty() {
        errors.push(ValidationError::DomainToAscii);
        return None;
    }

    let ascii = result.domain;
    if ascii.chars().any(|c| FORBIDDEN_DOMAIN.contains(c)) {
        errors.push(ValidationError::DomainInvalidCodePoint);
        return None;
    }

    if ends_in_a_number(&ascii) {
        if let Ok(address) = parse_ipv4(&ascii) {
            return Some(Host::Ip(IpAddress::V4(address)));
        }
    }

    Some(Host::Domain(ascii))
}

/// Opaque hosts keep their text, C0-control percent-encoded. Forbidden host
/// code points are fatal; everything else at most warns.
fn parse_opaque(input: &str, errors: &mut Diagnostics) -> Option<String> {
    for c in input.chars() {
        if FORBIDDEN_HOST.contains(c) {
            errors.push(ValidationError::HostInvalidCodePoint);
            return None;
        }
    }

    let chars: Vec<char> = input.chars().collect();
    for (index, &c) in chars.iter().enumerate() {
        if !is_url_code_point(c) && c != '%' {
            errors.push(ValidationError::InvalidUrlUnit(c.to_string()));
        }
        if c == '%' {
            let valid_escape = matches!(
                (chars.get(index + 1), chars.get(index + 2)),
                (Some(high), Some(low)) if high.is_ascii_hexdigit() && low.is_ascii_hexdigit()
            );
            if !valid_escape {
                errors.push(ValidationError::InvalidUrlUnit("unexpected %".into()));
            }
        }
    }

    Some(utf8_percent_encode(input, &C0_CONTROL))
}
