//! Piecewise IPv6 parsing per the WHATWG URL Standard, including embedded
//! IPv4 tails, and the compressed serializer.

use crate::error::{Diagnostics, ValidationError};
use crate::pointer::{PointedAt, Pointer};
use std::fmt::Write;

/// Parse the contents of an IPv6 bracket literal (without the brackets)
/// into eight 16-bit pieces. Fatal errors are pushed onto `errors` and
/// reported as `None`.
pub fn parse_ipv6(input: &str, errors: &mut Diagnostics) -> Option<[u16; 8]> {
    let mut pieces = [0u16; 8];
    let mut piece_index: usize = 0;
    let mut compress: Option<usize> = None;
    let mut pointer = Pointer::new(input);

    if let PointedAt::CodePoint(':') = pointer.pointed_at() {
        if !pointer.does_remaining_start_with(":") {
            errors.push(ValidationError::Ipv6InvalidCompression);
            return None;
        }
        pointer.increase(2);
        piece_index += 1;
        compress = Some(piece_index);
    }

    while let PointedAt::CodePoint(c) = pointer.pointed_at() {
        if piece_index == 8 {
            errors.push(ValidationError::Ipv6TooManyPieces);
            return None;
        }

        if c == ':' {
            if compress.is_some() {
                errors.push(ValidationError::Ipv6MultipleCompression);
                return None;
            }
            pointer.increase(1);
            piece_index += 1;
            compress = Some(piece_index);
            continue;
        }

        let mut value: u16 = 0;
        let mut length = 0;
        while length < 4 {
            let PointedAt::CodePoint(digit) = pointer.pointed_at() else {
                break;
            };
            let Some(hex) = digit.to_digit(16) else {
                break;
            };
            value = value * 0x10 + hex as u16;
            pointer.increase(1);
            length += 1;
        }

        match pointer.pointed_at() {
            PointedAt::CodePoint('.') => {
                if length == 0 {
                    errors.push(ValidationError::Ipv4InIpv6InvalidCodePoint);
                    return None;
                }
                pointer.decrease(length);
                if piece_index > 6 {
                    errors.push(ValidationError::Ipv4InIpv6TooManyPieces);
                    return None;
                }

                let mut numbers_seen = 0;
                while let PointedAt::CodePoint(c) = pointer.pointed_at() {
                    if numbers_seen > 0 {
                        if c == '.' && numbers_seen < 4 {
                            pointer.increase(1);
                        } else {
                            errors.push(ValidationError::Ipv4InIpv6InvalidCodePoint);
                            return None;
                        }
                    }

                    let PointedAt::CodePoint(first) = pointer.pointed_at() else {
                        errors.push(ValidationError::Ipv4InIpv6InvalidCodePoint);
                        return None;
                    };
                    if !first.is_ascii_digit() {
                        errors.push(ValidationError::Ipv4InIpv6InvalidCodePoint);
                        return None;
                    }

                    let mut ipv4_piece: Option<u16> = None;
                    while let PointedAt::CodePoint(digit) = pointer.pointed_at() {
                        let Some(number) = digit.to_digit(10) else {
                            break;
                        };
                        ipv4_piece = match ipv4_piece {
                            None => Some(number as u16),
                            Some(0) => {
                                errors.push(ValidationError::Ipv4InIpv6InvalidCodePoint);
                                return None;
                            }
                            Some(piece) => Some(piece * 10 + number as u16),
                        };
                        if ipv4_piece.is_some_and(|piece| piece > 255) {
                            errors.push(ValidationError::Ipv4InIpv6OutOfRangePart);
                            return None;
                        }
                        pointer.increase(1);
                    }

                    let Some(part) = ipv4_piece else {
                        errors.push(ValidationError::Ipv4InIpv6InvalidCodePoint);
                        return None;
                    };
                    pieces[piece_index] = pieces[piece_index] * 0x100 + part;
                    numbers_seen += 1;
                    if numbers_seen == 2 || numbers_seen == 4 {
                        piece_index += 1;
                    }
                }

                if numbers_seen != 4 {
                    errors.push(ValidationError::Ipv4InIpv6TooFewParts);
                    return None;
                }
                break;
            }
            PointedAt::CodePoint(':') => {
                pointer.increase(1);
                if pointer.pointed_at() == PointedAt::Eof {
                    errors.push(ValidationError::Ipv6InvalidCodePoint);
                    return None;
                }
            }
            PointedAt::CodePoint(_) => {
                errors.push(ValidationError::Ipv6InvalidCodePoint);
                return None;
            }
            PointedAt::Eof | PointedAt::Nowhere => {}
        }

        pieces[piece_index] = value;
        piece_index += 1;
    }

    if let Some(compress) = compress {
        let mut swaps = piece_index - compress;
        let mut index = 7;
        while index != 0 && swaps > 0 {
            pieces.swap(index, compress + swaps - 1);
            index -= 1;
            swaps -= 1;
        }
    } else if piece_index != 8 {
        errors.push(ValidationError::Ipv6TooFewPieces);
        return None;
    }

    Some(pieces)
}

/// Serialize eight pieces with the longest run of zero pieces (of length
/// two or more) compressed to `::`. Brackets are the host's concern.
pub fn serialize_ipv6(pieces: &[u16; 8]) -> String {
    let compress = longest_zero_run(pieces);

    let mut output = String::new();
    let mut skipping = false;

    for (index, &piece) in pieces.iter().enumerate() {
        if skipping {
            if piece == 0 {
                continue;
            }
            skipping = false;
        }

        if compress == Some(index) {
            output.push_str(if index == 0 { "::" } else { ":" });
            skipping = true;
            continue;
        }

        let _ = write!(output, "{piece:x}");
        if index != 7 {
            output.push(':');
        }
    }

    output
}

/// Start of the longest run of two or more zero pieces, if any.
fn longest_zero_run(pieces: &[u16; 8]) -> Option<usize> {
    let mut best_start = None;
    let mut best_len = 0;
    let mut current_start = None;
    let mut current_len = 0;

    for (index, &piece) in pieces.iter().enumerate() {
        if piece == 0 {
            if current_start.is_none() {
                current_start = Some(index);
            }
            current_len += 1;
            if current_len > best_len {
                best_start = current_start;
                best_len = current_len;
            }
        } else {
            current_start = None;
            current_len = 0;
        }
    }

    if best_len > 1 { best_start } else { None }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse_ok(input: &str) -> [u16; 8] {
        let mut errors = Diagnostics::new();
        parse_ipv6(input, &mut errors).unwrap()
    }

    fn parse_err(input: &str) -> Vec<ValidationError> {
        let mut errors = Diagnostics::new();
        assert!(parse_ipv6(input, &mut errors).is_none(), "{input} parsed");
        errors.into_errors()
    }

    #[test]
    fn parses_loopback_and_full_addresses() {
        assert_eq!(parse_ok("::1"), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(parse_ok("::"), [0; 8]);
        assert_eq!(
            parse_ok("2001:db8:0:0:1:0:0:1"),
            [0x2001, 0xdb8, 0, 0, 1, 0, 0, 1]
        );
        assert_eq!(
            parse_ok("1:2:3:4:5:6:7:8"),
            [1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn parses_compression_anywhere() {
        assert_eq!(parse_ok("2001:db8::1"), [0x2001, 0xdb8, 0, 0, 0, 0, 0, 1]);
        assert_eq!(parse_ok("1::"), [1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(parse_ok("1::8"), [1, 0, 0, 0, 0, 0, 0, 8]);
    }

    #[test]
    fn parses_embedded_ipv4() {
        assert_eq!(parse_ok("::127.0.0.1"), [0, 0, 0, 0, 0, 0, 0x7f00, 0x0001]);
        assert_eq!(
            parse_ok("::ffff:192.168.1.1"),
            [0, 0, 0, 0, 0, 0xffff, 0xc0a8, 0x0101]
        );
    }

    #[test]
    fn reports_compression_errors() {
        assert_eq!(
            parse_err(":1"),
            vec![ValidationError::Ipv6InvalidCompression]
        );
        assert_eq!(
            parse_err("1::2::3"),
            vec![ValidationError::Ipv6MultipleCompression]
        );
    }

    #[test]
    fn reports_piece_count_errors() {
        assert_eq!(
            parse_err("1:2:3:4:5:6:7:8:9"),
            vec![ValidationError::Ipv6TooManyPieces]
        );
        assert_eq!(
            parse_err("1:2:3"),
            vec![ValidationError::Ipv6TooFewPieces]
        );
        assert_eq!(
            parse_err("1:2:3:4:5:6:7:"),
            vec![ValidationError::Ipv6InvalidCodePoint]
        );
    }

    #[test]
    fn reports_bad_code_points() {
        assert_eq!(
            parse_err("1:2:zz::"),
            vec![ValidationError::Ipv6InvalidCodePoint]
        );
    }

    #[test]
    fn reports_embedded_ipv4_errors() {
        assert_eq!(
            parse_err("::1.2.3"),
            vec![ValidationError::Ipv4InIpv6TooFewParts]
        );
        assert_eq!(
            parse_err("::1.2.3.300"),
            vec![ValidationError::Ipv4InIpv6OutOfRangePart]
        );
        assert_eq!(
            parse_err("::1.2.3.04"),
            vec![ValidationError::Ipv4InIpv6InvalidCodePoint]
        );
        assert_eq!(
            parse_err("1:2:3:4:5:6:7:1.2.3.4"),
            vec![ValidationError::Ipv4InIpv6TooManyPieces]
        );
    }

    #[test]
    fn serializes_with_compression() {
        assert_eq!(serialize_ipv6(&[0, 0, 0, 0, 0, 0, 0, 1]), "::1");
        assert_eq!(serialize_ipv6(&[0; 8]), "::");
        assert_eq!(
            serialize_ipv6(&[0x2001, 0xdb8, 0, 0, 0, 0, 0, 1]),
            "2001:db8::1"
        );
        assert_eq!(serialize_ipv6(&[1, 0, 0, 0, 0, 0, 0, 0]), "1::");
        assert_eq!(
            serialize_ipv6(&[0, 0, 0, 0, 0, 0, 0x7f00, 1]),
            "::7f00:1"
        );
        assert_eq!(
            serialize_ipv6(&[1, 2, 3, 4, 5, 6, 7, 8]),
            "1:2:3:4:5:6:7:8"
        );
        // A lone zero piece is not compressed.
        assert_eq!(
            serialize_ipv6(&[1, 0, 2, 3, 4, 5, 6, 7]),
            "1:0:2:3:4:5:6:7"
        );
    }
}
