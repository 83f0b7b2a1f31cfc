use super::state::State;
use crate::character_sets::{C0_CONTROL, FRAGMENT, PATH, QUERY, SPECIAL_QUERY, USERINFO};
use crate::checkers::{
    is_ascii_tab_or_newline, is_c0_control_or_space, is_normalized_windows_drive_letter,
    is_url_code_point, is_windows_drive_letter,
};
use crate::error::{Diagnostics, ValidationError};
use crate::host::Host;
use crate::host_parser::parse_host;
use crate::path::UrlPath;
use crate::pointer::{PointedAt, Pointer};
use crate::scheme::SchemeType;
use crate::unicode::percent_encode::{
    utf8_percent_encode, utf8_percent_encode_char, utf8_percent_encode_char_into,
};
use crate::url::{ParseOutcome, Url};
use std::borrow::Cow;

/// Run the automaton over `input`, resolving against `base` when given.
pub fn run(input: &str, base: Option<&Url>) -> ParseOutcome {
    let mut errors = Diagnostics::new();
    let cleaned = remove_control_and_whitespace(input, &mut errors);

    match parse_cleaned(&cleaned, base, &mut errors) {
        Some(url) => {
            if errors.is_empty() {
                ParseOutcome::Success(url)
            } else {
                ParseOutcome::SuccessWithWarnings(url, errors.into_errors())
            }
        }
        None => ParseOutcome::Failure(errors.into_errors()),
    }
}

/// Strip a leading and trailing run of C0 controls and spaces, then remove
/// interior tabs, newlines and form feeds, flagging each once.
fn remove_control_and_whitespace<'a>(input: &'a str, errors: &mut Diagnostics) -> Cow<'a, str> {
    let trimmed = input.trim_matches(is_c0_control_or_space);
    if trimmed.len() != input.len() {
        errors.push(ValidationError::InvalidUrlUnit(
            "leading or trailing C0 control or space".into(),
        ));
    }

    if !has_tab_or_newline(trimmed) {
        return Cow::Borrowed(trimmed);
    }

    errors.push(ValidationError::InvalidUrlUnit("tab or newline".into()));
    Cow::Owned(
        trimmed
            .chars()
            .filter(|&c| !is_ascii_tab_or_newline(c))
            .collect(),
    )
}

fn has_tab_or_newline(input: &str) -> bool {
    let bytes = input.as_bytes();
    memchr::memchr3(b'\t', b'\n', b'\r', bytes).is_some() || memchr::memchr(0x0C, bytes).is_some()
}

/// EOF or a component-terminating code point (`\` only terminates for
/// special schemes).
fn at_component_end(pointed: PointedAt, is_special: bool) -> bool {
    match pointed {
        PointedAt::Eof => true,
        PointedAt::CodePoint(c) => matches!(c, '/' | '?' | '#') || (is_special && c == '\\'),
        PointedAt::Nowhere => false,
    }
}

fn is_single_dot(buffer: &str) -> bool {
    buffer == "." || buffer.eq_ignore_ascii_case("%2e")
}

fn is_double_dot(buffer: &str) -> bool {
    buffer == ".."
        || buffer.eq_ignore_ascii_case(".%2e")
        || buffer.eq_ignore_ascii_case("%2e.")
        || buffer.eq_ignore_ascii_case("%2e%2e")
}

/// One step per code point; states call `decrease` to reprocess the current
/// code point in their successor, and the loop advances the cursor after
/// every state body until it rests at EOF.
fn parse_cleaned(input: &str, base: Option<&Url>, errors: &mut Diagnostics) -> Option<Url> {
    let mut state = State::SchemeStart;
    let mut buffer = String::new();
    let mut at_sign_seen = false;
    let mut inside_brackets = false;
    let mut password_token_seen = false;
    let mut pointer = Pointer::new(input);

    let mut scheme = String::new();
    let mut scheme_type = SchemeType::NotSpecial;
    let mut username = String::new();
    let mut password = String::new();
    let mut host: Option<Host> = None;
    let mut port: Option<u16> = None;
    let mut path = UrlPath::empty();
    let mut query: Option<String> = None;
    let mut fragment: Option<String> = None;

    loop {
        match state {
            State::SchemeStart => match pointer.pointed_at() {
                PointedAt::CodePoint(c) if c.is_ascii_alphabetic() => {
                    buffer.push(c.to_ascii_lowercase());
                    state = State::Scheme;
                }
                _ => {
                    state = State::NoScheme;
                    pointer.decrease(1);
                }
            },

            State::Scheme => match pointer.pointed_at() {
                PointedAt::CodePoint(c)
                    if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') =>
                {
                    buffer.push(c.to_ascii_lowercase());
                }
                PointedAt::CodePoint(':') => {
                    scheme = std::mem::take(&mut buffer);
                    scheme_type = SchemeType::from_scheme(&scheme);

                    if scheme == "file" {
                        if !pointer.does_remaining_start_with("//") {
                            errors.push(ValidationError::SpecialSchemeMissingFollowingSolidus);
                        }
                        state = State::File;
                    } else if scheme_type.is_special()
                        && base.is_some_and(|b| b.scheme == scheme)
                    {
                        state = State::SpecialRelativeOrAuthority;
                    } else if scheme_type.is_special() {
                        state = State::SpecialAuthoritySlashes;
                    } else if pointer.does_remaining_start_with("/") {
                        state = State::PathOrAuthority;
                        pointer.increase(1);
                    } else {
                        path = UrlPath::Opaque(String::new());
                        state = State::OpaquePath;
                    }
                }
                _ => {
                    buffer.clear();
                    state = State::NoScheme;
                    pointer.reset();
                    pointer.decrease(1);
                }
            },

            State::NoScheme => {
                let Some(b) = base else {
                    errors.push(ValidationError::MissingSchemeNonRelativeUrl);
                    return None;
                };
                let at_hash = matches!(pointer.pointed_at(), PointedAt::CodePoint('#'));

                if b.path.is_opaque() && !at_hash {
                    errors.push(ValidationError::MissingSchemeNonRelativeUrl);
                    return None;
                } else if b.path.is_opaque() {
                    scheme = b.scheme.clone();
                    scheme_type = SchemeType::from_scheme(&scheme);
                    path = b.path.clone();
                    query = b.query.clone();
                    fragment = Some(String::new());
                    state = State::Fragment;
                } else if b.scheme != "file" {
                    state = State::Relative;
                    pointer.decrease(1);
                } else {
                    state = State::File;
                    pointer.decrease(1);
                }
            }

            State::SpecialRelativeOrAuthority => {
                if matches!(pointer.pointed_at(), PointedAt::CodePoint('/'))
                    && pointer.does_remaining_start_with("/")
                {
                    state = State::SpecialAuthorityIgnoreSlashes;
                    pointer.increase(1);
                } else {
                    errors.push(ValidationError::SpecialSchemeMissingFollowingSolidus);
                    state = State::Relative;
                    pointer.decrease(1);
                }
            }

            State::PathOrAuthority => {
                if matches!(pointer.pointed_at(), PointedAt::CodePoint('/')) {
                    state = State::Authority;
                } else {
                    state = State::Path;
                    pointer.decrease(1);
                }
            }

            State::Relative => {
                let Some(b) = base else {
                    errors.push(ValidationError::MissingSchemeNonRelativeUrl);
                    return None;
                };
                scheme = b.scheme.clone();
                scheme_type = SchemeType::from_scheme(&scheme);

                match pointer.pointed_at() {
                    PointedAt::CodePoint('/') => state = State::RelativeSlash,
                    PointedAt::CodePoint('\\') if scheme_type.is_special() => {
                        errors.push(ValidationError::InvalidReverseSolidus);
                        state = State::RelativeSlash;
                    }
                    pointed => {
                        username = b.username.clone();
                        password = b.password.clone();
                        host = b.host.clone();
                        port = b.port;
                        path = b.path.clone();
                        query = b.query.clone();

                        match pointed {
                            PointedAt::CodePoint('?') => {
                                query = Some(String::new());
                                state = State::Query;
                            }
                            PointedAt::CodePoint('#') => {
                                fragment = Some(String::new());
                                state = State::Fragment;
                            }
                            PointedAt::CodePoint(_) => {
                                query = None;
                                path.shorten(&scheme);
                                state = State::Path;
                                pointer.decrease(1);
                            }
                            _ => {}
                        }
                    }
                }
            }

            State::RelativeSlash => {
                let pointed = pointer.pointed_at();
                if scheme_type.is_special()
                    && matches!(pointed, PointedAt::CodePoint('/' | '\\'))
                {
                    if matches!(pointed, PointedAt::CodePoint('\\')) {
                        errors.push(ValidationError::InvalidReverseSolidus);
                    }
                    state = State::SpecialAuthorityIgnoreSlashes;
                } else if matches!(pointed, PointedAt::CodePoint('/')) {
                    state = State::Authority;
                } else {
                    let Some(b) = base else {
                        errors.push(ValidationError::MissingSchemeNonRelativeUrl);
                        return None;
                    };
                    username = b.username.clone();
                    password = b.password.clone();
                    host = b.host.clone();
                    port = b.port;
                    state = State::Path;
                    pointer.decrease(1);
                }
            }

            State::SpecialAuthoritySlashes => {
                if matches!(pointer.pointed_at(), PointedAt::CodePoint('/'))
                    && pointer.does_remaining_start_with("/")
                {
                    state = State::SpecialAuthorityIgnoreSlashes;
                    pointer.increase(1);
                } else {
                    errors.push(ValidationError::SpecialSchemeMissingFollowingSolidus);
                    state = State::SpecialAuthorityIgnoreSlashes;
                    pointer.decrease(1);
                }
            }

            State::SpecialAuthorityIgnoreSlashes => {
                if !matches!(pointer.pointed_at(), PointedAt::CodePoint('/' | '\\')) {
                    state = State::Authority;
                    pointer.decrease(1);
                } else {
                    errors.push(ValidationError::SpecialSchemeMissingFollowingSolidus);
                }
            }

            State::Authority => {
                let pointed = pointer.pointed_at();
                match pointed {
                    PointedAt::CodePoint('@') => {
                        errors.push(ValidationError::InvalidCredentials);
                        if at_sign_seen {
                            buffer.insert_str(0, "%40");
                        }
                        at_sign_seen = true;

                        for c in buffer.chars() {
                            if c == ':' && !password_token_seen {
                                password_token_seen = true;
                                continue;
                            }
                            let target = if password_token_seen {
                                &mut password
                            } else {
                                &mut username
                            };
                            utf8_percent_encode_char_into(target, c, &USERINFO);
                        }
                        buffer.clear();
                    }
                    _ if at_component_end(pointed, scheme_type.is_special()) => {
                        if at_sign_seen && buffer.is_empty() {
                            errors.push(ValidationError::HostMissing);
                            return None;
                        }
                        let consumed = buffer.chars().count();
                        pointer.decrease(consumed + 1);
                        buffer.clear();
                        state = State::Host;
                    }
                    PointedAt::CodePoint(c) => buffer.push(c),
                    _ => {}
                }
            }

            State::Host | State::Hostname => {
                let pointed = pointer.pointed_at();
                if matches!(pointed, PointedAt::CodePoint(':')) && !inside_brackets {
                    if buffer.is_empty() {
                        errors.push(ValidationError::HostMissing);
                        return None;
                    }
                    host = Some(parse_host(&buffer, !scheme_type.is_special(), errors)?);
                    buffer.clear();
                    state = State::Port;
                } else if at_component_end(pointed, scheme_type.is_special()) {
                    pointer.decrease(1);
                    if scheme_type.is_special() && buffer.is_empty() {
                        errors.push(ValidationError::HostMissing);
                        return None;
                    }
                    host = Some(parse_host(&buffer, !scheme_type.is_special(), errors)?);
                    buffer.clear();
                    state = State::PathStart;
                } else if let PointedAt::CodePoint(c) = pointed {
                    if c == '[' {
                        inside_brackets = true;
                    }
                    if c == ']' {
                        inside_brackets = false;
                    }
                    buffer.push(c);
                }
            }

            State::Port => {
                let pointed = pointer.pointed_at();
                match pointed {
                    PointedAt::CodePoint(c) if c.is_ascii_digit() => buffer.push(c),
                    _ if at_component_end(pointed, scheme_type.is_special()) => {
                        if !buffer.is_empty() {
                            let number = match buffer.parse::<u32>() {
                                Ok(number) if number <= u32::from(u16::MAX) => number as u16,
                                _ => {
                                    errors.push(ValidationError::PortOutOfRange);
                                    return None;
                                }
                            };
                            port = if scheme_type.default_port() == Some(number) {
                                None
                            } else {
                                Some(number)
                            };
                            buffer.clear();
                        }
                        state = State::PathStart;
                        pointer.decrease(1);
                    }
                    _ => {
                        errors.push(ValidationError::PortInvalid);
                        return None;
                    }
                }
            }

            State::File => {
                scheme = "file".into();
                scheme_type = SchemeType::File;
                host = Some(Host::Empty);

                match pointer.pointed_at() {
                    PointedAt::CodePoint(c @ ('/' | '\\')) => {
                        if c == '\\' {
                            errors.push(ValidationError::InvalidReverseSolidus);
                        }
                        state = State::FileSlash;
                    }
                    pointed => {
                        if let Some(b) = base.filter(|b| b.scheme == "file") {
                            host = b.host.clone();
                            path = b.path.clone();
                            query = b.query.clone();

                            match pointed {
                                PointedAt::CodePoint('?') => {
                                    query = Some(String::new());
                                    state = State::Query;
                                }
                                PointedAt::CodePoint('#') => {
                                    fragment = Some(String::new());
                                    state = State::Fragment;
                                }
                                PointedAt::CodePoint(_) => {
                                    query = None;
                                    if !pointer.does_remaining_start_with_windows_drive_letter() {
                                        path.shorten(&scheme);
                                    } else {
                                        errors.push(
                                            ValidationError::FileInvalidWindowsDriveLetter,
                                        );
                                        path = UrlPath::empty();
                                    }
                                    state = State::Path;
                                    pointer.decrease(1);
                                }
                                _ => {}
                            }
                        } else {
                            state = State::Path;
                            pointer.decrease(1);
                        }
                    }
                }
            }

            State::FileSlash => match pointer.pointed_at() {
                PointedAt::CodePoint(c @ ('/' | '\\')) => {
                    if c == '\\' {
                        errors.push(ValidationError::InvalidReverseSolidus);
                    }
                    state = State::FileHost;
                }
                _ => {
                    if let Some(b) = base.filter(|b| b.scheme == "file") {
                        host = b.host.clone();
                        if !pointer.does_remaining_start_with_windows_drive_letter() {
                            if let Some(first) = b.path.segments().and_then(<[String]>::first) {
                                if is_normalized_windows_drive_letter(first) {
                                    path.append(first);
                                }
                            }
                        }
                    }
                    state = State::Path;
                    pointer.decrease(1);
                }
            },

            State::FileHost => {
                let pointed = pointer.pointed_at();
                match pointed {
                    PointedAt::Eof | PointedAt::CodePoint('/' | '\\' | '?' | '#') => {
                        pointer.decrease(1);

                        if is_windows_drive_letter(&buffer) {
                            errors.push(ValidationError::FileInvalidWindowsDriveLetterHost);
                            state = State::Path;
                        } else if buffer.is_empty() {
                            host = Some(Host::Empty);
                            state = State::PathStart;
                        } else {
                            let parsed =
                                parse_host(&buffer, !scheme_type.is_special(), errors)?;
                            host = Some(match parsed {
                                Host::Domain(domain) if domain == "localhost" => Host::Empty,
                                other => other,
                            });
                            buffer.clear();
                            state = State::PathStart;
                        }
                    }
                    PointedAt::CodePoint(c) => buffer.push(c),
                    PointedAt::Nowhere => {}
                }
            }

            State::PathStart => {
                if scheme_type.is_special() {
                    let pointed = pointer.pointed_at();
                    if matches!(pointed, PointedAt::CodePoint('\\')) {
                        errors.push(ValidationError::InvalidReverseSolidus);
                    }
                    state = State::Path;
                    if !matches!(pointed, PointedAt::CodePoint('/' | '\\')) {
                        pointer.decrease(1);
                    }
                } else {
                    match pointer.pointed_at() {
                        PointedAt::CodePoint('?') => {
                            query = Some(String::new());
                            state = State::Query;
                        }
                        PointedAt::CodePoint('#') => {
                            fragment = Some(String::new());
                            state = State::Fragment;
                        }
                        PointedAt::CodePoint(c) => {
                            state = State::Path;
                            if c != '/' {
                                pointer.decrease(1);
                            }
                        }
                        _ => {}
                    }
                }
            }

            State::Path => {
                let pointed = pointer.pointed_at();
                let special = scheme_type.is_special();
                let slash_ahead = matches!(pointed, PointedAt::CodePoint('/'))
                    || (special && matches!(pointed, PointedAt::CodePoint('\\')));
                let ends_segment = matches!(pointed, PointedAt::Eof)
                    || slash_ahead
                    || matches!(pointed, PointedAt::CodePoint('?' | '#'));

                if ends_segment {
                    if special && matches!(pointed, PointedAt::CodePoint('\\')) {
                        errors.push(ValidationError::InvalidReverseSolidus);
                    }

                    if is_double_dot(&buffer) {
                        path.shorten(&scheme);
                        if !slash_ahead {
                            path.append("");
                        }
                    } else if is_single_dot(&buffer) {
                        if !slash_ahead {
                            path.append("");
                        }
                    } else {
                        if scheme == "file"
                            && path.segments().is_some_and(<[String]>::is_empty)
                            && is_windows_drive_letter(&buffer)
                        {
                            // Normalize the drive-letter separator to `:`.
                            buffer.truncate(1);
                            buffer.push(':');
                        }
                        path.append(&buffer);
                    }
                    buffer.clear();

                    match pointed {
                        PointedAt::CodePoint('?') => {
                            query = Some(String::new());
                            state = State::Query;
                        }
                        PointedAt::CodePoint('#') => {
                            fragment = Some(String::new());
                            state = State::Fragment;
                        }
                        _ => {}
                    }
                } else if let PointedAt::CodePoint(c) = pointed {
                    if !is_url_code_point(c) && c != '%' {
                        errors.push(ValidationError::InvalidUrlUnit(c.to_string()));
                    }
                    if c == '%' && !pointer.does_remaining_start_with("%d%d") {
                        errors.push(ValidationError::InvalidUrlUnit("unexpected %".into()));
                    }
                    utf8_percent_encode_char_into(&mut buffer, c, &PATH);
                }
            }

            State::OpaquePath => match pointer.pointed_at() {
                PointedAt::CodePoint('?') => {
                    query = Some(String::new());
                    state = State::Query;
                }
                PointedAt::CodePoint('#') => {
                    fragment = Some(String::new());
                    state = State::Fragment;
                }
                PointedAt::CodePoint(c) => {
                    if !is_url_code_point(c) && c != '%' {
                        errors.push(ValidationError::InvalidUrlUnit(c.to_string()));
                    }
                    if c == '%' && !pointer.does_remaining_start_with("%d%d") {
                        errors.push(ValidationError::InvalidUrlUnit("unexpected %".into()));
                    }
                    path.append(&utf8_percent_encode_char(c, &C0_CONTROL));
                }
                _ => {}
            },

            State::Query => {
                let pointed = pointer.pointed_at();
                match pointed {
                    PointedAt::Eof | PointedAt::CodePoint('#') => {
                        let set = if scheme_type.is_special() {
                            &SPECIAL_QUERY
                        } else {
                            &QUERY
                        };
                        let encoded = utf8_percent_encode(&buffer, set);
                        query.get_or_insert_with(String::new).push_str(&encoded);
                        buffer.clear();

                        if matches!(pointed, PointedAt::CodePoint('#')) {
                            fragment = Some(String::new());
                            state = State::Fragment;
                        }
                    }
                    PointedAt::CodePoint(c) => {
                        if !is_url_code_point(c) && c != '%' {
                            errors.push(ValidationError::InvalidUrlUnit(c.to_string()));
                        }
                        if c == '%' && !pointer.does_remaining_start_with("%d%d") {
                            errors.push(ValidationError::InvalidUrlUnit("unexpected %".into()));
                        }
                        buffer.push(c);
                    }
                    PointedAt::Nowhere => {}
                }
            }

            State::Fragment => {
                if let PointedAt::CodePoint(c) = pointer.pointed_at() {
                    if !is_url_code_point(c) && c != '%' {
                        errors.push(ValidationError::InvalidUrlUnit(c.to_string()));
                    }
                    if c == '%' && !pointer.does_remaining_start_with("%d%d") {
                        errors.push(ValidationError::InvalidUrlUnit("unexpected %".into()));
                    }
                    let target = fragment.get_or_insert_with(String::new);
                    utf8_percent_encode_char_into(target, c, &FRAGMENT);
                }
            }
        }

        if matches!(pointer.pointed_at(), PointedAt::Eof) {
            break;
        }
        pointer.increase(1);
    }

    Some(Url {
        scheme,
        username,
        password,
        host,
        port,
        path,
        query,
        fragment,
    })
}
