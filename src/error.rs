use std::fmt;
use thiserror::Error;

/// How a [`ValidationError`] affects the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recorded and parsing continues.
    Validation,
    /// Parsing aborts with [`crate::ParseOutcome::Failure`].
    Fatal,
}

/// The closed set of diagnostics the parser can emit.
///
/// Mirrors the validation-error names of the WHATWG URL Standard; callers
/// match on variants rather than parsing strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidUrlUnit(String),
    SpecialSchemeMissingFollowingSolidus,
    MissingSchemeNonRelativeUrl,
    InvalidReverseSolidus,
    InvalidCredentials,
    HostMissing,
    HostInvalidCodePoint,
    Ipv6Unclosed,
    Ipv6InvalidCompression,
    Ipv6TooManyPieces,
    Ipv6MultipleCompression,
    Ipv4InIpv6InvalidCodePoint,
    Ipv4InIpv6TooManyPieces,
    Ipv4InIpv6OutOfRangePart,
    Ipv4InIpv6TooFewParts,
    Ipv6InvalidCodePoint,
    Ipv6TooFewPieces,
    PortOutOfRange,
    PortInvalid,
    FileInvalidWindowsDriveLetter,
    FileInvalidWindowsDriveLetterHost,
    DomainToAscii,
    DomainInvalidCodePoint,
}

impl ValidationError {
    pub fn severity(&self) -> Severity {
        match self {
            ValidationError::MissingSchemeNonRelativeUrl
            | ValidationError::HostMissing
            | ValidationError::HostInvalidCodePoint
            | ValidationError::Ipv6Unclosed
            | ValidationError::Ipv6InvalidCompression
            | ValidationError::Ipv6TooManyPieces
            | ValidationError::Ipv6MultipleCompression
            | ValidationError::Ipv4InIpv6InvalidCodePoint
            | ValidationError::Ipv4InIpv6TooManyPieces
            | ValidationError::Ipv4InIpv6OutOfRangePart
            | ValidationError::Ipv4InIpv6TooFewParts
            | ValidationError::Ipv6InvalidCodePoint
            | ValidationError::Ipv6TooFewPieces
            | ValidationError::PortOutOfRange
            | ValidationError::PortInvalid
            | ValidationError::DomainToAscii
            | ValidationError::DomainInvalidCodePoint => Severity::Fatal,

            ValidationError::InvalidUrlUnit(_)
            | ValidationError::SpecialSchemeMissingFollowingSolidus
            | ValidationError::InvalidReverseSolidus
            | ValidationError::InvalidCredentials
            | ValidationError::FileInvalidWindowsDriveLetter
            | ValidationError::FileInvalidWindowsDriveLetterHost => Severity::Validation,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidUrlUnit(detail) => {
                write!(f, "invalid-URL-unit: {detail}")
            }
            ValidationError::SpecialSchemeMissingFollowingSolidus => {
                f.write_str("special-scheme-missing-following-solidus")
            }
            ValidationError::MissingSchemeNonRelativeUrl => {
                f.write_str("missing-scheme-non-relative-URL")
            }
            ValidationError::InvalidReverseSolidus => f.write_str("invalid-reverse-solidus"),
            ValidationError::InvalidCredentials => f.write_str("invalid-credentials"),
            ValidationError::HostMissing => f.write_str("host-missing"),
            ValidationError::HostInvalidCodePoint => f.write_str("host-invalid-code-point"),
            ValidationError::Ipv6Unclosed => f.write_str("IPv6-unclosed"),
            ValidationError::Ipv6InvalidCompression => f.write_str("IPv6-invalid-compression"),
            ValidationError::Ipv6TooManyPieces => f.write_str("IPv6-too-many-pieces"),
            ValidationError::Ipv6MultipleCompression => f.write_str("IPv6-multiple-compression"),
            ValidationError::Ipv4InIpv6InvalidCodePoint => {
                f.write_str("IPv4-in-IPv6-invalid-code-point")
            }
            ValidationError::Ipv4InIpv6TooManyPieces => f.write_str("IPv4-in-IPv6-too-many-pieces"),
            ValidationError::Ipv4InIpv6OutOfRangePart => {
                f.write_str("IPv4-in-IPv6-out-of-range-part")
            }
            ValidationError::Ipv4InIpv6TooFewParts => f.write_str("IPv4-in-IPv6-too-few-parts"),
            ValidationError::Ipv6InvalidCodePoint => f.write_str("IPv6-invalid-code-point"),
            ValidationError::Ipv6TooFewPieces => f.write_str("IPv6-too-few-pieces"),
            ValidationError::PortOutOfRange => f.write_str("port-out-of-range"),
            ValidationError::PortInvalid => f.write_str("port-invalid"),
            ValidationError::FileInvalidWindowsDriveLetter => {
                f.write_str("file-invalid-Windows-drive-letter")
            }
            ValidationError::FileInvalidWindowsDriveLetterHost => {
                f.write_str("file-invalid-Windows-drive-letter-host")
            }
            ValidationError::DomainToAscii => f.write_str("domain-to-ASCII"),
            ValidationError::DomainInvalidCodePoint => f.write_str("domain-invalid-code-point"),
        }
    }
}

/// Accumulator for validation errors across the parser and host parser.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<ValidationError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

/// Fatal parse failure, carrying the original input and every diagnostic
/// accumulated up to the point the parse aborted.
///
/// This is the error half of the `Result` adapter over
/// [`crate::ParseOutcome`]; the outcome itself reports failure as a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid URL {input:?}: {}", summary(.errors))]
pub struct ParseError {
    pub input: String,
    pub errors: Vec<ValidationError>,
}

fn summary(errors: &[ValidationError]) -> String {
    let parts: Vec<String> = errors.iter().map(ToString::to_string).collect();
    parts.join(", ")
}
