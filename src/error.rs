/// Fine-grained reason an IPv4 host literal was rejected.
///
/// Every one of these is, per the current WHATWG text, a validation error
/// that is immediately followed by "return failure" — so each is carried as
/// a fatal sub-reason of [`ParseError::InvalidIpv4`] rather than pushed onto
/// the non-fatal [`ValidationError`] log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ipv4Error {
    /// More than four dot-separated segments.
    MoreThanFourSegments,
    /// A segment was empty after prefix stripping (e.g. `"1..2.3"`).
    EmptyPart,
    /// A segment did not parse cleanly under its radix.
    InvalidSegmentNumber,
    /// A segment (or the last segment's fill width) exceeded its bound.
    OutOfRange,
}

impl core::fmt::Display for Ipv4Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Self::MoreThanFourSegments => "more than four IPv4 segments",
            Self::EmptyPart => "empty IPv4 segment",
            Self::InvalidSegmentNumber => "invalid IPv4 segment number",
            Self::OutOfRange => "IPv4 segment out of range",
        };
        f.write_str(msg)
    }
}

/// Errors that can occur during URL parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Invalid scheme format
    InvalidScheme,
    /// A relative reference with no base, or whose base has an opaque path
    /// and the input is not fragment-only.
    RelativeUrlWithoutBase,
    /// A `NoScheme`-state input with a cannot-be-a-base base that isn't a
    /// bare fragment.
    NotAnAbsoluteUrlWithFragment,
    /// Authority (or a special scheme) requires a host, but none was present.
    EmptyHostname,
    /// An opaque host contained a forbidden host code point.
    ForbiddenHostPoint,
    /// A host's percent-encoding could not be decoded.
    CannotDecodeHostPoint,
    /// `domain_to_ascii` rejected the hostname, or the resulting ASCII domain
    /// contained a forbidden host code point.
    DomainError,
    /// Invalid host format (opaque-host / domain catch-all not covered by a
    /// more specific variant above).
    InvalidHost,
    /// Invalid port number
    InvalidPort,
    /// Invalid IPv4 address, with the specific sub-reason.
    InvalidIpv4(Ipv4Error),
    /// Invalid IPv6 address
    InvalidIpv6,
    /// Invalid percent encoding
    InvalidPercentEncoding,
    /// IDNA processing error
    IdnaError,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidScheme => f.write_str("invalid scheme"),
            Self::RelativeUrlWithoutBase => f.write_str("relative URL without base"),
            Self::NotAnAbsoluteUrlWithFragment => {
                f.write_str("not an absolute URL with fragment")
            }
            Self::EmptyHostname => f.write_str("empty hostname"),
            Self::ForbiddenHostPoint => f.write_str("forbidden host code point"),
            Self::CannotDecodeHostPoint => f.write_str("cannot decode host code point"),
            Self::DomainError => f.write_str("domain error"),
            Self::InvalidHost => f.write_str("invalid host"),
            Self::InvalidPort => f.write_str("invalid port"),
            Self::InvalidIpv4(reason) => write!(f, "invalid IPv4 address: {reason}"),
            Self::InvalidIpv6 => f.write_str("invalid IPv6 address"),
            Self::InvalidPercentEncoding => f.write_str("invalid percent encoding"),
            Self::IdnaError => f.write_str("IDNA processing error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

/// Result type for URL parsing operations
pub type Result<T> = core::result::Result<T, ParseError>;

/// A non-fatal syntactic irregularity recorded during parsing.
///
/// Parsing continues after any of these; the caller decides whether to
/// surface them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Leading/trailing C0-control-or-space bytes were trimmed from the input.
    InvalidUrlUnit,
    /// A tab or newline byte was removed from the input.
    InvalidUrlUnitTabOrNewline,
    /// A special URL used `\` where `/` was expected; it was treated as `/`.
    InvalidReverseSolidus,
    /// Credentials were re-prefixed after a second unescaped `@`.
    InvalidCredentials,
    /// An IPv4 host had a trailing empty segment that was dropped.
    Ipv4EmptyPart,
    /// An IPv4 segment used a leading-zero (octal) or `0x` (hex) radix.
    Ipv4NonDecimalPart,
    /// A Windows drive letter appeared in a `file:` URL host position and was
    /// rewritten into the path instead.
    FileInvalidWindowsDriveLetterHost,
    /// A bare Windows drive letter (e.g. `C:`) appeared in a `file:` URL path
    /// position and was normalized into a `/C:`-style path segment.
    FileInvalidWindowsDriveLetter,
    /// A special-relative-or-authority state did not find `//` and fell back
    /// to a relative parse.
    SpecialSchemeMissingFollowingSolidus,
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Self::InvalidUrlUnit => "leading or trailing C0 control or space trimmed",
            Self::InvalidUrlUnitTabOrNewline => "tab or newline removed from input",
            Self::InvalidReverseSolidus => "backslash used where slash was expected",
            Self::InvalidCredentials => "credentials re-prefixed after a second '@'",
            Self::Ipv4EmptyPart => "trailing empty IPv4 segment dropped",
            Self::Ipv4NonDecimalPart => "IPv4 segment used octal or hexadecimal radix",
            Self::FileInvalidWindowsDriveLetterHost => {
                "Windows drive letter rewritten from host into path"
            }
            Self::FileInvalidWindowsDriveLetter => {
                "bare Windows drive letter normalized into file: path"
            }
            Self::SpecialSchemeMissingFollowingSolidus => {
                "special scheme missing following solidus"
            }
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ValidationError {}
