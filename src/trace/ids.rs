use crate::propagation::PropagationError;
use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

fn validate_hex(hex: &str, len: usize) -> Result<(), PropagationError> {
    if hex.len() != len {
        return Err(PropagationError::InvalidLength);
    }
    if !hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(PropagationError::InvalidCharacter);
    }
    Ok(())
}

/// Flags that can be set on a [`SpanContext`].
///
/// Bit 0 is the `sampled` flag defined by the [W3C TraceContext
/// specification]; the remaining bits are reserved and must be masked to
/// zero when read from a format version that does not define them.
///
/// [`SpanContext`]: crate::trace::SpanContext
/// [W3C TraceContext specification]: https://www.w3.org/TR/trace-context/#trace-flags
#[derive(Clone, Debug, Default, PartialEq, Eq, Copy, Hash)]
pub struct TraceFlags(u8);

impl TraceFlags {
    /// Trace flags with the `sampled` flag set to `0`.
    ///
    /// Spans that are not sampled will be ignored by most tracing tools.
    pub const NOT_SAMPLED: TraceFlags = TraceFlags(0x00);

    /// Trace flags with the `sampled` flag set to `1`.
    pub const SAMPLED: TraceFlags = TraceFlags(0x01);

    /// Construct new trace flags.
    pub const fn new(flags: u8) -> Self {
        TraceFlags(flags)
    }

    /// Returns `true` if the `sampled` flag is set.
    pub fn is_sampled(&self) -> bool {
        (*self & TraceFlags::SAMPLED) == TraceFlags::SAMPLED
    }

    /// Returns a copy of the current flags with the `sampled` flag updated.
    pub fn with_sampled(&self, sampled: bool) -> Self {
        if sampled {
            *self | TraceFlags::SAMPLED
        } else {
            *self & !TraceFlags::SAMPLED
        }
    }

    /// Returns the flags as a `u8`.
    pub fn to_u8(self) -> u8 {
        self.0
    }
}

impl BitAnd for TraceFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for TraceFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl Not for TraceFlags {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl fmt::LowerHex for TraceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// A 16-byte value which identifies a given trace.
///
/// The id is valid if it contains at least one non-zero byte.
#[derive(Clone, PartialEq, Eq, Copy, Hash)]
pub struct TraceId(u128);

impl TraceId {
    /// Invalid trace id.
    pub const INVALID: TraceId = TraceId(0);

    /// Create a trace id from its representation as a byte array.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        TraceId(u128::from_be_bytes(bytes))
    }

    /// Return the representation of this trace id as a byte array.
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    /// Converts a base-16 string to a trace id.
    ///
    /// The input must be exactly 32 lowercase hex characters; any other
    /// length, a non-hex character, or an uppercase digit is a failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracehop::trace::TraceId;
    ///
    /// assert!(TraceId::from_hex("4bf92f3577b34da6a3ce929d0e0e4736").is_ok());
    ///
    /// assert!(TraceId::from_hex("42").is_err());
    /// assert!(TraceId::from_hex("4BF92F3577B34DA6A3CE929D0E0E4736").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, PropagationError> {
        validate_hex(hex, 32)?;
        u128::from_str_radix(hex, 16)
            .map(TraceId)
            .map_err(|_| PropagationError::InvalidCharacter)
    }

    /// Converts a base-16 string of either 32 or 16 characters to a trace id.
    ///
    /// A 16-character input is a legacy 64-bit trace id and is left-padded
    /// with zeros to the canonical 128-bit width, so `"a3ce929d0e0e4736"`
    /// decodes to `0000000000000000a3ce929d0e0e4736`.
    pub fn from_hex_padded(hex: &str) -> Result<Self, PropagationError> {
        match hex.len() {
            16 => {
                validate_hex(hex, 16)?;
                u64::from_str_radix(hex, 16)
                    .map(|id| TraceId(id as u128))
                    .map_err(|_| PropagationError::InvalidCharacter)
            }
            _ => TraceId::from_hex(hex),
        }
    }
}

impl From<u128> for TraceId {
    fn from(value: u128) -> Self {
        TraceId(value)
    }
}

impl fmt::Debug for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:032x}", self.0))
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:032x}", self.0))
    }
}

impl fmt::LowerHex for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// An 8-byte value which identifies a given span.
///
/// The id is valid if it contains at least one non-zero byte.
#[derive(Clone, PartialEq, Eq, Copy, Hash)]
pub struct SpanId(u64);

impl SpanId {
    /// Invalid span id.
    pub const INVALID: SpanId = SpanId(0);

    /// Create a span id from its representation as a byte array.
    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        SpanId(u64::from_be_bytes(bytes))
    }

    /// Return the representation of this span id as a byte array.
    pub const fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Converts a base-16 string to a span id.
    ///
    /// The input must be exactly 16 lowercase hex characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracehop::trace::SpanId;
    ///
    /// assert!(SpanId::from_hex("00f067aa0ba902b7").is_ok());
    ///
    /// assert!(SpanId::from_hex("42").is_err());
    /// assert!(SpanId::from_hex("00F067AA0BA902B7").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, PropagationError> {
        validate_hex(hex, 16)?;
        u64::from_str_radix(hex, 16)
            .map(SpanId)
            .map_err(|_| PropagationError::InvalidCharacter)
    }
}

impl From<u64> for SpanId {
    fn from(value: u64) -> Self {
        SpanId(value)
    }
}

impl fmt::Debug for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:016x}", self.0))
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:016x}", self.0))
    }
}

impl fmt::LowerHex for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
