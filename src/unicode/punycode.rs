//! Bootstring encoding for internationalized domain labels (RFC 3492).
//!
//! All delta arithmetic is checked; an input that would overflow the
//! accumulators yields [`PunycodeError::Overflow`] instead of wrapping.

const BASE: u32 = 36;
const T_MIN: u32 = 1;
const T_MAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 0x80;
const DELIMITER: char = '-';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunycodeError {
    /// A delta computation exceeded the accumulator range.
    Overflow,
    /// An extension character is not a base-36 digit.
    InvalidDigit,
    /// The input ended in the middle of a variable-length integer.
    UnexpectedEnd,
    /// A non-basic code point appeared before the last delimiter.
    NonBasicCodePoint,
    /// A decoded value is not a Unicode scalar value.
    InvalidCodePoint,
}

/// Encode `label` per the RFC 3492 procedure: basic code points first in
/// order, a delimiter when any were present, then the non-basic code points
/// in ascending value order as generalized variable-length integers.
pub fn encode(label: &str) -> Result<String, PunycodeError> {
    let code_points: Vec<char> = label.chars().collect();

    let mut n = INITIAL_N;
    let mut delta: u32 = 0;
    let mut bias = INITIAL_BIAS;
    let mut output = String::with_capacity(label.len());

    let mut basic_count = 0usize;
    for &c in &code_points {
        if (c as u32) <= 0x7F {
            output.push(c);
            basic_count += 1;
        }
    }
    if basic_count > 0 {
        output.push(DELIMITER);
    }

    let mut handled = basic_count;
    while handled < code_points.len() {
        let m = code_points
            .iter()
            .map(|&c| c as u32)
            .filter(|&cp| cp >= n)
            .min()
            .ok_or(PunycodeError::Overflow)?;

        let advance = (m - n)
            .checked_mul(handled as u32 + 1)
            .ok_or(PunycodeError::Overflow)?;
        delta = delta.checked_add(advance).ok_or(PunycodeError::Overflow)?;
        n = m;

        for &c in &code_points {
            let cp = c as u32;
            if cp < n {
                delta = delta.checked_add(1).ok_or(PunycodeError::Overflow)?;
            }
            if cp == n {
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = threshold(k, bias);
                    if q < t {
                        break;
                    }
                    let digit = t + (q - t) % (BASE - t);
                    output.push(digit_to_char(digit));
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }

                output.push(digit_to_char(q));
                bias = adapt(delta, handled as u32 + 1, handled == basic_count);
                delta = 0;
                handled += 1;
            }
        }

        delta = delta.checked_add(1).ok_or(PunycodeError::Overflow)?;
        n = n.checked_add(1).ok_or(PunycodeError::Overflow)?;
    }

    Ok(output)
}

/// Decode `label` per RFC 3492: everything before the last delimiter is
/// copied verbatim (and must be basic); each extension decodes to an
/// insertion position and code point.
pub fn decode(label: &str) -> Result<String, PunycodeError> {
    let (basic, extended) = match label.rfind(DELIMITER) {
        Some(pos) => (&label[..pos], &label[pos + 1..]),
        None => ("", label),
    };

    let mut output: Vec<char> = Vec::with_capacity(label.len());
    for c in basic.chars() {
        if (c as u32) > 0x7F {
            return Err(PunycodeError::NonBasicCodePoint);
        }
        output.push(c);
    }

    let mut n = INITIAL_N;
    let mut i: u32 = 0;
    let mut bias = INITIAL_BIAS;
    let mut rest = extended.chars().peekable();

    while rest.peek().is_some() {
        let old_i = i;
        let mut weight: u32 = 1;
        let mut k = BASE;

        loop {
            let c = rest.next().ok_or(PunycodeError::UnexpectedEnd)?;
            let digit = digit_value(c).ok_or(PunycodeError::InvalidDigit)?;

            let step = digit.checked_mul(weight).ok_or(PunycodeError::Overflow)?;
            i = i.checked_add(step).ok_or(PunycodeError::Overflow)?;

            let t = threshold(k, bias);
            if digit < t {
                break;
            }
            weight = weight.checked_mul(BASE - t).ok_or(PunycodeError::Overflow)?;
            k += BASE;
        }

        let len_plus_one = output.len() as u32 + 1;
        bias = adapt(i - old_i, len_plus_one, old_i == 0);
        n = n
            .checked_add(i / len_plus_one)
            .ok_or(PunycodeError::Overflow)?;
        i %= len_plus_one;

        let c = char::from_u32(n).ok_or(PunycodeError::InvalidCodePoint)?;
        output.insert(i as usize, c);
        i += 1;
    }

    Ok(output.into_iter().collect())
}

/// The clamped digit threshold for position `k`.
fn threshold(k: u32, bias: u32) -> u32 {
    if k <= bias {
        T_MIN
    } else {
        (k - bias).min(T_MAX)
    }
}

fn digit_to_char(digit: u32) -> char {
    debug_assert!(digit < BASE);
    if digit <= 25 {
        (b'a' + digit as u8) as char
    } else {
        (b'0' + (digit - 26) as u8) as char
    }
}

fn digit_value(c: char) -> Option<u32> {
    match c {
        'A'..='Z' => Some(c as u32 - 'A' as u32),
        'a'..='z' => Some(c as u32 - 'a' as u32),
        '0'..='9' => Some(c as u32 - '0' as u32 + 26),
        _ => None,
    }
}

/// Bias adaptation after each delta (RFC 3492 §6.1).
fn adapt(delta: u32, num_points: u32, first_time: bool) -> u32 {
    let mut delta = if first_time { delta / DAMP } else { delta / 2 };
    delta += delta / num_points;

    let mut k = 0;
    while delta > ((BASE - T_MIN) * T_MAX) / 2 {
        delta /= BASE - T_MIN;
        k += BASE;
    }
    k + ((BASE - T_MIN + 1) * delta) / (delta + SKEW)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ARABIC: &str = "\u{644}\u{64A}\u{647}\u{645}\u{627}\u{628}\u{62A}\u{643}\u{644}\u{645}\u{648}\u{634}\u{639}\u{631}\u{628}\u{64A}\u{61F}";
    const CHINESE: &str = "他们为什么不说中文";
    const CZECH: &str = "Pročprostěnemluvíčesky";
    const SPANISH: &str = "PorquénopuedensimplementehablarenEspañol";

    #[test]
    fn encodes_rfc_sample_strings() {
        assert_eq!(encode(ARABIC).unwrap(), "egbpdaj6bu4bxfgehfvwxn");
        assert_eq!(encode(CHINESE).unwrap(), "ihqwcrb4cv8a8dqg056pqjye");
        assert_eq!(encode(CZECH).unwrap(), "Proprostnemluvesky-uyb24dma41a");
        assert_eq!(
            encode(SPANISH).unwrap(),
            "PorqunopuedensimplementehablarenEspaol-fmd56a"
        );
    }

    #[test]
    fn decodes_rfc_sample_strings() {
        assert_eq!(decode("egbpdaj6bu4bxfgehfvwxn").unwrap(), ARABIC);
        assert_eq!(decode("ihqwcrb4cv8a8dqg056pqjye").unwrap(), CHINESE);
        assert_eq!(decode("Proprostnemluvesky-uyb24dma41a").unwrap(), CZECH);
        assert_eq!(
            decode("PorqunopuedensimplementehablarenEspaol-fmd56a").unwrap(),
            SPANISH
        );
    }

    #[test]
    fn round_trips_all_basic_labels() {
        assert_eq!(encode("plain").unwrap(), "plain-");
        assert_eq!(decode("plain-").unwrap(), "plain");
        assert_eq!(encode("").unwrap(), "");
        assert_eq!(decode("").unwrap(), "");
    }

    #[test]
    fn round_trips_supplementary_plane() {
        let label = "a\u{10400}b";
        let encoded = encode(label).unwrap();
        assert_eq!(decode(&encoded).unwrap(), label);
    }

    #[test]
    fn rejects_invalid_extensions() {
        assert_eq!(decode("\u{e9}x-ab"), Err(PunycodeError::NonBasicCodePoint));
        assert_eq!(decode("foo-!"), Err(PunycodeError::InvalidDigit));
        assert_eq!(
            decode("999999999b"),
            Err(PunycodeError::Overflow)
        );
    }
}
