use crate::checkers::is_ascii_hex_digit;

/// What a [`Pointer`] is currently standing on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointedAt {
    /// Before the start of the input, after a pre-start `decrease`.
    Nowhere,
    /// Past the end of the input.
    Eof,
    /// A valid code point.
    CodePoint(char),
}

/// One element of the lookahead pattern language understood by
/// [`Pointer::does_remaining_start_with`].
enum PrefixPattern {
    Literal(char),
    AsciiHexDigit,
}

impl PrefixPattern {
    fn matches(&self, c: char) -> bool {
        match self {
            PrefixPattern::Literal(l) => c == *l,
            PrefixPattern::AsciiHexDigit => is_ascii_hex_digit(c as u32),
        }
    }
}

/// Bidirectional cursor over the code points of a string.
///
/// All movement is in code points, never UTF-8 bytes; a supplementary-plane
/// character is a single step. Moving left of index 0 parks the cursor at
/// [`PointedAt::Nowhere`]; moving past the last code point parks it at
/// [`PointedAt::Eof`].
pub struct Pointer<'a> {
    input: &'a str,
    /// Byte offset of the current code point; `input.len()` at EOF.
    offset: usize,
    nowhere: bool,
}

impl<'a> Pointer<'a> {
    pub fn new(input: &'a str) -> Self {
        Pointer {
            input,
            offset: 0,
            nowhere: false,
        }
    }

    pub fn pointed_at(&self) -> PointedAt {
        if self.nowhere {
            return PointedAt::Nowhere;
        }
        match self.input[self.offset..].chars().next() {
            Some(c) => PointedAt::CodePoint(c),
            None => PointedAt::Eof,
        }
    }

    /// Move forward by `n` code points, clamping at EOF.
    pub fn increase(&mut self, n: usize) {
        for _ in 0..n {
            if self.nowhere {
                self.nowhere = false;
                continue;
            }
            match self.input[self.offset..].chars().next() {
                Some(c) => self.offset += c.len_utf8(),
                None => return,
            }
        }
    }

    /// Move backward by `n` code points, clamping at `Nowhere`.
    pub fn decrease(&mut self, n: usize) {
        for _ in 0..n {
            if self.nowhere {
                return;
            }
            match self.input[..self.offset].chars().next_back() {
                Some(c) => self.offset -= c.len_utf8(),
                None => self.nowhere = true,
            }
        }
    }

    /// Return to the first code point.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.nowhere = false;
    }

    /// The input after the current code point.
    fn remaining(&self) -> &str {
        if self.nowhere {
            return self.input;
        }
        match self.input[self.offset..].chars().next() {
            Some(c) => &self.input[self.offset + c.len_utf8()..],
            None => "",
        }
    }

    /// The input from the current code point, inclusive.
    fn from_current(&self) -> &str {
        if self.nowhere {
            return self.input;
        }
        &self.input[self.offset..]
    }

    /// Match the input *after* the current code point against `pattern`.
    ///
    /// The pattern is a sequence of literal code points, except that `%d`
    /// matches one ASCII hex digit.
    pub fn does_remaining_start_with(&self, pattern: &str) -> bool {
        let mut rest = self.remaining().chars();
        let mut pat = pattern.chars();

        while let Some(p) = pat.next() {
            let expected = if p == '%' {
                match pat.next() {
                    Some('d') => PrefixPattern::AsciiHexDigit,
                    _ => unreachable!("unknown prefix pattern"),
                }
            } else {
                PrefixPattern::Literal(p)
            };

            match rest.next() {
                Some(c) if expected.matches(c) => {}
                _ => return false,
            }
        }

        true
    }

    /// Whether the input from the current code point starts with a Windows
    /// drive letter: an ASCII alpha, then `:` or `|`, then (if anything
    /// follows) one of `/`, `\`, `?`, `#`.
    pub fn does_remaining_start_with_windows_drive_letter(&self) -> bool {
        let mut rest = self.from_current().chars();

        let Some(first) = rest.next() else {
            return false;
        };
        if !first.is_ascii_alphabetic() {
            return false;
        }

        let Some(second) = rest.next() else {
            return false;
        };
        if second != ':' && second != '|' {
            return false;
        }

        match rest.next() {
            None => true,
            Some(third) => matches!(third, '/' | '\\' | '?' | '#'),
        }
    }
}
