use std::sync::LazyLock;

/// A set of code points, stored as sorted, disjoint, inclusive ranges.
///
/// Built once through [`Builder`]; membership is a binary search.
#[derive(Debug, Clone)]
pub struct CharacterSet {
    ranges: Vec<(u32, u32)>,
}

impl CharacterSet {
    pub fn builder() -> Builder {
        Builder { ranges: Vec::new() }
    }

    pub fn contains(&self, c: char) -> bool {
        self.contains_code_point(c as u32)
    }

    /// Membership by raw code-point value. Percent encoding isomorphically
    /// maps bytes to the 0x00..=0xFF code points, so the codec queries with
    /// byte values directly.
    pub fn contains_code_point(&self, code_point: u32) -> bool {
        self.ranges
            .binary_search_by(|&(low, high)| {
                if code_point < low {
                    std::cmp::Ordering::Greater
                } else if code_point > high {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }
}

pub struct Builder {
    ranges: Vec<(u32, u32)>,
}

impl Builder {
    /// Add an inclusive range of code points.
    pub fn add_range(mut self, low: u32, high: u32) -> Self {
        debug_assert!(low <= high);
        self.ranges.push((low, high));
        self
    }

    pub fn add_code_point(self, c: char) -> Self {
        let cp = c as u32;
        self.add_range(cp, cp)
    }

    pub fn add_code_points(mut self, chars: &str) -> Self {
        for c in chars.chars() {
            self = self.add_code_point(c);
        }
        self
    }

    pub fn add_set(mut self, other: &CharacterSet) -> Self {
        self.ranges.extend_from_slice(&other.ranges);
        self
    }

    /// Canonicalize into sorted, disjoint ranges, merging overlapping and
    /// adjacent entries.
    pub fn build(mut self) -> CharacterSet {
        self.ranges.sort_unstable();

        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(self.ranges.len());
        for (low, high) in self.ranges {
            match merged.last_mut() {
                Some((_, prev_high)) if low <= prev_high.saturating_add(1) => {
                    *prev_high = (*prev_high).max(high);
                }
                _ => merged.push((low, high)),
            }
        }

        CharacterSet { ranges: merged }
    }
}

/// C0 controls plus everything from U+007F up.
pub static C0_CONTROL: LazyLock<CharacterSet> = LazyLock::new(|| {
    CharacterSet::builder()
        .add_range(0x00, 0x1F)
        .add_range(0x7F, 0x0010_FFFF)
        .build()
});

pub static FRAGMENT: LazyLock<CharacterSet> = LazyLock::new(|| {
    CharacterSet::builder()
        .add_set(&C0_CONTROL)
        .add_code_points(" \"<>`")
        .build()
});

pub static QUERY: LazyLock<CharacterSet> = LazyLock::new(|| {
    CharacterSet::builder()
        .add_set(&C0_CONTROL)
        .add_code_points(" \"#<>")
        .build()
});

pub static SPECIAL_QUERY: LazyLock<CharacterSet> = LazyLock::new(|| {
    CharacterSet::builder()
        .add_set(&QUERY)
        .add_code_point('\'')
        .build()
});

pub static PATH: LazyLock<CharacterSet> = LazyLock::new(|| {
    CharacterSet::builder()
        .add_set(&QUERY)
        .add_code_points("?`{}")
        .build()
});

pub static USERINFO: LazyLock<CharacterSet> = LazyLock::new(|| {
    CharacterSet::builder()
        .add_set(&PATH)
        .add_code_points("/:;=@|")
        .add_range('[' as u32, '^' as u32)
        .build()
});

/// Code points that may never appear in any host.
pub static FORBIDDEN_HOST: LazyLock<CharacterSet> = LazyLock::new(|| {
    CharacterSet::builder()
        .add_code_point('\0')
        .add_code_point('\t')
        .add_code_point('\n')
        .add_code_point('\r')
        .add_code_points(" #/:<>?@[\\]^|")
        .build()
});

/// Code points that may never appear in a registrable domain: the forbidden
/// host set plus C0 controls, `%`, and U+007F.
pub static FORBIDDEN_DOMAIN: LazyLock<CharacterSet> = LazyLock::new(|| {
    CharacterSet::builder()
        .add_set(&FORBIDDEN_HOST)
        .add_range(0x00, 0x1F)
        .add_code_point('%')
        .add_code_point('\u{7F}')
        .build()
});

/// Code points allowed in a URL without a validation warning: ASCII
/// alphanumerics, a small punctuation set, and all non-ASCII scalars except
/// surrogates and non-characters.
pub static URL_CODE_POINTS: LazyLock<CharacterSet> = LazyLock::new(|| {
    let mut builder = CharacterSet::builder()
        .add_range('a' as u32, 'z' as u32)
        .add_range('A' as u32, 'Z' as u32)
        .add_range('0' as u32, '9' as u32)
        .add_code_points("!$&'()*+,-./:;=?@_~")
        .add_range(0xA0, 0xD7FF)
        .add_range(0xE000, 0xFDCF)
        .add_range(0xFDF0, 0xFFFD);

    // Planes 1..=16, each minus its two trailing non-characters.
    for plane in 1u32..=16 {
        let start = plane << 16;
        builder = builder.add_range(start, start + 0xFFFD);
    }

    builder.build()
});
