use std::fmt;
use std::sync::LazyLock;

/// Status column of the IDNA mapping table (UTS #46).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Valid,
    Ignored,
    Mapped,
    Deviation,
    Disallowed,
    DisallowedStd3Valid,
    DisallowedStd3Mapped,
}

impl Status {
    fn from_name(name: &str) -> Option<Status> {
        match name {
            "valid" => Some(Status::Valid),
            "ignored" => Some(Status::Ignored),
            "mapped" => Some(Status::Mapped),
            "deviation" => Some(Status::Deviation),
            "disallowed" => Some(Status::Disallowed),
            "disallowed_STD3_valid" => Some(Status::DisallowedStd3Valid),
            "disallowed_STD3_mapped" => Some(Status::DisallowedStd3Mapped),
            _ => None,
        }
    }
}

/// One row of the mapping table: an inclusive code-point range, its status,
/// and the replacement sequence for mapped rows.
#[derive(Debug, Clone)]
pub struct MappingRow {
    pub low: u32,
    pub high: u32,
    pub status: Status,
    pub mapping: Option<String>,
}

/// The Unicode versions a mapping table ships for. Fixed at process start;
/// tables are never hot-reloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnicodeVersion {
    #[default]
    V14_0_0,
}

impl UnicodeVersion {
    pub fn current() -> UnicodeVersion {
        UnicodeVersion::default()
    }

    fn table_csv(self) -> &'static str {
        match self {
            UnicodeVersion::V14_0_0 => include_str!("idnamap/14.0.0.csv"),
        }
    }
}

impl fmt::Display for UnicodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnicodeVersion::V14_0_0 => f.write_str("14.0.0"),
        }
    }
}

static CURRENT: LazyLock<IdnaMapper> =
    LazyLock::new(|| IdnaMapper::load(UnicodeVersion::current()));

static DISALLOWED_FALLBACK: MappingRow = MappingRow {
    low: 0,
    high: 0x0010_FFFF,
    status: Status::Disallowed,
    mapping: None,
};

/// The mapping table for one Unicode version: sorted, disjoint rows covering
/// the full code-point space, looked up by binary search.
pub struct IdnaMapper {
    rows: Vec<MappingRow>,
}

impl IdnaMapper {
    /// The process-wide table. Initialized once, on first use, by whichever
    /// thread gets there first; all later readers see the completed table.
    pub fn current() -> &'static IdnaMapper {
        &CURRENT
    }

    fn load(version: UnicodeVersion) -> IdnaMapper {
        let mut rows = Vec::new();
        for line in version.table_csv().lines().skip(1) {
            if line.is_empty() {
                continue;
            }
            if let Some(row) = parse_row(line) {
                rows.push(row);
            }
        }
        rows.sort_by_key(|row| row.low);
        IdnaMapper { rows }
    }

    pub fn mapping(&self, code_point: u32) -> &MappingRow {
        let index = self
            .rows
            .partition_point(|row| row.high < code_point);
        match self.rows.get(index) {
            Some(row) if row.low <= code_point => row,
            _ => &DISALLOWED_FALLBACK,
        }
    }
}

/// Parse one `codePoints,status,mapping` line. The mapping field holds
/// space-separated hex code points and is quoted when it has more than one.
fn parse_row(line: &str) -> Option<MappingRow> {
    let (code_points, rest) = line.split_once(',')?;
    let (status_name, mapping_field) = rest.split_once(',')?;

    let (low, high) = match code_points.split_once("..") {
        Some((low, high)) => (parse_hex(low)?, parse_hex(high)?),
        None => {
            let single = parse_hex(code_points)?;
            (single, single)
        }
    };

    let status = Status::from_name(status_name)?;

    let mapping_field = mapping_field
        .strip_prefix('"')
        .and_then(|field| field.strip_suffix('"'))
        .unwrap_or(mapping_field);
    let mapping = if mapping_field.is_empty() {
        None
    } else {
        let mut replacement = String::new();
        for part in mapping_field.split(' ') {
            replacement.push(char::from_u32(parse_hex(part)?)?);
        }
        Some(replacement)
    };

    Some(MappingRow {
        low,
        high,
        status,
        mapping,
    })
}

fn parse_hex(s: &str) -> Option<u32> {
    u32::from_str_radix(s, 16).ok()
}
