use smallvec::SmallVec;

pub type SegmentList<'a> = SmallVec<[&'a str; 8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Root,
    Dynamic,
    Splat,
    Static,
}

pub fn strip_slashes(path: &str) -> &str {
    path.trim_matches('/')
}

/// Splits a uri into segments after trimming leading and trailing slashes.
/// `"/"` segmentizes to `[""]`.
pub fn segmentize(uri: &str) -> SegmentList<'_> {
    strip_slashes(uri).split('/').collect()
}

pub fn segment_kind(segment: &str, position: usize) -> SegmentKind {
    if segment.is_empty() && position == 0 {
        SegmentKind::Root
    } else if dynamic_param(segment).is_some() {
        SegmentKind::Dynamic
    } else if segment.starts_with('*') {
        SegmentKind::Splat
    } else {
        SegmentKind::Static
    }
}

/// Parameter name of a `:name` segment.
pub fn dynamic_param(segment: &str) -> Option<&str> {
    segment.strip_prefix(':').filter(|name| !name.is_empty())
}

/// Params key of a splat segment: `"*"` for a bare `*`, the name for `*name`.
pub fn splat_param(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('*')
        .map(|name| if name.is_empty() { "*" } else { name })
}

/// Percent-decodes a captured segment. Total: malformed escapes pass through
/// unchanged.
pub fn decode_component(segment: &str) -> String {
    let bytes = segment.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%'
            && index + 2 < bytes.len()
            && let Some(value) = decode_hex_pair(bytes[index + 1], bytes[index + 2])
        {
            out.push(value);
            index += 3;
            continue;
        }
        out.push(bytes[index]);
        index += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| segment.to_string())
}

fn decode_hex_pair(hi: u8, lo: u8) -> Option<u8> {
    fn val(byte: u8) -> Option<u8> {
        match byte {
            b'0'..=b'9' => Some(byte - b'0'),
            b'a'..=b'f' => Some(byte - b'a' + 10),
            b'A'..=b'F' => Some(byte - b'A' + 10),
            _ => None,
        }
    }

    Some(val(hi)? << 4 | val(lo)?)
}
