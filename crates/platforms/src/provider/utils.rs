/// Parse a counter that the API sends as a decimal string.
///
/// Missing or malformed values count as zero.
#[inline]
pub fn parse_count(value: Option<&str>) -> u64 {
    value
        .map(str::trim)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0)
}
