/// Parse the target capacity field. Blank, non-numeric and out of range text all
/// read as `0`, which the validator treats as "not filled in".
pub fn parse_target_capacity(value: Option<&str>) -> u32 {
    value
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .and_then(|t| t.parse::<u32>().ok())
        .unwrap_or(0)
}
