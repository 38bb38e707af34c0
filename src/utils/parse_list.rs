/// Split a comma separated parameter, dropping blank entries
pub fn parse_csv_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Trim repeated form values. Blank entries are kept so the validator can see an
/// empty subnet row.
pub fn parse_text_list(values: Option<&Vec<String>>) -> Vec<String> {
    values
        .map(|vs| vs.iter().map(|v| v.trim().to_string()).collect())
        .unwrap_or_default()
}
