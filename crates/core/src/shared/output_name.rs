/// Derive a download name by swapping the source's last extension for
/// `target_extension`.
///
/// Only the final `.suffix` is replaced; a name without one (or ending in a
/// bare dot) keeps its full text and gains the new extension.
pub fn output_file_name(source_name: &str, target_extension: &str) -> String {
    let stem = match source_name.rfind('.') {
        Some(idx) if idx + 1 < source_name.len() => &source_name[..idx],
        _ => source_name,
    };
    format!("{stem}.{target_extension}")
}
