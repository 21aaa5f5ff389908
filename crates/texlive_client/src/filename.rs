/// Base name used when stripping the archive suffix leaves nothing.
pub const DEFAULT_BASE_NAME: &str = "main";

const ARCHIVE_SUFFIXES: [&str; 2] = [".zip", ".rar"];

/// Name of the saved PDF: `{archive stem}.pdf`.
///
/// Only the final path component is used, one trailing `.zip`/`.rar` is
/// removed regardless of case, and characters that are not allowed in file
/// names are replaced.
pub fn artifact_filename(archive_name: &str) -> String {
    let file_name = archive_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(archive_name);
    let stem = strip_archive_suffix(file_name);
    let mut base: String = stem
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    if base.is_empty() {
        base = DEFAULT_BASE_NAME.to_string();
    }
    if is_reserved_windows_name(&base) {
        base.push('_');
    }
    format!("{base}.pdf")
}

fn strip_archive_suffix(name: &str) -> &str {
    for suffix in ARCHIVE_SUFFIXES {
        if name.len() < suffix.len() {
            continue;
        }
        let split = name.len() - suffix.len();
        if let Some(tail) = name.get(split..) {
            if tail.eq_ignore_ascii_case(suffix) {
                return &name[..split];
            }
        }
    }
    name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
