use std::path::Path;

/// File-name stem used as the default source key: `data/uspop.csv` -> `uspop`.
pub fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(path)
        .to_string()
}
