use std::path::{Path, PathBuf};

pub fn has_extension<P: AsRef<Path>>(name: P, ext: &str) -> bool {
    name
        .as_ref()
        .extension()
        .map(|x| x == ext)
        .unwrap_or(false)
}

/// Case-insensitive variant of [`has_extension`].
pub fn has_extension_ci<P: AsRef<Path>>(name: P, ext: &str) -> bool {
    name
        .as_ref()
        .extension()
        .and_then(|x| x.to_str())
        .map(|x| x.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// `base.png` -> `base_<index>.png`; index 0 returns the path unchanged.
pub fn indexed_sibling<P: AsRef<Path>>(path: P, index: usize) -> PathBuf {
    let path = path.as_ref();

    if index == 0 { return path.to_owned(); }

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("image");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, index, ext),
        None => format!("{}_{}", stem, index)
    };

    path.with_file_name(name)
}

/// File stem used to name test outputs, e.g. `valid/TestFoo.png` -> `TestFoo`.
pub fn file_stem_or<P: AsRef<Path>>(path: P, default: &str) -> String {
    path.as_ref()
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_owned())
        .unwrap_or_else(|| default.to_owned())
}
