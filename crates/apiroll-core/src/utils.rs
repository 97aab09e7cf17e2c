//! Name and module-path helpers shared by the pipeline stages.

/// Extensions stripped from module paths, longest first.
const MODULE_EXTENSIONS: &[&str] = &[".d.mts", ".d.cts", ".d.ts", ".mts", ".cts", ".tsx", ".ts", ".mjs", ".cjs", ".js"];

/// Pick `base`, or the first of `base_2`, `base_3`, ... that is not taken.
///
/// # Examples
/// ```
/// use apiroll_core::utils::unique_name;
/// assert_eq!(unique_name("Date", |n| n == "Date"), "Date_2");
/// assert_eq!(unique_name("Foo", |_| false), "Foo");
/// ```
pub fn unique_name(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_string();
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{base}_{suffix}");
        if !is_taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Canonical form of a module path: forward slashes, no `./` prefix,
/// `.`/`..` segments folded, declaration extensions removed.
///
/// # Examples
/// ```
/// use apiroll_core::utils::normalize_module_path;
/// assert_eq!(normalize_module_path("./src/index.d.ts"), "src/index");
/// assert_eq!(normalize_module_path("src/a/../b.ts"), "src/b");
/// ```
pub fn normalize_module_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut path = path.as_str();
    for ext in MODULE_EXTENSIONS {
        if let Some(stripped) = path.strip_suffix(ext) {
            path = stripped;
            break;
        }
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), None | Some(&"..")) {
                    segments.push("..");
                } else {
                    segments.pop();
                }
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Whether a module specifier points inside the package rather than at another package.
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "." || specifier == ".." || specifier.starts_with("./") || specifier.starts_with("../")
}

/// Join a relative specifier onto the directory of the importing module.
///
/// Returns `None` for package specifiers, which name external packages.
pub fn resolve_relative_specifier(importer: &str, specifier: &str) -> Option<String> {
    if !is_relative_specifier(specifier) {
        return None;
    }
    let dir = match importer.rfind('/') {
        Some(idx) => &importer[..idx],
        None => "",
    };
    let joined = if dir.is_empty() {
        specifier.to_string()
    } else {
        format!("{dir}/{specifier}")
    };
    Some(normalize_module_path(&joined))
}

/// Sort key that ignores leading underscores, so `_foo` sorts next to `foo`.
pub fn sort_key_ignoring_underscore(name: &str) -> &str {
    let trimmed = name.trim_start_matches('_');
    if trimmed.is_empty() { name } else { trimmed }
}

/// Whether `s` is a plain identifier (`[A-Za-z_$][A-Za-z0-9_$]*`).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
