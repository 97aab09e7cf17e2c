//! Declaration references used by `{@link}` and `{@inheritDoc}`.
//!
//! Grammar (simplified TSDoc): `[package#]Member(.Member)*`, where each member may
//! carry a `:selector` or `(overload)` suffix that is ignored for lookup.

/// A parsed declaration reference such as `@scope/pkg#Widget.render`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclarationReference {
    pub package: Option<String>,
    pub path: Vec<String>,
}

impl DeclarationReference {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let (package, members) = match text.split_once('#') {
            Some((pkg, rest)) => {
                let pkg = pkg.trim();
                ((!pkg.is_empty()).then(|| pkg.to_string()), rest)
            }
            None => (None, text),
        };

        let mut path = Vec::new();
        for member in members.split('.') {
            let member = strip_selector(member.trim());
            if member.is_empty() {
                return None;
            }
            path.push(member.to_string());
        }

        Some(Self { package, path })
    }

    /// Whether the reference points into a package other than `current`.
    pub fn is_external(&self, current: &str) -> bool {
        self.package.as_deref().is_some_and(|pkg| pkg != current)
    }
}

impl std::fmt::Display for DeclarationReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(pkg) = &self.package {
            write!(f, "{pkg}#")?;
        }
        write!(f, "{}", self.path.join("."))
    }
}

fn strip_selector(member: &str) -> &str {
    let member = member.trim_start_matches('(');
    let end = member.find([':', '(', ')', '[']).unwrap_or(member.len());
    member[..end].trim()
}
