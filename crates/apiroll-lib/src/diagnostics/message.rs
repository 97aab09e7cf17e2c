use std::ops::Range;

use crate::graph::DeclId;

/// Diagnostic kinds, grouped by the stage that reports them.
///
/// Each kind carries a stable code (`ae-*` / `tsdoc-*`) used by reporting
/// policies to override its severity or silence it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Export graph inconsistencies
    CircularReference,
    AmbiguousReexport,
    UnresolvedExport,
    UnresolvedModule,
    DuplicateExport,
    UnresolvedReference,

    // Doc comment syntax
    MalformedDocComment,
    UndefinedDocTag,
    ExtraReleaseTag,
    MisplacedPackageTag,

    // Release tag consistency
    MissingReleaseTag,
    IncompatibleReleaseTags,
    DifferentReleaseTags,
    InternalMixedReleaseTag,
    InternalMissingUnderscore,
    PreapprovedBadReleaseTag,
    ForgottenExport,

    // Documentation references
    UnresolvedInheritDocReference,
    UnresolvedInheritDocBase,
    CyclicInheritDoc,
    UnresolvedLink,
}

impl DiagnosticKind {
    pub const ALL: [DiagnosticKind; 21] = [
        Self::CircularReference,
        Self::AmbiguousReexport,
        Self::UnresolvedExport,
        Self::UnresolvedModule,
        Self::DuplicateExport,
        Self::UnresolvedReference,
        Self::MalformedDocComment,
        Self::UndefinedDocTag,
        Self::ExtraReleaseTag,
        Self::MisplacedPackageTag,
        Self::MissingReleaseTag,
        Self::IncompatibleReleaseTags,
        Self::DifferentReleaseTags,
        Self::InternalMixedReleaseTag,
        Self::InternalMissingUnderscore,
        Self::PreapprovedBadReleaseTag,
        Self::ForgottenExport,
        Self::UnresolvedInheritDocReference,
        Self::UnresolvedInheritDocBase,
        Self::CyclicInheritDoc,
        Self::UnresolvedLink,
    ];

    /// Stable identifier used in reports and reporting policies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CircularReference => "ae-circular-reference",
            Self::AmbiguousReexport => "ae-ambiguous-reexport",
            Self::UnresolvedExport => "ae-unresolved-export",
            Self::UnresolvedModule => "ae-unresolved-module",
            Self::DuplicateExport => "ae-duplicate-export",
            Self::UnresolvedReference => "ae-unresolved-reference",
            Self::MalformedDocComment => "tsdoc-malformed-comment",
            Self::UndefinedDocTag => "tsdoc-undefined-tag",
            Self::ExtraReleaseTag => "ae-extra-release-tag",
            Self::MisplacedPackageTag => "ae-misplaced-package-tag",
            Self::MissingReleaseTag => "ae-missing-release-tag",
            Self::IncompatibleReleaseTags => "ae-incompatible-release-tags",
            Self::DifferentReleaseTags => "ae-different-release-tags",
            Self::InternalMixedReleaseTag => "ae-internal-mixed-release-tag",
            Self::InternalMissingUnderscore => "ae-internal-missing-underscore",
            Self::PreapprovedBadReleaseTag => "ae-preapproved-bad-release-tag",
            Self::ForgottenExport => "ae-forgotten-export",
            Self::UnresolvedInheritDocReference => "ae-unresolved-inheritdoc-reference",
            Self::UnresolvedInheritDocBase => "ae-unresolved-inheritdoc-base",
            Self::CyclicInheritDoc => "ae-cyclic-inherit-doc",
            Self::UnresolvedLink => "ae-unresolved-link",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Default severity for this kind. Can be overridden by policy.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::CircularReference
            | Self::AmbiguousReexport
            | Self::UnresolvedExport
            | Self::UnresolvedModule
            | Self::DuplicateExport => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::CircularReference => "circular reference between exports",
            Self::AmbiguousReexport => "ambiguous re-export",
            Self::UnresolvedExport => "export could not be resolved",
            Self::UnresolvedModule => "module could not be found",
            Self::DuplicateExport => "duplicate export",
            Self::UnresolvedReference => "reference could not be resolved",
            Self::MalformedDocComment => "malformed doc comment",
            Self::UndefinedDocTag => "undefined doc tag",
            Self::ExtraReleaseTag => "more than one release tag",
            Self::MisplacedPackageTag => "`@packageDocumentation` belongs in the package header",
            Self::MissingReleaseTag => "missing release tag",
            Self::IncompatibleReleaseTags => "references a less public declaration",
            Self::DifferentReleaseTags => "declarations have different release tags",
            Self::InternalMixedReleaseTag => "mixed release tags are not allowed for internal declarations",
            Self::InternalMissingUnderscore => "internal export name should start with an underscore",
            Self::PreapprovedBadReleaseTag => "`@preapproved` requires `@internal`",
            Self::ForgottenExport => "referenced symbol is not exported by the entry point",
            Self::UnresolvedInheritDocReference => "`{@inheritDoc}` target could not be found",
            Self::UnresolvedInheritDocBase => "`{@inheritDoc}` needs a target",
            Self::CyclicInheritDoc => "`{@inheritDoc}` forms a cycle",
            Self::UnresolvedLink => "`{@link}` target could not be found",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::CircularReference => "circular reference: {}".to_string(),
            Self::UnresolvedExport => "`{}` could not be resolved".to_string(),
            Self::UnresolvedModule => "cannot find module `{}`".to_string(),
            Self::DuplicateExport => "`{}` is exported more than once".to_string(),
            Self::UnresolvedReference => "`{}` could not be resolved".to_string(),
            Self::UndefinedDocTag => "`{}` is not a recognized doc tag".to_string(),
            Self::ForgottenExport => {
                "the symbol `{}` needs to be exported by the entry point".to_string()
            }
            Self::UnresolvedInheritDocReference => {
                "`{@inheritDoc}` target `{}` could not be found".to_string()
            }
            Self::UnresolvedLink => "`{@link}` target `{}` could not be found".to_string(),
            Self::InternalMissingUnderscore => {
                "internal export `{}` should start with an underscore".to_string()
            }
            Self::MissingReleaseTag => {
                "`{}` is exported but has no release tag (@alpha, @beta, @public or @internal)"
                    .to_string()
            }
            Self::IncompatibleReleaseTags | Self::AmbiguousReexport | Self::CyclicInheritDoc => {
                "{}".to_string()
            }
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replacen("{}", detail, 1),
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Where a diagnostic points: a module plus an optional line/column and byte range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    /// 1-based; 0 when unknown.
    pub line: u32,
    /// 1-based; 0 when unknown.
    pub column: u32,
    /// Byte range into the module source, when the front-end supplied one.
    pub range: Option<Range<u32>>,
}

impl Location {
    pub fn module(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn new(path: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            path: path.into(),
            line,
            column,
            range: None,
        }
    }

    pub fn with_range(mut self, range: Range<u32>) -> Self {
        self.range = Some(range);
        self
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            return write!(f, "{}", self.path);
        }
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) location: Location,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(crate) kind: DiagnosticKind,
    pub(crate) severity: Severity,
    pub(crate) location: Location,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    /// Declaration the message is about, used to attach it in the API report.
    pub(crate) subject: Option<DeclId>,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, location: Location, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            location,
            message: message.into(),
            related: Vec::new(),
            subject: None,
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, location: Location) -> Self {
        Self::new(kind, location, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn subject(&self) -> Option<DeclId> {
        self.subject
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} ({}): {}",
            self.location,
            self.severity,
            self.kind.code(),
            self.message
        )?;
        for related in &self.related {
            write!(f, " (related: {} at {})", related.message, related.location)?;
        }
        Ok(())
    }
}
