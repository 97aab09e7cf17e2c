//! Doc model: a JSON description of the exported surface for documentation
//! tools, written as `<unscopedPackageName>.api.json`.
//!
//! Items nest the way declarations nest. Docs are the resolved ones, so
//! `{@inheritDoc}` has already been applied.

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use apiroll_core::{DeclarationKind, Modifier, ReleaseTag};

use crate::doc::{DocComment, parse_doc};
use crate::extractor::ExtractorContext;
use crate::graph::{DeclId, ModuleId, SymbolId};
use crate::resolve::{Entity, Target};
use crate::rollup::header_text;
use crate::{Error, Result};

pub const SCHEMA_VERSION: u32 = 1;

/// What the emitter leaves out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiModelOptions {
    /// Declarations with one of these effective tags are dropped with their members.
    pub release_tags_to_trim: Vec<ReleaseTag>,
    /// Document entities the surface references but never exports.
    pub include_forgotten_exports: bool,
}

impl Default for ApiModelOptions {
    fn default() -> Self {
        Self {
            release_tags_to_trim: vec![ReleaseTag::Internal],
            include_forgotten_exports: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub tool_package: &'static str,
    pub tool_version: &'static str,
    pub schema_version: u32,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            tool_package: "apiroll",
            tool_version: env!("CARGO_PKG_VERSION"),
            schema_version: SCHEMA_VERSION,
        }
    }
}

/// Root document: the package item plus tool metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiModel {
    pub metadata: Metadata,
    #[serde(flatten)]
    pub package: ApiItem,
}

impl ApiModel {
    /// The single entry point's item.
    pub fn entry_point(&self) -> &ApiItem {
        &self.package.members[0]
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::DocModel(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ApiItemKind {
    Package,
    EntryPoint,
    Class,
    Interface,
    Function,
    Enum,
    Namespace,
    Variable,
    TypeAlias,
    Method,
    MethodSignature,
    Property,
    PropertySignature,
    Constructor,
    EnumMember,
    CallSignature,
    ConstructSignature,
    IndexSignature,
}

impl ApiItemKind {
    fn of(kind: DeclarationKind, container: Option<DeclarationKind>) -> Self {
        let in_interface = container == Some(DeclarationKind::Interface);
        match kind {
            DeclarationKind::Class => Self::Class,
            DeclarationKind::Interface => Self::Interface,
            DeclarationKind::Function => Self::Function,
            DeclarationKind::Enum => Self::Enum,
            DeclarationKind::Namespace => Self::Namespace,
            DeclarationKind::Variable => Self::Variable,
            DeclarationKind::TypeAlias => Self::TypeAlias,
            DeclarationKind::Method if in_interface => Self::MethodSignature,
            DeclarationKind::Method => Self::Method,
            DeclarationKind::Property
            | DeclarationKind::GetAccessor
            | DeclarationKind::SetAccessor
                if in_interface =>
            {
                Self::PropertySignature
            }
            DeclarationKind::Property
            | DeclarationKind::GetAccessor
            | DeclarationKind::SetAccessor => Self::Property,
            DeclarationKind::Constructor => Self::Constructor,
            DeclarationKind::EnumMember => Self::EnumMember,
            DeclarationKind::CallSignature => Self::CallSignature,
            DeclarationKind::ConstructSignature => Self::ConstructSignature,
            DeclarationKind::IndexSignature => Self::IndexSignature,
        }
    }

    /// Suffix after `:` in a canonical reference.
    fn selector(self) -> &'static str {
        match self {
            Self::Package | Self::EntryPoint => "",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Function => "function",
            Self::Enum => "enum",
            Self::Namespace => "namespace",
            Self::Variable => "var",
            Self::TypeAlias => "type",
            Self::Method
            | Self::MethodSignature
            | Self::Property
            | Self::PropertySignature
            | Self::EnumMember => "member",
            Self::Constructor => "constructor",
            Self::CallSignature => "call",
            Self::ConstructSignature => "new",
            Self::IndexSignature => "index",
        }
    }

    /// Members of classes and interfaces are addressed with `#`, everything else with `.`.
    fn member_separator(self) -> char {
        match self {
            Self::Class | Self::Interface => '#',
            _ => '.',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiItem {
    pub kind: ApiItemKind,
    pub canonical_reference: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_tag: Option<ReleaseTag>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub signature: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
    /// 1-based, on every item of an overloadable kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overload_index: Option<usize>,
    /// Set on items directly under the entry point.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_exported: Option<bool>,
    #[serde(skip_serializing_if = "ApiDocs::is_empty")]
    pub docs: ApiDocs,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<ApiItem>,
}

impl ApiItem {
    fn new(kind: ApiItemKind, canonical_reference: String, name: impl Into<String>) -> Self {
        Self {
            kind,
            canonical_reference,
            name: name.into(),
            release_tag: None,
            signature: String::new(),
            modifiers: Vec::new(),
            overload_index: None,
            is_exported: None,
            docs: ApiDocs::default(),
            members: Vec::new(),
        }
    }

    pub fn member(&self, name: &str) -> Option<&ApiItem> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Doc comment content as documentation tools read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDocs {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub type_params: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub see: Vec<String>,
    /// Modifier tags such as `@sealed` or `@virtual`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<&'static str>,
}

impl ApiDocs {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&DocComment> for ApiDocs {
    fn from(doc: &DocComment) -> Self {
        let flags = doc.modifiers;
        let modifiers = [
            (flags.sealed, "@sealed"),
            (flags.is_virtual, "@virtual"),
            (flags.is_override, "@override"),
            (flags.readonly, "@readonly"),
            (flags.event_property, "@eventProperty"),
        ]
        .into_iter()
        .filter_map(|(set, tag)| set.then_some(tag))
        .collect();

        Self {
            summary: doc.summary.clone(),
            remarks: doc.remarks.clone(),
            params: doc.params.clone(),
            type_params: doc.type_params.clone(),
            returns: doc.returns.clone(),
            deprecated: doc.deprecated.clone(),
            examples: doc.examples.clone(),
            see: doc.see.clone(),
            modifiers,
        }
    }
}

struct ModelBuilder<'a> {
    ctx: ExtractorContext<'a>,
    options: &'a ApiModelOptions,
    /// Module namespaces being expanded, outermost first.
    open: Vec<ModuleId>,
}

/// Build the doc model of the analyzed package.
///
/// Entities from other packages are left out. A namespace import becomes a
/// `Namespace` item listing the module's exports. Private members and
/// declarations whose tag is trimmed are dropped along with their members.
pub fn build_api_model(ctx: ExtractorContext<'_>, options: &ApiModelOptions) -> ApiModel {
    let package = ctx.table.package();
    let prefix = format!("{}!", package.name);

    let mut entities: Vec<&Entity> = ctx
        .resolution
        .entities()
        .map(|(_, entity)| entity)
        .filter(|entity| {
            entity.is_exported() || (options.include_forgotten_exports && entity.is_forgotten())
        })
        .collect();
    entities.sort_by(|a, b| a.name.cmp(&b.name));

    let mut builder = ModelBuilder {
        ctx,
        options,
        open: Vec::new(),
    };
    let mut entry = ApiItem::new(ApiItemKind::EntryPoint, prefix.clone(), "");
    for entity in entities {
        entry.members.extend(builder.entity_items(entity, &prefix));
    }
    debug!(package = package.name.as_str(), items = entry.members.len(); "doc model built");

    let mut root = ApiItem::new(ApiItemKind::Package, prefix, package.name.as_str());
    if let Some(raw) = &package.doc {
        root.docs = ApiDocs::from(&parse_doc(raw).0);
    }
    root.members.push(entry);

    ApiModel {
        metadata: Metadata::default(),
        package: root,
    }
}

impl ModelBuilder<'_> {
    fn entity_items(&mut self, entity: &Entity, prefix: &str) -> Vec<ApiItem> {
        let exported = Some(entity.is_exported());
        match entity.target {
            Target::Symbol(symbol) => {
                let mut items = self.symbol_items(symbol, &entity.name, prefix);
                for item in &mut items {
                    item.is_exported = exported;
                }
                items
            }
            Target::Namespace(module) => {
                let mut item = self.namespace_item(module, &entity.name, prefix);
                item.is_exported = exported;
                vec![item]
            }
            Target::External(_) => Vec::new(),
        }
    }

    fn namespace_item(&mut self, module: ModuleId, name: &str, prefix: &str) -> ApiItem {
        let path = format!("{prefix}{name}");
        let mut item = ApiItem::new(ApiItemKind::Namespace, format!("{path}:namespace"), name);
        // A namespace that re-exports one of its ancestors stays unexpanded.
        if self.open.contains(&module) {
            return item;
        }

        self.open.push(module);
        let child_prefix = format!("{path}.");
        let table = self.ctx.table;
        let resolution = self.ctx.resolution;
        for (&export, &target) in resolution.exports_of(module) {
            let export = table.name(export);
            match target {
                Target::Symbol(symbol) => {
                    let items = self.symbol_items(symbol, export, &child_prefix);
                    item.members.extend(items);
                }
                Target::Namespace(inner) => {
                    let inner = self.namespace_item(inner, export, &child_prefix);
                    item.members.push(inner);
                }
                Target::External(_) => {}
            }
        }
        self.open.pop();
        item
    }

    fn symbol_items(&mut self, symbol: SymbolId, name: &str, prefix: &str) -> Vec<ApiItem> {
        let table = self.ctx.table;
        self.decl_items(&table.symbol(symbol).declarations, name, prefix)
    }

    /// Items for the declarations of one symbol: one per overload, otherwise
    /// one per item kind with the declarations' members merged.
    fn decl_items(&mut self, decls: &[DeclId], name: &str, prefix: &str) -> Vec<ApiItem> {
        let mut groups: IndexMap<ApiItemKind, Vec<DeclId>> = IndexMap::new();
        for &decl in decls {
            if !self.is_trimmed(decl) {
                groups.entry(self.kind_of(decl)).or_default().push(decl);
            }
        }

        let table = self.ctx.table;
        let mut items = Vec::new();
        for (kind, decls) in groups {
            if table.decl(decls[0]).kind.is_overloadable() {
                for (i, &decl) in decls.iter().enumerate() {
                    items.push(self.item(kind, &[decl], name, prefix, Some(i + 1)));
                }
            } else {
                items.push(self.item(kind, &decls, name, prefix, None));
            }
        }
        items
    }

    fn item(
        &mut self,
        kind: ApiItemKind,
        decls: &[DeclId],
        name: &str,
        prefix: &str,
        overload_index: Option<usize>,
    ) -> ApiItem {
        let table = self.ctx.table;
        let release = self.ctx.release;
        let first = decls[0];
        let declaration = table.decl(first);

        let path = if declaration.kind.implicit_name().is_some() {
            prefix.trim_end_matches(['.', '#']).to_string()
        } else {
            format!("{prefix}{name}")
        };
        let overload = overload_index.map(|i| format!("({i})")).unwrap_or_default();
        let mut item = ApiItem::new(kind, format!("{path}:{}{overload}", kind.selector()), name);

        let modifiers = Modifier::canonical_order(&declaration.modifiers);
        let mut signature = String::new();
        for modifier in &modifiers {
            signature.push_str(modifier.keyword());
            signature.push(' ');
        }
        signature.push_str(&header_text(self.ctx, first));

        let doc = decls
            .iter()
            .map(|&decl| release.doc(decl))
            .find(|doc| !doc.summary.is_empty())
            .unwrap_or_else(|| release.doc(first));

        item.release_tag = Some(release.decl_tag(first));
        item.signature = signature;
        item.modifiers = modifiers;
        item.overload_index = overload_index;
        item.docs = ApiDocs::from(doc);

        let mut children: IndexMap<SymbolId, Vec<DeclId>> = IndexMap::new();
        for &decl in decls {
            let container = table.decl(decl);
            for &member in &container.members {
                let member_decl = table.decl(member);
                if container.kind == DeclarationKind::Namespace && !member_decl.exported {
                    continue;
                }
                children.entry(member_decl.symbol).or_default().push(member);
            }
        }
        let child_prefix = format!("{path}{}", kind.member_separator());
        for (symbol, decls) in children {
            let member_name = table.name(table.symbol(symbol).name);
            let members = self.decl_items(&decls, member_name, &child_prefix);
            item.members.extend(members);
        }
        item
    }

    fn kind_of(&self, decl: DeclId) -> ApiItemKind {
        let table = self.ctx.table;
        let declaration = table.decl(decl);
        let container = declaration.parent.map(|parent| table.decl(parent).kind);
        ApiItemKind::of(declaration.kind, container)
    }

    fn is_trimmed(&self, decl: DeclId) -> bool {
        let declaration = self.ctx.table.decl(decl);
        declaration.modifiers.contains(&Modifier::Private)
            || self
                .options
                .release_tags_to_trim
                .contains(&self.ctx.release.decl_tag(decl))
    }
}
