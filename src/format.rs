//! Render a package group back to IDL text.
//!
//! The output is meant for humans (debug dumps, `--print-ir` style
//! tooling), not for round-tripping: constant expressions appear as their
//! evaluated values and implicit types are omitted.

use crate::base::DeclId;
use crate::ir::{
    CheckedAttribute, DeclKind, FuncDecl, PackageGroup, Resolution, TypeRefKind, format_attr,
};

/// Printer configuration.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Spaces per indentation level.
    pub indent_size: usize,
    /// Append `/* signature */` after each resolved type reference and the
    /// target after each resolved import.
    pub show_resolved: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            show_resolved: false,
        }
    }
}

impl FormatOptions {
    pub fn with_resolved(mut self, show: bool) -> Self {
        self.show_resolved = show;
        self
    }

    fn indent(&self, level: usize) -> String {
        " ".repeat(self.indent_size * level)
    }
}

/// Format every package of `pg`, separated by blank lines.
pub fn format_group(pg: &PackageGroup, options: FormatOptions) -> String {
    let mut printer = PrettyPrinter::new(pg, options);
    printer.write_group();
    printer.finish()
}

pub struct PrettyPrinter<'a> {
    pg: &'a PackageGroup,
    options: FormatOptions,
    out: String,
    level: usize,
}

impl<'a> PrettyPrinter<'a> {
    pub fn new(pg: &'a PackageGroup, options: FormatOptions) -> Self {
        Self {
            pg,
            options,
            out: String::new(),
            level: 0,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(&self.options.indent(self.level));
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Write `prologue`, the indented body and `epilogue`, or both on one
    /// line when there is no body.
    fn block(&mut self, prologue: String, children: &[DeclId], mut write: impl FnMut(&mut Self, DeclId)) {
        if children.is_empty() {
            self.line(&format!("{prologue}}}"));
            return;
        }
        self.line(&prologue);
        self.level += 1;
        for &child in children {
            write(self, child);
        }
        self.level -= 1;
        self.line("}");
    }

    // ========================================================================
    // ATTRIBUTES
    // ========================================================================

    /// Rendered attributes of a node: checked ones, then any that have not
    /// been validated yet.
    fn attrs(&self, id: DeclId) -> Vec<String> {
        let attrs = &self.pg.node(id).attrs;
        attrs
            .iter_checked()
            .map(render_checked)
            .chain(
                attrs
                    .unchecked
                    .iter()
                    .map(|attr| format_attr(&attr.name, &attr.args)),
            )
            .collect()
    }

    fn write_attrs(&mut self, id: DeclId) {
        for attr in self.attrs(id) {
            self.line(&format!("@{attr}"));
        }
    }

    fn inline_attrs(&self, id: DeclId, text: String, bracket: bool) -> String {
        let attrs: Vec<String> = self.attrs(id).into_iter().map(|a| format!("@{a}")).collect();
        if attrs.is_empty() {
            return text;
        }
        let joined = attrs.join(" ");
        if bracket {
            format!("[{joined}] {text}")
        } else {
            format!("{joined} {text}")
        }
    }

    // ========================================================================
    // TYPE REFERENCES
    // ========================================================================

    /// An explicit type reference, or `None` for an omitted one.
    pub fn type_ref(&self, id: DeclId) -> Option<String> {
        let ty_ref = self.pg.type_ref(id)?;
        let text = match &ty_ref.kind {
            TypeRefKind::Implicit(_) => return None,
            TypeRefKind::Short { symbol } => symbol.to_string(),
            TypeRefKind::Long { pkg_name, symbol } => format!("{pkg_name}.{symbol}"),
            TypeRefKind::Generic { symbol, args } => {
                let args: Vec<String> = args
                    .iter()
                    .map(|&arg| self.type_ref(arg).unwrap_or_default())
                    .collect();
                format!("{symbol}<{}>", args.join(", "))
            }
            TypeRefKind::Callback { params, ret } => {
                let ret = self.type_ref(*ret).unwrap_or_else(|| "void".to_string());
                format!("({}) => {ret}", self.params(params))
            }
        };
        let text = self.inline_attrs(id, text, false);
        if !self.options.show_resolved {
            return Some(text);
        }
        let comment = match &ty_ref.resolved {
            None => return Some(text),
            Some(Resolution::Resolved(ty)) => ty.signature(),
            Some(Resolution::Invalid) => "<ERROR>".to_string(),
        };
        Some(format!("{text} /* {comment} */"))
    }

    fn params(&self, params: &[DeclId]) -> String {
        let rendered: Vec<String> = params
            .iter()
            .filter_map(|&param| match self.pg.kind(param) {
                DeclKind::Param(p) => {
                    let ty = self.type_ref(p.ty_ref).unwrap_or_default();
                    Some(self.inline_attrs(param, format!("{}: {ty}", p.name), false))
                }
                _ => None,
            })
            .collect();
        rendered.join(", ")
    }

    fn resolved_comment(&self, resolved: Option<&Resolution<DeclId>>) -> String {
        if !self.options.show_resolved {
            return String::new();
        }
        match resolved {
            None => String::new(),
            Some(Resolution::Resolved(target)) => {
                format!(" /* {} */", self.pg.description(*target))
            }
            Some(Resolution::Invalid) => " /* <ERROR> */".to_string(),
        }
    }

    fn package_ref(&self, id: DeclId) -> String {
        match self.pg.kind(id) {
            DeclKind::PackageRef(d) => {
                format!("{}{}", d.symbol, self.resolved_comment(d.resolved.as_ref()))
            }
            _ => String::new(),
        }
    }

    // ========================================================================
    // DECLARATIONS
    // ========================================================================

    pub fn write_group(&mut self) {
        let packages: Vec<DeclId> = self.pg.packages().collect();
        for (i, pkg) in packages.into_iter().enumerate() {
            if i != 0 {
                self.out.push('\n');
            }
            self.write_package(pkg);
        }
    }

    pub fn write_package(&mut self, id: DeclId) {
        let Some(pkg) = self.pg.package(id) else {
            return;
        };
        self.line(&format!("// {}", pkg.name));
        for attr in self.attrs(id) {
            self.line(&format!("@!{attr}"));
        }
        let children: Vec<DeclId> = pkg
            .pkg_imports
            .values()
            .chain(pkg.decl_imports.values())
            .chain(pkg.decls.values())
            .copied()
            .collect();
        for child in children {
            self.write_decl(child);
        }
    }

    pub fn write_decl(&mut self, id: DeclId) {
        self.write_attrs(id);
        let pg = self.pg;
        match pg.kind(id) {
            DeclKind::PackageImport(d) => {
                let target = self.package_ref(d.pkg_ref);
                if d.is_alias {
                    self.line(&format!("use {target} as {};", d.name));
                } else {
                    self.line(&format!("use {target};"));
                }
            }
            DeclKind::DeclarationImport(d) => {
                let DeclKind::DeclarationRef(r) = pg.kind(d.decl_ref) else {
                    return;
                };
                let pkg = self.package_ref(r.pkg_ref);
                let symbol = format!("{}{}", r.symbol, self.resolved_comment(r.resolved.as_ref()));
                if d.is_alias {
                    self.line(&format!("from {pkg} use {symbol} as {};", d.name));
                } else {
                    self.line(&format!("from {pkg} use {symbol};"));
                }
            }
            DeclKind::Enum(d) => {
                let ty = self.type_ref(d.ty_ref).unwrap_or_default();
                self.block(format!("enum {}: {ty} {{", d.name), &d.items, Self::write_decl);
            }
            DeclKind::EnumItem(d) => match &d.value {
                Some(value) => self.line(&format!("{} = {},", d.name, value.to_json())),
                None => self.line(&format!("{},", d.name)),
            },
            DeclKind::Struct(d) => {
                self.block(format!("struct {} {{", d.name), &d.fields, Self::write_decl);
            }
            DeclKind::Union(d) => {
                self.block(format!("union {} {{", d.name), &d.fields, Self::write_decl);
            }
            DeclKind::StructField(d) | DeclKind::UnionField(d) => match self.type_ref(d.ty_ref) {
                Some(ty) => self.line(&format!("{}: {ty};", d.name)),
                None => self.line(&format!("{};", d.name)),
            },
            DeclKind::Iface(d) => {
                let parents: Vec<String> = d
                    .parents
                    .iter()
                    .filter_map(|&parent| {
                        let ty = self.type_ref(pg.kind(parent).ty_ref()?)?;
                        Some(self.inline_attrs(parent, ty, true))
                    })
                    .collect();
                let head = if parents.is_empty() {
                    d.name.to_string()
                } else {
                    format!("{}: {}", d.name, parents.join(", "))
                };
                self.block(format!("interface {head} {{"), &d.methods, Self::write_decl);
            }
            DeclKind::IfaceMethod(d) => {
                let sig = self.signature(d);
                self.line(&sig);
            }
            DeclKind::GlobalFunc(d) => {
                let sig = self.signature(d);
                self.line(&format!("function {sig}"));
            }
            DeclKind::Package(_)
            | DeclKind::PackageRef(_)
            | DeclKind::DeclarationRef(_)
            | DeclKind::IfaceParent(_)
            | DeclKind::Param(_)
            | DeclKind::TypeRef(_) => {}
        }
    }

    fn signature(&self, func: &FuncDecl) -> String {
        let params = self.params(&func.params);
        match self.type_ref(func.ret) {
            Some(ret) => format!("{}({params}): {ret};", func.name),
            None => format!("{}({params});", func.name),
        }
    }
}

fn render_checked(attr: &CheckedAttribute) -> String {
    format_attr(&attr.name, &attr.args())
}
