//! Shared builders and assertions for integration tests.

#![allow(dead_code)]

use taihe_sema::ir::DeclKind;
use taihe_sema::syntax::{Spec, Struct, TypeExpr};
use taihe_sema::{CompilerInstance, CompilerOptions, DeclId, Severity, SourceFile};

/// Compile `(package, spec)` pairs with the default options.
pub fn compile(sources: Vec<(&str, Spec)>) -> CompilerInstance {
    compile_with(CompilerOptions::default(), sources)
}

pub fn compile_with(options: CompilerOptions, sources: Vec<(&str, Spec)>) -> CompilerInstance {
    let mut ci = CompilerInstance::new(options).expect("standard attributes register");
    for (name, spec) in sources {
        ci.add_source(SourceFile::new(format!("{name}.taihe"), spec));
    }
    ci.run();
    ci
}

/// Messages of every diagnostic at exactly `severity`.
pub fn messages_at(ci: &CompilerInstance, severity: Severity) -> Vec<String> {
    ci.diagnostics()
        .diagnostics()
        .iter()
        .filter(|d| d.severity() == severity)
        .map(|d| d.message())
        .collect()
}

pub fn errors(ci: &CompilerInstance) -> Vec<String> {
    messages_at(ci, Severity::Error)
}

pub fn warnings(ci: &CompilerInstance) -> Vec<String> {
    messages_at(ci, Severity::Warn)
}

/// Assert compilation reported nothing at ERROR or above.
pub fn assert_no_errors(ci: &CompilerInstance) {
    assert!(
        !ci.diagnostics().has_error(),
        "Expected no errors, got:\n{}",
        ci.diagnostics().render()
    );
}

/// A struct with a single `i32` field.
pub fn plain_struct(name: &str) -> Struct {
    Struct::new(name).field("x", TypeExpr::short("i32"))
}

/// A struct with a single field of type `ty`.
pub fn struct_of(name: &str, ty: TypeExpr) -> Struct {
    Struct::new(name).field("f", ty)
}

/// Declaration `name` of package `pkg`.
pub fn decl(ci: &CompilerInstance, pkg: &str, name: &str) -> DeclId {
    let pg = ci.package_group();
    let pkg = pg.lookup(pkg).expect("package exists");
    pg.lookup_decl(pkg, name).expect("declaration exists")
}

/// Resolved signature of the first field of struct `pkg.name`.
pub fn first_field_type(ci: &CompilerInstance, pkg: &str, name: &str) -> Option<String> {
    let pg = ci.package_group();
    let DeclKind::Struct(st) = pg.kind(decl(ci, pkg, name)) else {
        panic!("{name} is not a struct");
    };
    pg.resolved_type(st.fields[0]).map(|ty| ty.signature())
}
