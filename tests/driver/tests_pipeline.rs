use taihe_sema::syntax::{
    Attr, Enum, Expr, GlobalFunction, Interface, InterfaceFunction, Parameter, Spec, Struct,
    TypeExpr, Use,
};
use taihe_sema::{
    CompilerInstance, CompilerOptions, DeclPath, Diagnostic, DiagnosticsManager, Severity,
    SourceFile,
};

use crate::helpers::*;

// =============================================================================
// SEVERITY
// =============================================================================

#[test]
fn test_level_is_the_maximum_seen() {
    let mut dm = DiagnosticsManager::new();
    assert_eq!(dm.current_level(), Severity::Note);
    dm.emit(Diagnostic::adhoc(Severity::Note, "context", None));
    assert_eq!(dm.current_level(), Severity::Note);
    dm.emit(Diagnostic::error("broken", None));
    dm.emit(Diagnostic::warning("odd", None));
    assert_eq!(dm.current_level(), Severity::Error);
    assert!(dm.has_error());
    assert!(!dm.has_fatal());
    assert_eq!((dm.error_count(), dm.warning_count()), (1, 1));
    assert_eq!(
        dm.render(),
        "<unknown>: note: context\n<unknown>: error: broken\n<unknown>: warning: odd\n"
    );

    let taken = dm.take();
    assert_eq!(taken.len(), 3);
    assert_eq!(dm.current_level(), Severity::Note);
}

#[test]
fn test_warnings_do_not_block() {
    let mut ci = CompilerInstance::new(CompilerOptions::default()).unwrap();
    ci.add_source(SourceFile::new("README.md", Spec::new()));
    ci.add_source(SourceFile::new("p.taihe", Spec::new().with_decl(plain_struct("S"))));
    assert!(ci.run());
    assert_eq!(ci.diagnostics().current_level(), Severity::Warn);
}

#[test]
fn test_parse_then_run_converts_once() {
    let mut ci = CompilerInstance::new(CompilerOptions::default()).unwrap();
    ci.add_source(SourceFile::new("p.taihe", Spec::new().with_decl(plain_struct("S"))));
    assert!(ci.parse());
    assert!(ci.parse());

    ci.add_source(SourceFile::new("q.taihe", Spec::new().with_decl(plain_struct("T"))));
    assert!(ci.run());
    assert!(ci.diagnostics().diagnostics().is_empty());
    assert_eq!(ci.package_group().packages().count(), 2);
    assert_eq!(ci.sources().len(), 2);
}

#[test]
fn test_repeated_run_reports_once() {
    let mut ci = CompilerInstance::new(CompilerOptions::default()).unwrap();
    ci.add_source(SourceFile::new("p.taihe", Spec::new().with_decl(Struct::new("Empty"))));
    assert!(!ci.run());
    let first = ci.diagnostics().render();
    assert!(!ci.run());
    assert_eq!(ci.diagnostics().render(), first);
}

// =============================================================================
// PIPELINE
// =============================================================================

fn application() -> Vec<(&'static str, Spec)> {
    let base = Spec::new()
        .with_decl(Interface::new("Shape").method(InterfaceFunction::new(
            "getArea",
            vec![],
            Some(TypeExpr::short("f64")),
        )))
        .with_decl(
            Enum::new("Kind", TypeExpr::short("String"))
                .item("Circle", None)
                .item("Square", None),
        );
    let app = Spec::new()
        .with_inner_attr(Attr::new("namespace").arg(Expr::str("@ohos.shapes")))
        .with_use(Use::symbols("geo.base", &[("Shape", None), ("Kind", None)]))
        .with_decl(
            Interface::new("Circle")
                .extends(TypeExpr::short("Shape"))
                .method(
                    InterfaceFunction::new("getRadius", vec![], Some(TypeExpr::short("f64")))
                        .with_attr(Attr::new("get")),
                ),
        )
        .with_decl(GlobalFunction::new(
            "makeCircle",
            vec![
                Parameter::new("radius", TypeExpr::short("f64")),
                Parameter::new("kind", TypeExpr::short("Kind")),
            ],
            Some(TypeExpr::short("Circle")),
        ));
    vec![("geo.base", base), ("geo.app", app)]
}

#[test]
fn test_clean_application() {
    let ci = compile(application());
    assert_no_errors(&ci);
    assert!(ci.diagnostics().diagnostics().is_empty());

    let pg = ci.package_group();
    let app = pg.lookup("geo.app").unwrap();
    let namespace = ci.registry().get_single(pg, app, "namespace").unwrap();
    assert_eq!(namespace.get_str("module"), Some("@ohos.shapes"));
    assert_eq!(namespace.get("namespace"), None);

    let make = decl(&ci, "geo.app", "makeCircle");
    assert_eq!(ci.analysis::<DeclPath>(make).join("_"), "geo_app_makeCircle");
    assert_eq!(
        pg.resolved_type(make).map(|ty| ty.signature()).as_deref(),
        Some("geo.app.Circle")
    );
}

#[test]
fn test_formatting_with_resolved_types() {
    let options = CompilerOptions {
        print_resolved_types: true,
        ..CompilerOptions::default()
    };
    let ci = compile_with(options, application());
    let text = ci.format();
    assert!(text.starts_with("// geo.base\n"));
    assert!(text.contains("@!namespace(module=\"@ohos.shapes\")"));
    assert!(text.contains("from geo.base /* package geo.base */ use Shape /* interface Shape */"));
    assert!(text.contains("radius: f64 /* f64 */"));
    assert!(text.contains("kind: Kind /* geo.base.Kind */"));
}

#[test]
fn test_attribute_passes_can_be_skipped_after_errors() {
    let spec = || {
        Spec::new()
            .with_decl(struct_of("S", TypeExpr::short("Missing")))
            .with_decl(GlobalFunction::new("f", vec![], None).with_attr(Attr::new("bogus")))
    };

    let ci = compile(vec![("p", spec())]);
    assert_eq!(errors(&ci).len(), 2);

    let options = CompilerOptions {
        attributes_on_error: false,
        ..CompilerOptions::default()
    };
    let ci = compile_with(options, vec![("p", spec())]);
    assert_eq!(
        errors(&ci),
        vec!["declaration name 'Missing' is not declared or imported in this scope"]
    );
}

#[test]
fn test_passes_run_in_order() {
    let sources = vec![
        ("a.b", Spec::new().with_decl(struct_of("S", TypeExpr::short("Missing")))),
        (
            "a",
            Spec::new()
                .with_decl(plain_struct("b"))
                .with_decl(Enum::new("E", TypeExpr::short("u8")).item("X", Some(Expr::int("300"))))
                .with_decl(GlobalFunction::new("f", vec![], None).with_attr(Attr::new("const"))),
        ),
    ];
    let ci = compile(sources);
    let codes: Vec<&str> = ci
        .diagnostics()
        .diagnostics()
        .iter()
        .map(|d| d.kind.code())
        .collect();
    assert_eq!(
        codes,
        vec![
            "symbol-conflict-with-namespace",
            "decl-not-in-scope",
            "enum-value",
            "attr-target",
        ]
    );
}
