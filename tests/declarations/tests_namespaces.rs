use taihe_sema::syntax::Spec;

use crate::helpers::*;

#[test]
fn test_declaration_named_like_subpackage() {
    let ci = compile(vec![
        ("ohos.net", Spec::new()),
        ("ohos", Spec::new().with_decl(plain_struct("net"))),
    ]);
    assert_eq!(
        errors(&ci),
        vec!["declaration of struct net conflicts with namespace 'ohos.net'"]
    );
}

#[test]
fn test_deep_namespace_is_implied_by_every_prefix() {
    let ci = compile(vec![
        ("a.b.c", Spec::new()),
        ("a", Spec::new().with_decl(plain_struct("b"))),
    ]);
    let diags = ci.diagnostics().diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(
        diags[0].notes[0].message,
        "namespace 'a.b' is implied by package a.b.c"
    );
}

#[test]
fn test_sibling_names_do_not_conflict() {
    let ci = compile(vec![
        ("ohos.net", Spec::new().with_decl(plain_struct("Socket"))),
        ("ohos.fs", Spec::new().with_decl(plain_struct("net"))),
    ]);
    assert_no_errors(&ci);
}
