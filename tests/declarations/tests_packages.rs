use rstest::rstest;
use taihe_sema::lower::is_valid_package_name;
use taihe_sema::syntax::Spec;
use taihe_sema::{CompilerInstance, CompilerOptions, Severity, SourceFile};

use crate::helpers::*;

#[rstest]
#[case("ohos", true)]
#[case("ohos.net.http", true)]
#[case("_private.x1", true)]
#[case("", false)]
#[case("1abc", false)]
#[case("a..b", false)]
#[case("a.", false)]
#[case(".a", false)]
#[case("a-b", false)]
#[case("a.2b", false)]
fn test_package_names(#[case] name: &str, #[case] valid: bool) {
    assert_eq!(is_valid_package_name(name), valid);
}

#[test]
fn test_invalid_package_name_is_fatal_for_that_source_only() {
    let mut ci = CompilerInstance::new(CompilerOptions::default()).unwrap();
    ci.add_source(SourceFile::new("idl/ok.taihe", Spec::new().with_decl(plain_struct("S"))));
    ci.add_source(SourceFile::new("idl/bad-name.taihe", Spec::new()));
    assert!(!ci.run());
    assert_eq!(ci.diagnostics().current_level(), Severity::Fatal);
    assert_eq!(
        ci.diagnostics().diagnostics()[0].to_string(),
        "idl/bad-name.taihe: fatal error: invalid package name 'bad-name'"
    );
    assert!(ci.package_group().lookup("ok").is_some());
    assert_eq!(ci.package_group().packages().count(), 1);
}

#[test]
fn test_duplicate_package() {
    let mut ci = CompilerInstance::new(CompilerOptions::default()).unwrap();
    ci.add_source(SourceFile::new("a/p.taihe", Spec::new()));
    ci.add_source(SourceFile::new("b/p.taihe", Spec::new()));
    assert!(!ci.run());
    assert_eq!(
        ci.diagnostics().diagnostics()[0].to_string(),
        "b/p.taihe: error: redefinition of package p\na/p.taihe: note: previously defined here"
    );
}

#[test]
fn test_duplicate_declaration() {
    let spec = Spec::new()
        .with_decl(plain_struct("S"))
        .with_decl(plain_struct("S"));
    let ci = compile(vec![("p", spec)]);
    assert_eq!(errors(&ci), vec!["redefinition of struct S"]);
}
