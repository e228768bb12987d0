use rstest::rstest;
use taihe_sema::ir::ConstValue;
use taihe_sema::syntax::{Attr, Expr, GlobalFunction, Spec};

use crate::helpers::*;

fn function_with(attr: Attr) -> Spec {
    Spec::new().with_decl(GlobalFunction::new("onChange", vec![], None).with_attr(attr))
}

#[rstest]
#[case::missing(
    Attr::new("overload"),
    "Missing positional or keyword argument 'func_name' in attribute 'overload'."
)]
#[case::extra_positional(
    Attr::new("rename").arg(Expr::str("a")).arg(Expr::str("b")),
    "Unexpected positional argument in attribute 'rename'."
)]
#[case::unknown_keyword(
    Attr::new("rename").kwarg("alias", Expr::str("a")),
    "Unexpected keyword argument 'alias' in attribute 'rename'."
)]
#[case::positional_after_keyword(
    Attr::new("on_off").kwarg("name", Expr::str("x")).arg(Expr::str("change")),
    "Positioned arguments cannot follow keyword arguments in attribute calls."
)]
#[case::repeated_keyword(
    Attr::new("overload")
        .kwarg("func_name", Expr::str("a"))
        .kwarg("func_name", Expr::str("b")),
    "redefinition of key 'func_name'"
)]
#[case::wrong_type(
    Attr::new("overload").arg(Expr::int("1")),
    "Argument 'func_name' in attribute overload must be of type str, but got 1"
)]
#[case::bool_is_not_str(
    Attr::new("overload").arg(Expr::bool(true)),
    "Argument 'func_name' in attribute overload must be of type str, but got true"
)]
fn test_argument_errors(#[case] attr: Attr, #[case] message: &str) {
    let ci = compile(vec![("p", function_with(attr))]);
    assert_eq!(errors(&ci), vec![message]);
    let func = decl(&ci, "p", "onChange");
    assert!(ci.package_group().node(func).attrs.is_empty());
}

#[test]
fn test_keyword_only_field_cannot_be_positional() {
    // `on_off(type, *, name)`: the second positional has nowhere to go.
    let attr = Attr::new("on_off").arg(Expr::str("change")).arg(Expr::str("x"));
    let ci = compile(vec![("p", function_with(attr))]);
    assert_eq!(
        errors(&ci),
        vec!["Unexpected positional argument in attribute 'on_off'."]
    );
}

#[test]
fn test_defaults_and_keywords() {
    let attr = Attr::new("on_off")
        .arg(Expr::str("change"))
        .kwarg("name", Expr::str("watch"));
    let ci = compile(vec![("p", function_with(attr))]);
    assert_no_errors(&ci);
    let func = decl(&ci, "p", "onChange");
    let on_off = ci
        .registry()
        .get_single(ci.package_group(), func, "on_off")
        .expect("attribute attached");
    assert_eq!(on_off.get_str("type"), Some("change"));
    assert_eq!(on_off.get_str("name"), Some("watch"));

    let ci = compile(vec![("p", function_with(Attr::new("rename")))]);
    let func = decl(&ci, "p", "onChange");
    let rename = ci
        .registry()
        .get_single(ci.package_group(), func, "rename")
        .expect("attribute attached");
    assert_eq!(rename.get("name"), Some(&ConstValue::Str("".into())));
}

#[rstest]
#[case("renam", "Unknown attribute: 'renam', possible candidates: 'rename'")]
#[case("xyzzy", "Unknown attribute: 'xyzzy'")]
fn test_unknown_attribute(#[case] name: &str, #[case] message: &str) {
    let ci = compile(vec![("p", function_with(Attr::new(name)))]);
    assert_eq!(errors(&ci), vec![message]);
}
