//! The attribute set understood by the bundled backends.

use tracing::trace;

use crate::base::DeclId;
use crate::diagnostics::{Diagnostic, DiagnosticsManager};
use crate::ir::{CheckedAttribute, ConstValue, DeclKind, DeclTag, FuncDecl, PackageGroup};
use crate::types::{ScalarKind, TypeKind};

use super::registry::{AttributeRegistry, RegistryError};
use super::schema::{AttrGroup, AttrSchema, DeclTarget, FieldSpec, ValueType};

pub const UNIT_GROUP: AttrGroup = AttrGroup("unit");
pub const PARAM_GROUP: AttrGroup = AttrGroup("param");
pub const ARRAY_GROUP: AttrGroup = AttrGroup("array");
pub const FUNCTION_KIND_GROUP: AttrGroup = AttrGroup("function-kind");
pub const OVERLOAD_KIND_GROUP: AttrGroup = AttrGroup("overload-kind");
pub const FUNCTION_SCOPE_GROUP: AttrGroup = AttrGroup("function-scope");

/// Register every standard attribute.
pub fn register_standard(registry: &mut AttributeRegistry) -> Result<(), RegistryError> {
    let schemas = standard_attributes();
    trace!(count = schemas.len(), "registering standard attributes");
    registry.register_all(schemas)
}

fn functions(schema: AttrSchema) -> AttrSchema {
    schema.on(DeclTag::GlobalFunc).on(DeclTag::IfaceMethod)
}

fn str_field(name: &str) -> FieldSpec {
    FieldSpec::required(name, ValueType::Str)
}

fn empty_default(name: &str) -> FieldSpec {
    FieldSpec::with_default(name, ValueType::Str, ConstValue::Str("".into()))
}

/// The standard schemas, in registration order.
pub fn standard_attributes() -> Vec<AttrSchema> {
    vec![
        // Packages
        AttrSchema::new("namespace")
            .on(DeclTag::Package)
            .field(str_field("module"))
            .field(FieldSpec::optional("namespace", ValueType::Str)),
        AttrSchema::new("sts_export_default")
            .target(DeclTarget::PackageLevel)
            .on(DeclTag::Package),
        AttrSchema::new("sts_inject")
            .on(DeclTag::Package)
            .field(str_field("sts_code"))
            .repeatable(),
        AttrSchema::new("sts_inject_into_module")
            .on(DeclTag::Package)
            .field(str_field("sts_code"))
            .repeatable(),
        AttrSchema::new("sts_inject_into_class")
            .on(DeclTag::Iface)
            .on(DeclTag::Struct)
            .field(str_field("sts_code"))
            .repeatable(),
        AttrSchema::new("sts_inject_into_interface")
            .on(DeclTag::Iface)
            .on(DeclTag::Struct)
            .field(str_field("sts_code"))
            .repeatable(),
        // Type declarations and fields
        AttrSchema::new("class").on(DeclTag::Iface).on(DeclTag::Struct),
        AttrSchema::new("const").on(DeclTag::Enum),
        AttrSchema::new("extends")
            .on(DeclTag::StructField)
            .check(check_extends),
        AttrSchema::new("readonly").on(DeclTag::StructField),
        AttrSchema::new("null")
            .on(DeclTag::UnionField)
            .on(DeclTag::StructField)
            .on(DeclTag::TypeRef)
            .group(UNIT_GROUP)
            .check(check_unit_field),
        AttrSchema::new("undefined")
            .on(DeclTag::UnionField)
            .on(DeclTag::StructField)
            .on(DeclTag::TypeRef)
            .group(UNIT_GROUP)
            .check(check_unit_field),
        AttrSchema::new("literal")
            .on(DeclTag::TypeRef)
            .field(str_field("value"))
            .group(UNIT_GROUP)
            .check(check_literal),
        AttrSchema::new("optional")
            .on(DeclTag::Param)
            .on(DeclTag::StructField)
            .check(check_optional),
        // Parameters
        AttrSchema::new("sts_this").on(DeclTag::Param).group(PARAM_GROUP),
        AttrSchema::new("sts_last").on(DeclTag::Param).group(PARAM_GROUP),
        AttrSchema::new("sts_fill")
            .on(DeclTag::Param)
            .field(str_field("content"))
            .group(PARAM_GROUP),
        // Type references
        AttrSchema::new("bigint")
            .on(DeclTag::TypeRef)
            .group(ARRAY_GROUP)
            .check(check_bigint),
        AttrSchema::new("arraybuffer")
            .on(DeclTag::TypeRef)
            .group(ARRAY_GROUP)
            .check(check_arraybuffer),
        AttrSchema::new("typedarray")
            .on(DeclTag::TypeRef)
            .group(ARRAY_GROUP)
            .check(check_typedarray),
        AttrSchema::new("fixedarray")
            .on(DeclTag::TypeRef)
            .group(ARRAY_GROUP)
            .check(check_fixedarray),
        AttrSchema::new("record")
            .on(DeclTag::TypeRef)
            .check(check_record),
        AttrSchema::new("sts_type")
            .on(DeclTag::TypeRef)
            .field(str_field("type_name")),
        // Functions
        functions(AttrSchema::new("rename")).field(empty_default("name")),
        functions(AttrSchema::new("overload")).field(str_field("func_name")),
        functions(AttrSchema::new("gen_async"))
            .field(FieldSpec::optional("func_name", ValueType::Str))
            .check(check_sync_suffix),
        functions(AttrSchema::new("gen_promise"))
            .field(FieldSpec::optional("func_name", ValueType::Str))
            .check(check_sync_suffix),
        AttrSchema::new("static")
            .on(DeclTag::GlobalFunc)
            .field(str_field("cls_name"))
            .group(FUNCTION_SCOPE_GROUP),
        AttrSchema::new("constructor")
            .on(DeclTag::GlobalFunc)
            .field(str_field("cls_name"))
            .group(FUNCTION_SCOPE_GROUP)
            .group(FUNCTION_KIND_GROUP),
        AttrSchema::new("ctor")
            .on(DeclTag::GlobalFunc)
            .field(str_field("cls_name"))
            .group(FUNCTION_SCOPE_GROUP)
            .group(FUNCTION_KIND_GROUP),
        functions(AttrSchema::new("get"))
            .field(FieldSpec::optional("member_name", ValueType::Str))
            .group(FUNCTION_KIND_GROUP)
            .check(check_getter),
        functions(AttrSchema::new("set"))
            .field(FieldSpec::optional("member_name", ValueType::Str))
            .group(FUNCTION_KIND_GROUP)
            .check(check_setter),
        functions(AttrSchema::new("async")).group(FUNCTION_KIND_GROUP),
        functions(AttrSchema::new("promise")).group(FUNCTION_KIND_GROUP),
        functions(AttrSchema::new("static_overload"))
            .field(empty_default("name"))
            .group(OVERLOAD_KIND_GROUP),
        functions(AttrSchema::new("on_off"))
            .field(FieldSpec::optional("type", ValueType::Str))
            .field(empty_default("name").kw_only())
            .group(OVERLOAD_KIND_GROUP)
            .check(check_on_off),
    ]
}

// ============================================================================
// HELPERS
// ============================================================================

fn error(dm: &mut DiagnosticsManager, attr: &CheckedAttribute, message: String) {
    dm.emit(Diagnostic::error(message, attr.loc.clone()));
}

/// The resolved type of `decl`, `None` when unresolved.
fn resolved_kind(pg: &PackageGroup, decl: DeclId) -> Option<&TypeKind> {
    pg.resolved_type(decl).map(|ty| &ty.kind)
}

fn array_item(pg: &PackageGroup, decl: DeclId) -> Option<Option<ScalarKind>> {
    match resolved_kind(pg, decl)? {
        TypeKind::Array(item) => Some(item.as_scalar()),
        _ => Some(None),
    }
}

fn func(pg: &PackageGroup, decl: DeclId) -> Option<&FuncDecl> {
    match pg.kind(decl) {
        DeclKind::GlobalFunc(f) | DeclKind::IfaceMethod(f) => Some(f),
        _ => None,
    }
}

/// Case-insensitive `prefix` followed by at least one more character.
fn has_prefix(name: &str, prefix: &str) -> bool {
    name.len() > prefix.len()
        && name
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn has_suffix(name: &str, suffix: &str) -> bool {
    name.len() > suffix.len()
        && name
            .get(name.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

// ============================================================================
// CONTEXT CHECKS
// ============================================================================

fn check_extends(pg: &PackageGroup, decl: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
    if matches!(resolved_kind(pg, decl), Some(kind) if !matches!(kind, TypeKind::Struct(_))) {
        error(
            dm,
            attr,
            format!(
                "Attribute '{}' can only be attached to struct fields with struct types.",
                attr.name
            ),
        );
    }
}

fn check_unit_field(pg: &PackageGroup, decl: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
    if pg.tag(decl) != DeclTag::TypeRef {
        dm.emit(Diagnostic::warning(
            format!(
                "Attachment of attribute '{}' to a field will be deprecated. Should be attached to a type reference instead.",
                attr.name
            ),
            attr.loc.clone(),
        ));
    }
    if matches!(resolved_kind(pg, decl), Some(kind) if *kind != TypeKind::Unit) {
        error(
            dm,
            attr,
            format!(
                "Attribute '{}' can only be attached to fields with unit type.",
                attr.name
            ),
        );
    }
}

fn check_literal(pg: &PackageGroup, decl: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
    if matches!(resolved_kind(pg, decl), Some(kind) if *kind != TypeKind::Unit) {
        error(
            dm,
            attr,
            format!("Attribute '{}' can only be attached to unit types.", attr.name),
        );
    }
}

fn check_optional(pg: &PackageGroup, decl: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
    if matches!(resolved_kind(pg, decl), Some(kind) if !matches!(kind, TypeKind::Optional(_))) {
        error(
            dm,
            attr,
            format!(
                "Attribute '{}' can only be attached to parameters or fields with optional types.",
                attr.name
            ),
        );
    }
}

fn check_bigint(pg: &PackageGroup, decl: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
    if let Some(item) = array_item(pg, decl) {
        if !item.is_some_and(|kind| kind.is_integer()) {
            error(
                dm,
                attr,
                format!(
                    "Attribute '{}' can only be attached to array types with integer items.",
                    attr.name
                ),
            );
        }
    }
}

fn check_arraybuffer(pg: &PackageGroup, decl: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
    if let Some(item) = array_item(pg, decl) {
        if !matches!(item, Some(ScalarKind::I8 | ScalarKind::U8)) {
            error(
                dm,
                attr,
                format!(
                    "Attribute '{}' can only be attached to array types with byte items.",
                    attr.name
                ),
            );
        }
    }
}

fn check_typedarray(pg: &PackageGroup, decl: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
    if let Some(item) = array_item(pg, decl) {
        if !item.is_some_and(|kind| kind.is_integer() || kind.is_float()) {
            error(
                dm,
                attr,
                format!(
                    "Attribute '{}' can only be attached to integer or float array types.",
                    attr.name
                ),
            );
        }
    }
}

fn check_fixedarray(pg: &PackageGroup, decl: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
    if matches!(resolved_kind(pg, decl), Some(kind) if !matches!(kind, TypeKind::Array(_))) {
        error(
            dm,
            attr,
            format!("Attribute '{}' can only be attached to array types.", attr.name),
        );
    }
}

fn check_record(pg: &PackageGroup, decl: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
    if matches!(resolved_kind(pg, decl), Some(kind) if !matches!(kind, TypeKind::Map(..))) {
        error(
            dm,
            attr,
            format!("Attribute '{}' can only be attached to map types.", attr.name),
        );
    }
}

fn check_sync_suffix(pg: &PackageGroup, decl: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
    let Some(f) = func(pg, decl) else { return };
    if attr.get("func_name").is_none() && !has_suffix(&f.name, "sync") {
        error(
            dm,
            attr,
            format!(
                "Attribute '{}' requires the function name to be specified when the function name does not end with 'sync'.",
                attr.name
            ),
        );
    }
}

fn check_getter(pg: &PackageGroup, decl: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
    let Some(f) = func(pg, decl) else { return };
    if !f.params.is_empty() {
        error(
            dm,
            attr,
            format!(
                "Attribute '{}' can only be attached to functions with no parameters and a return type.",
                attr.name
            ),
        );
    }
    if matches!(resolved_kind(pg, f.ret), Some(TypeKind::Void)) {
        error(
            dm,
            attr,
            format!(
                "Attribute '{}' can only be attached to functions with a non-void return type.",
                attr.name
            ),
        );
    }
    if attr.get("member_name").is_none() && !has_prefix(&f.name, "get") {
        error(
            dm,
            attr,
            format!(
                "Attribute '{}' requires the property name to be specified when the function name does not start with 'get'.",
                attr.name
            ),
        );
    }
}

fn check_setter(pg: &PackageGroup, decl: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
    let Some(f) = func(pg, decl) else { return };
    if f.params.len() != 1 {
        error(
            dm,
            attr,
            format!(
                "Attribute '{}' can only be attached to functions with one parameter.",
                attr.name
            ),
        );
    }
    if matches!(resolved_kind(pg, f.ret), Some(kind) if *kind != TypeKind::Void) {
        error(
            dm,
            attr,
            format!(
                "Attribute '{}' can only be attached to functions returning void.",
                attr.name
            ),
        );
    }
    if attr.get("member_name").is_none() && !has_prefix(&f.name, "set") {
        error(
            dm,
            attr,
            format!(
                "Attribute '{}' requires the property name to be specified when the function name does not start with 'set'.",
                attr.name
            ),
        );
    }
}

fn check_on_off(pg: &PackageGroup, decl: DeclId, attr: &CheckedAttribute, dm: &mut DiagnosticsManager) {
    let Some(f) = func(pg, decl) else { return };
    let name = attr.get_str("name").unwrap_or_default();
    if !name.is_empty() {
        let matches_name = f.name.chars().count() > name.chars().count()
            && f.name.to_lowercase().starts_with(&name.to_lowercase());
        if attr.get("type").is_none() && !matches_name {
            error(
                dm,
                attr,
                format!(
                    "Attribute '{}' requires the type to be specified when the function name does not start with '{name}'.",
                    attr.name
                ),
            );
        }
    } else if !has_prefix(&f.name, "on") && !has_prefix(&f.name, "off") {
        error(
            dm,
            attr,
            format!(
                "Attribute '{}' requires the function name to be specified when the function name does not start with 'on' or 'off'.",
                attr.name
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set_registers_cleanly() {
        let mut registry = AttributeRegistry::new();
        register_standard(&mut registry).unwrap();
        for name in ["namespace", "sts_inject", "class", "null", "get", "on_off", "constructor"] {
            assert!(registry.lookup(name).is_some(), "missing {name}");
        }
        assert!(register_standard(&mut registry).is_err());
    }

    #[test]
    fn test_schema_shapes() {
        let schemas = standard_attributes();
        let find = |name: &str| schemas.iter().find(|s| s.name == name).unwrap();
        assert!(find("sts_inject").repeatable);
        assert!(!find("class").repeatable);
        assert!(find("ctor").shares_group(find("static")));
        assert!(find("ctor").shares_group(find("get")));
        assert!(!find("get").shares_group(find("static")));
        assert!(find("on_off").fields[1].kw_only);
        assert!(find("sts_export_default").accepts_target(DeclTag::Struct));
    }

    #[test]
    fn test_name_affixes() {
        assert!(has_prefix("getName", "get"));
        assert!(!has_prefix("get", "get"));
        assert!(has_prefix("OnChange", "on"));
        assert!(has_suffix("fetchSync", "sync"));
        assert!(!has_suffix("sync", "sync"));
    }
}
