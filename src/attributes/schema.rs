//! Declarative attribute schemas.

use smol_str::SmolStr;

use crate::base::DeclId;
use crate::diagnostics::DiagnosticsManager;
use crate::ir::{CheckedAttribute, ConstValue, DeclTag, PackageGroup};

/// Dynamic type of an attribute argument. Matching is strict: an `Int`
/// field rejects `true`; list `.or(ValueType::Bool)` to take both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Str,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "str",
        }
    }

    /// Exact match; `true` is not an int and `1` is not a float.
    pub fn accepts(&self, value: &ConstValue) -> bool {
        matches!(
            (self, value),
            (ValueType::Bool, ConstValue::Bool(_))
                | (ValueType::Int, ConstValue::Int(_))
                | (ValueType::Float, ConstValue::Float(_))
                | (ValueType::Str, ConstValue::Str(_))
        )
    }
}

/// What happens when a field receives no argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    /// Report a missing argument.
    Required,
    /// Use this value.
    Default(ConstValue),
    /// Leave the field absent.
    Optional,
}

/// One field of an attribute schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: SmolStr,
    /// Accepted types, in the order they are listed in diagnostics.
    pub types: Vec<ValueType>,
    pub presence: Presence,
    /// Only settable as `name=value`.
    pub kw_only: bool,
}

impl FieldSpec {
    pub fn required(name: &str, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            types: vec![ty],
            presence: Presence::Required,
            kw_only: false,
        }
    }

    pub fn optional(name: &str, ty: ValueType) -> Self {
        Self {
            presence: Presence::Optional,
            ..Self::required(name, ty)
        }
    }

    pub fn with_default(name: &str, ty: ValueType, value: ConstValue) -> Self {
        Self {
            presence: Presence::Default(value),
            ..Self::required(name, ty)
        }
    }

    /// Also accept `ty`.
    pub fn or(mut self, ty: ValueType) -> Self {
        self.types.push(ty);
        self
    }

    pub fn kw_only(mut self) -> Self {
        self.kw_only = true;
        self
    }

    pub fn accepts(&self, value: &ConstValue) -> bool {
        self.types.iter().any(|ty| ty.accepts(value))
    }

    /// `str or int`
    pub fn type_names(&self) -> String {
        self.types
            .iter()
            .map(ValueType::name)
            .collect::<Vec<_>>()
            .join(" or ")
    }
}

/// A kind of declaration an attribute may be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclTarget {
    Any,
    /// Enums, structs, unions, interfaces and global functions.
    PackageLevel,
    /// Enums, structs, unions and interfaces.
    TypeDecl,
    Tag(DeclTag),
}

impl DeclTarget {
    pub fn matches(&self, tag: DeclTag) -> bool {
        match self {
            DeclTarget::Any => true,
            DeclTarget::PackageLevel => tag.is_package_level(),
            DeclTarget::TypeDecl => tag.is_type_decl(),
            DeclTarget::Tag(target) => *target == tag,
        }
    }
}

/// Attributes sharing a group are mutually exclusive on one declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttrGroup(pub &'static str);

/// Additional validation run after the target check passed and the
/// conflict checks reported. Reports through the diagnostics manager.
pub type ContextCheck = fn(&PackageGroup, DeclId, &CheckedAttribute, &mut DiagnosticsManager);

/// Everything the framework needs to validate one attribute.
#[derive(Debug, Clone)]
pub struct AttrSchema {
    pub name: SmolStr,
    pub targets: Vec<DeclTarget>,
    pub fields: Vec<FieldSpec>,
    pub groups: Vec<AttrGroup>,
    /// May be attached more than once to the same declaration.
    pub repeatable: bool,
    pub check: Option<ContextCheck>,
}

impl AttrSchema {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            targets: Vec::new(),
            fields: Vec::new(),
            groups: Vec::new(),
            repeatable: false,
            check: None,
        }
    }

    pub fn target(mut self, target: DeclTarget) -> Self {
        self.targets.push(target);
        self
    }

    pub fn on(self, tag: DeclTag) -> Self {
        self.target(DeclTarget::Tag(tag))
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn group(mut self, group: AttrGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn check(mut self, check: ContextCheck) -> Self {
        self.check = Some(check);
        self
    }

    pub fn accepts_target(&self, tag: DeclTag) -> bool {
        self.targets.iter().any(|target| target.matches(tag))
    }

    pub fn shares_group(&self, other: &AttrSchema) -> bool {
        self.groups.iter().any(|group| other.groups.contains(group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types_are_strict() {
        assert!(ValueType::Int.accepts(&ConstValue::Int(1)));
        assert!(!ValueType::Int.accepts(&ConstValue::Bool(true)));
        assert!(!ValueType::Float.accepts(&ConstValue::Int(1)));
        let field = FieldSpec::required("x", ValueType::Str).or(ValueType::Int);
        assert!(field.accepts(&ConstValue::Int(3)));
        assert_eq!(field.type_names(), "str or int");
        let flag = FieldSpec::required("n", ValueType::Int).or(ValueType::Bool);
        assert!(flag.accepts(&ConstValue::Bool(true)));
    }

    #[test]
    fn test_targets() {
        let schema = AttrSchema::new("x")
            .target(DeclTarget::PackageLevel)
            .on(DeclTag::Package);
        assert!(schema.accepts_target(DeclTag::GlobalFunc));
        assert!(schema.accepts_target(DeclTag::Package));
        assert!(!schema.accepts_target(DeclTag::Param));
        assert!(DeclTarget::TypeDecl.matches(DeclTag::Union));
        assert!(!DeclTarget::TypeDecl.matches(DeclTag::GlobalFunc));
    }

    #[test]
    fn test_groups() {
        const A: AttrGroup = AttrGroup("a");
        const B: AttrGroup = AttrGroup("b");
        let x = AttrSchema::new("x").group(A).group(B);
        let y = AttrSchema::new("y").group(B);
        let z = AttrSchema::new("z");
        assert!(x.shares_group(&y));
        assert!(!y.shares_group(&z));
    }
}
