//! Attribute data carried by declarations.
//!
//! Validation lives in [`crate::attributes`]; this module only stores what
//! the parser produced and what validation attached.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::SourceLocation;

use super::ConstValue;

/// One evaluated argument of an attribute call.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// `None` for positional arguments.
    pub key: Option<SmolStr>,
    pub value: ConstValue,
    pub loc: Option<SourceLocation>,
}

/// An attribute as written in the source, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct UncheckedAttribute {
    pub name: SmolStr,
    pub args: Vec<Argument>,
    /// Location of the attribute name.
    pub loc: Option<SourceLocation>,
}

/// Handle of an attribute schema in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttrId(u32);

impl AttrId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// An attribute that passed schema validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedAttribute {
    pub id: AttrId,
    pub name: SmolStr,
    /// Field values in schema order. Optional fields that were not given
    /// are absent.
    pub fields: IndexMap<SmolStr, ConstValue>,
    pub loc: Option<SourceLocation>,
}

impl CheckedAttribute {
    pub fn get(&self, field: &str) -> Option<&ConstValue> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(ConstValue::as_str)
    }

    /// The attribute as keyword arguments, one per present field.
    pub fn args(&self) -> Vec<Argument> {
        self.fields
            .iter()
            .map(|(key, value)| Argument {
                key: Some(key.clone()),
                value: value.clone(),
                loc: None,
            })
            .collect()
    }

    pub fn description(&self) -> String {
        describe_attr(&self.name, &self.args())
    }
}

impl UncheckedAttribute {
    pub fn description(&self) -> String {
        describe_attr(&self.name, &self.args)
    }
}

/// Render `name(arg, key=value)`; values in JSON form.
pub fn format_attr(name: &str, args: &[Argument]) -> String {
    if args.is_empty() {
        return name.to_string();
    }
    let rendered: Vec<String> = args
        .iter()
        .map(|arg| match &arg.key {
            Some(key) => format!("{key}={}", arg.value.to_json()),
            None => arg.value.to_json(),
        })
        .collect();
    format!("{name}({})", rendered.join(", "))
}

fn describe_attr(name: &str, args: &[Argument]) -> String {
    format!("attribute {}", format_attr(name, args))
}

/// Attributes attached to one declaration.
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    /// Parsed attributes waiting for validation, in source order.
    pub unchecked: Vec<UncheckedAttribute>,
    /// Validated attributes grouped by schema, in first-attach order.
    pub checked: IndexMap<AttrId, Vec<CheckedAttribute>>,
}

impl AttributeSet {
    pub fn push_unchecked(&mut self, attr: UncheckedAttribute) {
        self.unchecked.push(attr);
    }

    /// Remove and return every unchecked attribute.
    pub fn take_unchecked(&mut self) -> Vec<UncheckedAttribute> {
        std::mem::take(&mut self.unchecked)
    }

    pub fn attach(&mut self, attr: CheckedAttribute) {
        self.checked.entry(attr.id).or_default().push(attr);
    }

    /// First instance of the given attribute.
    pub fn get_single(&self, id: AttrId) -> Option<&CheckedAttribute> {
        self.checked.get(&id).and_then(|attrs| attrs.first())
    }

    /// All instances of the given attribute, in attach order.
    pub fn get_all(&self, id: AttrId) -> &[CheckedAttribute] {
        self.checked.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every checked attribute, grouped by schema.
    pub fn iter_checked(&self) -> impl Iterator<Item = &CheckedAttribute> {
        self.checked.values().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.unchecked.is_empty() && self.checked.is_empty()
    }
}
