//! Enum domain check: fills in implicit item values and rejects values
//! outside the underlying type's domain.

use tracing::trace;

use crate::base::DeclId;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsManager};
use crate::ir::{ConstValue, DeclKind, PackageGroup};
use crate::types::{ScalarKind, Type, TypeKind};

/// Validity and successor rules for one underlying type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnumDomain {
    /// Half-open integer range `[min, max)`; values wrap from the top.
    Int { min: i128, max: i128 },
    Bool,
    Float,
    Str,
}

impl EnumDomain {
    pub fn of(ty: &Type) -> Option<EnumDomain> {
        match &ty.kind {
            TypeKind::String => Some(EnumDomain::Str),
            TypeKind::Scalar(ScalarKind::Bool) => Some(EnumDomain::Bool),
            TypeKind::Scalar(kind) if kind.is_float() => Some(EnumDomain::Float),
            TypeKind::Scalar(kind) => {
                let (min, max) = kind.int_range()?;
                Some(EnumDomain::Int { min, max })
            }
            _ => None,
        }
    }

    pub fn contains(&self, value: &ConstValue) -> bool {
        match (self, value) {
            (EnumDomain::Int { min, max }, ConstValue::Int(v)) => min <= v && v < max,
            (EnumDomain::Bool, ConstValue::Bool(_)) => true,
            (EnumDomain::Float, ConstValue::Float(v)) => v.is_finite(),
            (EnumDomain::Str, ConstValue::Str(_)) => true,
            _ => false,
        }
    }

    /// The value an item without an explicit value receives. `pred` is the
    /// value of the previous item, `None` for the first one.
    pub fn successor(&self, pred: Option<&ConstValue>, item_name: &str) -> ConstValue {
        match self {
            EnumDomain::Int { min, max } => match pred {
                Some(ConstValue::Int(pred)) => {
                    let next = pred + 1;
                    ConstValue::Int(if next < *max { next } else { *min })
                }
                _ => ConstValue::Int(0),
            },
            EnumDomain::Bool => ConstValue::Bool(false),
            EnumDomain::Float => ConstValue::Float(0.0),
            EnumDomain::Str => ConstValue::Str(item_name.into()),
        }
    }
}

/// Run the check over every enum, packages and declarations in order.
pub fn check_enums(pg: &mut PackageGroup, dm: &mut DiagnosticsManager) {
    for decl in pg.all_decls() {
        if matches!(pg.kind(decl), DeclKind::Enum(_)) {
            check_enum(pg, decl, dm);
        }
    }
}

/// Check one enum. Enums whose underlying type did not resolve are skipped.
///
/// An invalid explicit value is reported and replaced by the domain's
/// starting value, so the following items count on from there.
pub fn check_enum(pg: &mut PackageGroup, decl: DeclId, dm: &mut DiagnosticsManager) {
    let DeclKind::Enum(en) = pg.kind(decl) else {
        return;
    };
    let items = en.items.clone();
    let Some(ty) = pg.resolved_type(decl).cloned() else {
        return;
    };
    let Some(domain) = EnumDomain::of(&ty) else {
        return;
    };

    let mut pred: Option<ConstValue> = None;
    for item in items {
        let DeclKind::EnumItem(it) = pg.kind(item) else {
            continue;
        };
        let name = it.name.clone();
        let value = match &it.value {
            None => domain.successor(pred.as_ref(), &name),
            Some(value) if domain.contains(value) => value.clone(),
            Some(value) => {
                dm.emit(Diagnostic::new(
                    DiagnosticKind::EnumValue {
                        item: pg.description(item),
                        value: value.to_json(),
                        enum_decl: pg.description(decl),
                        ty: ty.signature(),
                    },
                    pg.node(item).loc.clone(),
                ));
                match domain {
                    EnumDomain::Str => ConstValue::Str(name.clone()),
                    _ => domain.successor(None, &name),
                }
            }
        };
        trace!(item = %name, value = %value.to_json(), "enum item value");
        if let DeclKind::EnumItem(it) = &mut pg.node_mut(item).kind {
            it.value = Some(value.clone());
        }
        pred = Some(value);
    }
}
