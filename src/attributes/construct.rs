//! Mapping call-style arguments onto a schema.

use indexmap::IndexMap;
use smol_str::SmolStr;
use tracing::trace;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::ir::{Argument, AttrId, CheckedAttribute, UncheckedAttribute};

use super::schema::{AttrSchema, Presence};

/// Positional arguments and keyword arguments, in source order.
struct SplitArgs<'a> {
    positional: Vec<&'a Argument>,
    keyword: IndexMap<SmolStr, &'a Argument>,
}

fn split_args(args: &[Argument]) -> Result<SplitArgs<'_>, Diagnostic> {
    let mut positional = Vec::new();
    let mut keyword: IndexMap<SmolStr, &Argument> = IndexMap::new();
    for arg in args {
        match &arg.key {
            None if !keyword.is_empty() => {
                return Err(Diagnostic::new(DiagnosticKind::AttrArgOrder, arg.loc.clone()));
            }
            None => positional.push(arg),
            Some(key) => {
                if let Some(prev) = keyword.get(key) {
                    let diag = Diagnostic::new(
                        DiagnosticKind::AttrArgRedef { key: key.clone() },
                        arg.loc.clone(),
                    );
                    return Err(match &prev.loc {
                        Some(loc) => diag.with_note(Some(loc.clone()), "previously defined here"),
                        None => diag,
                    });
                }
                keyword.insert(key.clone(), arg);
            }
        }
    }
    Ok(SplitArgs {
        positional,
        keyword,
    })
}

/// Validate `raw` against `schema`.
///
/// The first problem aborts construction; nothing is partially attached.
pub fn construct(
    id: AttrId,
    schema: &AttrSchema,
    raw: &UncheckedAttribute,
) -> Result<CheckedAttribute, Diagnostic> {
    let SplitArgs {
        mut positional,
        mut keyword,
    } = split_args(&raw.args)?;
    positional.reverse();

    let mut fields = IndexMap::new();
    for field in &schema.fields {
        let taken = match keyword.shift_remove(&field.name) {
            Some(arg) => Some(arg),
            None if field.kw_only => None,
            None => positional.pop(),
        };
        let Some(arg) = taken else {
            match &field.presence {
                Presence::Default(value) => {
                    fields.insert(field.name.clone(), value.clone());
                }
                Presence::Optional => {}
                Presence::Required => {
                    return Err(Diagnostic::new(
                        DiagnosticKind::AttrArgMissing {
                            attr: schema.name.clone(),
                            arg: field.name.clone(),
                            kw_only: field.kw_only,
                        },
                        raw.loc.clone(),
                    ));
                }
            }
            continue;
        };
        if !field.accepts(&arg.value) {
            return Err(Diagnostic::new(
                DiagnosticKind::AttrArgType {
                    attr: schema.name.clone(),
                    arg: field.name.clone(),
                    expected: field.type_names(),
                    got: arg.value.to_json(),
                },
                arg.loc.clone(),
            ));
        }
        fields.insert(field.name.clone(), arg.value.clone());
    }

    if let Some(extra) = positional.last().copied().or_else(|| keyword.values().next().copied()) {
        return Err(Diagnostic::new(
            DiagnosticKind::AttrArgUnrequired {
                attr: schema.name.clone(),
                key: extra.key.clone(),
            },
            extra.loc.clone(),
        ));
    }

    trace!(attr = %schema.name, fields = fields.len(), "constructed attribute");
    Ok(CheckedAttribute {
        id,
        name: schema.name.clone(),
        fields,
        loc: raw.loc.clone(),
    })
}
