use tracing::debug;

use crate::classfile::{ClassFile, MethodInfo, method_modifiers};
use crate::descriptor::{MethodType, parse_method_descriptor, parse_method_signature};
use crate::error::Result;
use crate::render::MethodRecord;

/// One entry per method whose name matched: either its record or the reason
/// that single method could not be described.
pub type MethodOutcome = Result<MethodRecord>;

/// Extracts the methods named `method_filter` from class-file bytes.
///
/// An empty filter returns immediately without touching `bytes`. The outer
/// error means the class file itself is unreadable; inner errors are scoped
/// to one method and the remaining methods are still extracted.
pub fn extract(bytes: &[u8], method_filter: &str) -> Result<Vec<MethodOutcome>> {
    if method_filter.is_empty() {
        return Ok(Vec::new());
    }

    let class = ClassFile::parse(bytes)?;
    let owner = simple_name(class.name()?).to_string();
    let pool = &class.constant_pool;

    let mut outcomes = Vec::new();
    for method in &class.methods {
        let name = match pool.utf8(method.name_index) {
            Ok(name) => name,
            Err(e) => {
                outcomes.push(Err(e));
                continue;
            }
        };
        if name != method_filter {
            continue;
        }
        outcomes.push(method_record(&class, method, name, &owner));
    }

    Ok(outcomes)
}

fn method_record(
    class: &ClassFile,
    method: &MethodInfo,
    name: &str,
    owner: &str,
) -> Result<MethodRecord> {
    let pool = &class.constant_pool;
    let modifiers = method_modifiers(method.access_flags);

    if name == "<clinit>" {
        return Ok(MethodRecord {
            owner: owner.to_string(),
            modifiers,
            name: name.to_string(),
            is_static_initializer: true,
            ..Default::default()
        });
    }

    let erased = parse_method_descriptor(pool.utf8(method.descriptor_index)?)?;
    let generic = method.signature_index.and_then(|index| generic_type(class, index));

    let erased_throws = match &method.exception_indexes {
        Some(indexes) => indexes
            .iter()
            .map(|&i| pool.class_name(i).map(|n| n.replace('/', ".")))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    let MethodType {
        type_parameters,
        parameters,
        return_type,
        throws: generic_throws,
    } = generic.unwrap_or(erased);

    let thrown_types = if generic_throws.is_empty() {
        erased_throws
    } else {
        generic_throws
    };

    let is_constructor = name == "<init>";
    Ok(MethodRecord {
        owner: owner.to_string(),
        modifiers,
        type_parameters,
        return_type: if is_constructor { String::new() } else { return_type },
        name: name.to_string(),
        parameter_types: adjust_varargs(parameters),
        thrown_types,
        is_constructor,
        is_static_initializer: false,
    })
}

/// The `Signature` attribute is optional richness; any problem with it means
/// the erased descriptor is used instead.
fn generic_type(class: &ClassFile, index: u16) -> Option<MethodType> {
    let signature = match class.constant_pool.utf8(index) {
        Ok(s) => s,
        Err(e) => {
            debug!("ignoring signature attribute: {e}");
            return None;
        }
    };
    match parse_method_signature(signature) {
        Ok(t) => Some(t),
        Err(e) => {
            debug!("falling back to erased descriptor: {e}");
            None
        }
    }
}

/// Rewrites the rightmost `[]` of the parameter list to `...`.
///
/// This approximates source varargs from an erased array parameter without
/// consulting `ACC_VARARGS`, so a trailing plain array parameter (or an
/// earlier array parameter when later ones are not arrays) is rendered as
/// varargs too.
pub fn adjust_varargs(mut parameters: Vec<String>) -> Vec<String> {
    if let Some(param) = parameters.iter_mut().rev().find(|p| p.contains("[]"))
        && let Some(i) = param.rfind("[]")
    {
        param.replace_range(i..i + 2, "...");
    }
    parameters
}

fn simple_name(internal_name: &str) -> &str {
    let base = internal_name.rsplit('/').next().unwrap_or(internal_name);
    match base.rsplit_once('$') {
        Some((_, inner)) if !inner.is_empty() => inner,
        _ => base,
    }
}
