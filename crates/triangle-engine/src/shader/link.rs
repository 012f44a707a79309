use naga::{Binding, Handle, Module, ScalarKind, Type, TypeInner};

use crate::render::VertexLayout;

use super::compile::{CompiledStage, InfoLog};
use super::source::ShaderStage;

/// One `layout(location = N)` interface variable of an entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    name: String,
    location: u32,
    /// Component count and scalar kind; `None` for non-vector types.
    shape: Option<(u32, ScalarKind)>,
}

/// Checks that two compiled stages form a valid program for `layout`.
///
/// Rules:
/// - both stages compiled and have an entry point of their own stage
/// - every vertex input location is fed by a layout attribute with the same
///   component count and scalar kind
/// - every fragment input location is written by the vertex stage
pub fn link_stages(
    vertex: &CompiledStage,
    fragment: &CompiledStage,
    layout: &VertexLayout,
) -> Result<(), InfoLog> {
    let vs = stage_module(vertex, ShaderStage::Vertex)?;
    let fs = stage_module(fragment, ShaderStage::Fragment)?;

    let vs_inputs = entry_inputs(vs, ShaderStage::Vertex);
    let vs_outputs = entry_outputs(vs, ShaderStage::Vertex);
    let fs_inputs = entry_inputs(fs, ShaderStage::Fragment);

    let mut errors = Vec::new();

    for input in &vs_inputs {
        match layout.attribute_at(input.location) {
            None => errors.push(format!(
                "vertex input `{}` at location {} has no matching vertex attribute",
                input.name, input.location
            )),
            Some(attr) => match input.shape {
                Some((n, _)) if n != attr.format.components() => errors.push(format!(
                    "vertex input `{}` at location {} expects {} components, attribute provides {}",
                    input.name,
                    input.location,
                    n,
                    attr.format.components()
                )),
                Some((_, kind)) if kind != ScalarKind::Float => errors.push(format!(
                    "vertex input `{}` at location {} is {kind:?}, attribute provides Float",
                    input.name, input.location
                )),
                _ => {}
            },
        }
    }

    for input in &fs_inputs {
        if !vs_outputs.iter().any(|out| out.location == input.location) {
            errors.push(format!(
                "fragment input `{}` at location {} is not written by the vertex stage",
                input.name, input.location
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(InfoLog::bounded(errors.join("\n")))
    }
}

fn stage_module(compiled: &CompiledStage, expected: ShaderStage) -> Result<&Module, InfoLog> {
    if compiled.stage != expected {
        return Err(InfoLog::bounded(format!(
            "{} shader attached in the {expected} slot",
            compiled.stage
        )));
    }
    compiled
        .module()
        .ok_or_else(|| InfoLog::bounded(format!("{expected} shader is not compiled")))
}

fn entry_inputs(module: &Module, stage: ShaderStage) -> Vec<Slot> {
    let mut slots = Vec::new();
    let Some(ep) = module.entry_points.iter().find(|ep| ep.stage == stage.to_naga()) else {
        return slots;
    };
    for arg in &ep.function.arguments {
        let name = arg.name.clone().unwrap_or_default();
        collect_slots(module, &name, arg.ty, arg.binding.as_ref(), &mut slots);
    }
    slots
}

fn entry_outputs(module: &Module, stage: ShaderStage) -> Vec<Slot> {
    let mut slots = Vec::new();
    let Some(ep) = module.entry_points.iter().find(|ep| ep.stage == stage.to_naga()) else {
        return slots;
    };
    if let Some(result) = &ep.function.result {
        collect_slots(module, "", result.ty, result.binding.as_ref(), &mut slots);
    }
    slots
}

/// Pushes the location-bound slots of a value; struct values contribute
/// their members.
fn collect_slots(
    module: &Module,
    name: &str,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<Slot>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(Slot {
            name: name.to_string(),
            location: *location,
            shape: shape(&module.types[ty].inner),
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    let member_name = member.name.clone().unwrap_or_default();
                    collect_slots(module, &member_name, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn shape(inner: &TypeInner) -> Option<(u32, ScalarKind)> {
    match inner {
        TypeInner::Scalar(scalar) => Some((1, scalar.kind)),
        TypeInner::Vector { size, scalar } => Some((*size as u32, scalar.kind)),
        _ => None,
    }
}
