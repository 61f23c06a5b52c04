use naga::{AddressSpace, Binding, Handle, Module, Scalar, Type, TypeInner, VectorSize};

use super::CompiledStage;
use crate::error::ShaderError;

/// Vertex attribute fed from the quad vertex buffer.
pub const POSITION_ATTRIBUTE: &str = "vPosition";
/// Per-draw uniform holding the star offset.
pub const TRANSLATION_UNIFORM: &str = "translation";

/// Resolved bind points of a linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLayout {
    pub vertex_entry: String,
    pub fragment_entry: String,
    /// `@location` of `vPosition`.
    pub position_location: u32,
    /// `@binding` of `translation` inside bind group 0.
    pub translation_binding: u32,
}

/// A `@location` slot seen in a stage interface.
struct Slot<'m> {
    name: Option<&'m str>,
    location: u32,
    ty: &'m TypeInner,
}

/// Checks that both stages fit together and resolve the named bind points.
///
/// Every problem found is reported in one log, one line each.
pub fn link(vertex: &CompiledStage, fragment: &CompiledStage) -> Result<ProgramLayout, ShaderError> {
    let mut problems = Vec::new();

    let vs = entry_point(vertex)?;
    let fs = entry_point(fragment)?;

    // Stage interface: every fragment input must be produced by the vertex stage.
    let mut vs_outputs = Vec::new();
    if let Some(result) = &vs.function.result {
        collect_slots(&vertex.module, result.ty, None, result.binding.as_ref(), &mut vs_outputs);
    }

    let mut fs_inputs = Vec::new();
    for arg in &fs.function.arguments {
        collect_slots(&fragment.module, arg.ty, arg.name.as_deref(), arg.binding.as_ref(), &mut fs_inputs);
    }

    for input in &fs_inputs {
        match vs_outputs.iter().find(|o| o.location == input.location) {
            None => problems.push(format!(
                "fragment input @location({}) is not written by the vertex stage",
                input.location
            )),
            Some(output) if output.ty != input.ty => problems.push(format!(
                "@location({}) type mismatch: vertex writes {:?}, fragment reads {:?}",
                input.location, output.ty, input.ty
            )),
            Some(_) => {}
        }
    }

    let mut fs_outputs = Vec::new();
    if let Some(result) = &fs.function.result {
        collect_slots(&fragment.module, result.ty, None, result.binding.as_ref(), &mut fs_outputs);
    }
    match fs_outputs.iter().find(|o| o.location == 0) {
        None => problems.push("fragment stage does not write a color to @location(0)".to_owned()),
        Some(color) if !is_float_color(color.ty) => problems.push(format!(
            "fragment color @location(0) must be f32 or a vector of f32, found {:?}",
            color.ty
        )),
        Some(_) => {}
    }

    // Attribute.
    let mut vs_inputs = Vec::new();
    for arg in &vs.function.arguments {
        collect_slots(&vertex.module, arg.ty, arg.name.as_deref(), arg.binding.as_ref(), &mut vs_inputs);
    }

    let position_location = match vs_inputs.iter().find(|s| s.name == Some(POSITION_ATTRIBUTE)) {
        Some(slot) if is_vec4_f32(slot.ty) => Some(slot.location),
        Some(_) => {
            problems.push(format!("attribute `{POSITION_ATTRIBUTE}` must be vec4<f32>"));
            None
        }
        None => {
            problems.push(format!("vertex stage has no `{POSITION_ATTRIBUTE}` attribute"));
            None
        }
    };

    for slot in vs_inputs.iter().filter(|s| s.name != Some(POSITION_ATTRIBUTE)) {
        problems.push(format!(
            "vertex input @location({}) has no vertex buffer to read from",
            slot.location
        ));
    }

    // Uniform.
    let translation_binding = resolve_translation(&vertex.module, &mut problems);

    for (stage, module) in [("vertex", &vertex.module), ("fragment", &fragment.module)] {
        for (_, var) in module.global_variables.iter() {
            if var.binding.is_some() && var.name.as_deref() != Some(TRANSLATION_UNIFORM) {
                problems.push(format!(
                    "{stage} stage binds `{}`, which the program does not provide",
                    var.name.as_deref().unwrap_or("<unnamed>")
                ));
            }
        }
    }

    match (position_location, translation_binding) {
        (Some(position_location), Some(translation_binding)) if problems.is_empty() => {
            log::debug!(
                "linked {} + {}: {POSITION_ATTRIBUTE}@{position_location}, {TRANSLATION_UNIFORM}@{translation_binding}",
                vertex.label,
                fragment.label
            );
            Ok(ProgramLayout {
                vertex_entry: vertex.entry_point.clone(),
                fragment_entry: fragment.entry_point.clone(),
                position_location,
                translation_binding,
            })
        }
        _ => Err(ShaderError::Link { log: problems.join("\n") }),
    }
}

fn entry_point(stage: &CompiledStage) -> Result<&naga::EntryPoint, ShaderError> {
    stage
        .module
        .entry_points
        .iter()
        .find(|ep| ep.name == stage.entry_point && ep.stage == stage.kind.naga_stage())
        .ok_or_else(|| ShaderError::Link {
            log: format!("{}: entry point `{}` is missing", stage.label, stage.entry_point),
        })
}

/// Flattens a (possibly struct-typed) argument or result into location slots.
/// Built-ins are skipped.
fn collect_slots<'m>(
    module: &'m Module,
    ty: Handle<Type>,
    name: Option<&'m str>,
    binding: Option<&Binding>,
    out: &mut Vec<Slot<'m>>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(Slot {
            name,
            location: *location,
            ty: &module.types[ty].inner,
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_slots(module, member.ty, member.name.as_deref(), member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn resolve_translation(module: &Module, problems: &mut Vec<String>) -> Option<u32> {
    let Some((_, var)) = module
        .global_variables
        .iter()
        .find(|(_, v)| v.name.as_deref() == Some(TRANSLATION_UNIFORM))
    else {
        problems.push(format!("vertex stage has no `{TRANSLATION_UNIFORM}` uniform"));
        return None;
    };

    if var.space != AddressSpace::Uniform || !is_vec4_f32(&module.types[var.ty].inner) {
        problems.push(format!("`{TRANSLATION_UNIFORM}` must be var<uniform> vec4<f32>"));
        return None;
    }

    match &var.binding {
        Some(rb) if rb.group == 0 => Some(rb.binding),
        Some(rb) => {
            problems.push(format!(
                "`{TRANSLATION_UNIFORM}` must live in @group(0), found @group({})",
                rb.group
            ));
            None
        }
        None => {
            problems.push(format!("`{TRANSLATION_UNIFORM}` has no @binding"));
            None
        }
    }
}

/// Color targets are unorm/float formats, so only f32 outputs can feed them.
fn is_float_color(ty: &TypeInner) -> bool {
    match ty {
        TypeInner::Scalar(scalar) | TypeInner::Vector { scalar, .. } => *scalar == Scalar::F32,
        _ => false,
    }
}

fn is_vec4_f32(ty: &TypeInner) -> bool {
    matches!(
        ty,
        TypeInner::Vector { size: VectorSize::Quad, scalar } if *scalar == Scalar::F32
    )
}
