use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::error::{ShaderError, StageKind};

/// A stage that parsed and validated, with its entry point resolved.
#[derive(Debug, Clone)]
pub struct CompiledStage {
    pub kind: StageKind,
    pub label: String,
    pub source: String,
    pub entry_point: String,
    pub module: naga::Module,
}

/// Parses and validates one WGSL stage.
///
/// The module must contain exactly one entry point of the requested stage.
pub fn compile_stage(
    kind: StageKind,
    label: &str,
    source: &str,
) -> Result<CompiledStage, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage: kind,
        log: e.emit_to_string_with_path(source, label),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|e| ShaderError::Compile {
            stage: kind,
            log: e.emit_to_string_with_path(source, label),
        })?;

    let mut entries = module
        .entry_points
        .iter()
        .filter(|ep| ep.stage == kind.naga_stage());

    let entry_point = match (entries.next(), entries.next()) {
        (Some(ep), None) => ep.name.clone(),
        (None, _) => {
            return Err(ShaderError::Compile {
                stage: kind,
                log: format!("{label}: no @{kind} entry point"),
            });
        }
        (Some(_), Some(_)) => {
            return Err(ShaderError::Compile {
                stage: kind,
                log: format!("{label}: more than one @{kind} entry point"),
            });
        }
    };

    log::debug!("compiled {kind} stage {label} (entry `{entry_point}`)");

    Ok(CompiledStage {
        kind,
        label: label.to_owned(),
        source: source.to_owned(),
        entry_point,
        module,
    })
}
