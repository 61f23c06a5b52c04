//! Shader source assets.
//!
//! Defaults are compiled into the binary and addressed as `builtin:<name>`;
//! any asset can be replaced by a file on disk.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ShaderError, StageKind};

pub const VERTEX_SHADER_NAME: &str = "vshader.wgsl";
pub const FRAGMENT_SHADER_NAME: &str = "fshader.wgsl";

const BUILTIN_VERTEX: &str = include_str!("../shaders/vshader.wgsl");
const BUILTIN_FRAGMENT: &str = include_str!("../shaders/fshader.wgsl");

/// Where a shader's text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderAsset {
    Builtin { name: &'static str, source: &'static str },
    File(PathBuf),
}

/// Shader text read at initialization, tagged with its logical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedShader {
    pub label: String,
    pub text: Cow<'static, str>,
}

impl ShaderAsset {
    pub fn builtin_vertex() -> Self {
        Self::Builtin {
            name: VERTEX_SHADER_NAME,
            source: BUILTIN_VERTEX,
        }
    }

    pub fn builtin_fragment() -> Self {
        Self::Builtin {
            name: FRAGMENT_SHADER_NAME,
            source: BUILTIN_FRAGMENT,
        }
    }

    /// Both default stage names resolved inside `dir`.
    pub fn pair_in_dir(dir: &Path) -> (Self, Self) {
        (
            Self::File(dir.join(VERTEX_SHADER_NAME)),
            Self::File(dir.join(FRAGMENT_SHADER_NAME)),
        )
    }

    /// Reads the asset. Builtins never fail.
    pub fn load(&self, stage: StageKind) -> Result<LoadedShader, ShaderError> {
        match self {
            Self::Builtin { source, .. } => Ok(LoadedShader {
                label: self.to_string(),
                text: Cow::Borrowed(source),
            }),
            Self::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
                    stage,
                    path: path.clone(),
                    source,
                })?;
                Ok(LoadedShader {
                    label: self.to_string(),
                    text: Cow::Owned(text),
                })
            }
        }
    }
}

impl fmt::Display for ShaderAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin { name, .. } => write!(f, "builtin:{name}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_label_is_logical_path() {
        let vs = ShaderAsset::builtin_vertex().load(StageKind::Vertex).unwrap();
        assert_eq!(vs.label, "builtin:vshader.wgsl");
        assert!(vs.text.contains("vs_main"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let asset = ShaderAsset::File(PathBuf::from("/nonexistent/starfield/fshader.wgsl"));
        let err = asset.load(StageKind::Fragment).unwrap_err();
        assert!(matches!(err, ShaderError::Read { stage: StageKind::Fragment, .. }));
    }

    #[test]
    fn pair_in_dir_uses_default_names() {
        let (vs, fs) = ShaderAsset::pair_in_dir(Path::new("assets"));
        assert_eq!(vs, ShaderAsset::File(PathBuf::from("assets/vshader.wgsl")));
        assert_eq!(fs, ShaderAsset::File(PathBuf::from("assets/fshader.wgsl")));
    }
}
