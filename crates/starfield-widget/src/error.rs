use std::fmt;
use std::path::PathBuf;

/// Shader stage a diagnostic refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub(crate) fn naga_stage(self) -> naga::ShaderStage {
        match self {
            StageKind::Vertex => naga::ShaderStage::Vertex,
            StageKind::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failures while building the shader pipeline.
///
/// Every variant leaves the pipeline invalid; none is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader asset {path}")]
    Read {
        stage: StageKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: StageKind, log: String },

    #[error("shader program failed to link:\n{log}")]
    Link { log: String },
}

/// Failures while uploading mesh data to the device.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("no mesh geometry to upload")]
    MissingGeometry,

    #[error("failed to allocate {kind} buffer: {reason}")]
    Allocation { kind: BufferKind, reason: String },
}

/// Role of a device buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKind::Vertex => f.write_str("vertex"),
            BufferKind::Index => f.write_str("index"),
        }
    }
}

/// One-line report of `err` and every error in its source chain.
pub(crate) fn describe<E>(err: E) -> String
where
    E: std::error::Error + Send + Sync + 'static,
{
    format!("{:#}", anyhow::Error::new(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn read_error_report_keeps_the_io_cause() {
        let err = ShaderError::Read {
            stage: StageKind::Vertex,
            path: PathBuf::from("/missing/vshader.wgsl"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        let report = describe(err);
        assert!(report.starts_with("failed to read vertex shader asset /missing/vshader.wgsl"));
        assert!(report.ends_with(": No such file or directory"), "{report}");
    }

    #[test]
    fn sourceless_error_report_is_its_message() {
        assert_eq!(describe(BufferError::MissingGeometry), "no mesh geometry to upload");
    }
}
