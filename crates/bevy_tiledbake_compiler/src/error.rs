use thiserror::Error;

use crate::decode::DecodeError;
use crate::parse::ParseError;
use crate::protocol::SerializeError;

/// Any failure while compiling a map or tileset.
///
/// Failures deep in the graph are wrapped in [`CompileError::InFile`],
/// [`CompileError::InLayer`] and [`CompileError::InObject`] so the message
/// says where they happened. [`CompileError::root_cause`] strips that context.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("template cycle: {}", chain.join(" -> "))]
    TemplateCycle { chain: Vec<String> },

    #[error("missing reference '{path}': {reason}")]
    MissingReference { path: String, reason: String },

    #[error("tilesets '{first}' and '{second}' have overlapping global id ranges")]
    OverlappingTilesets { first: String, second: String },

    #[error("tileset '{tileset}' reaches global id {gid}, which collides with the flip flags")]
    GidOutOfRange { tileset: String, gid: u64 },

    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error("{path}: {source}")]
    InFile {
        path: String,
        source: Box<CompileError>,
    },

    #[error("layer '{layer}': {source}")]
    InLayer {
        layer: String,
        source: Box<CompileError>,
    },

    #[error("object {object}: {source}")]
    InObject {
        object: String,
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// The underlying error, with file/layer/object context removed.
    pub fn root_cause(&self) -> &CompileError {
        match self {
            CompileError::InFile { source, .. }
            | CompileError::InLayer { source, .. }
            | CompileError::InObject { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn in_file(self, path: impl Into<String>) -> Self {
        CompileError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_layer(self, layer: impl Into<String>) -> Self {
        CompileError::InLayer {
            layer: layer.into(),
            source: Box::new(self),
        }
    }

    pub(crate) fn in_object(self, object: impl Into<String>) -> Self {
        CompileError::InObject {
            object: object.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_strips_context() {
        let error = CompileError::Decode(DecodeError::UnsupportedEncoding("rle".into()))
            .in_layer("Ground")
            .in_file("maps/level1.tmx");

        assert_eq!(
            error.to_string(),
            "maps/level1.tmx: layer 'Ground': unsupported tile data encoding 'rle'"
        );
        assert!(matches!(
            error.root_cause(),
            CompileError::Decode(DecodeError::UnsupportedEncoding(_))
        ));
    }
}
