use thiserror::Error;

/// Rejected show configurations. Checked once, before any GPU work.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("a show needs at least one drone")]
    EmptyShow,
    #[error("{drone_count} drones need a {width}x{width} state texture, limit is {max}")]
    TooManyDrones { drone_count: usize, width: u32, max: u32 },
    #[error("invalid timeline: {0}")]
    InvalidTimeline(&'static str),
    #[error("formation {index} has {actual} slots, expected {expected}")]
    FormationSize {
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("a show needs at least one formation")]
    NoFormations,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SortError {
    #[error("bitonic sort length must be a power of two, got {0}")]
    NotPowerOfTwo(usize),
}

/// Problems with externally produced formation sources.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SourceError {
    #[error("mesh has no triangles")]
    NoTriangles,
    #[error("triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("mesh surface area is zero")]
    ZeroArea,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TextureError {
    #[error("texture holds {actual} floats, a {width}x{width} RGBA texture needs {expected}")]
    SizeMismatch {
        width: u32,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ManifestError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("manifest texture size {manifest} does not match {expected} for its drone count")]
    TextureSizeMismatch { manifest: u32, expected: u32 },
    #[error("timeline expects {timeline} formations, manifest lists {listed}")]
    FormationCountMismatch { timeline: usize, listed: usize },
}
