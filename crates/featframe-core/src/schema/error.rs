use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("schema parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("descriptor {index} has an empty feature name")]
    EmptyName { index: usize },
    #[error("duplicate feature name: '{name}'")]
    DuplicateName { name: String },
    #[error("feature '{name}' declares width {width}, expected {expected}")]
    UnsupportedWidth {
        name: String,
        width: u32,
        expected: u32,
    },
}
