#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    #[error("Invalid validation pattern for specifier '{specifier}': {source}")]
    InvalidPattern {
        specifier: char,
        source: regex::Error,
    },
}
