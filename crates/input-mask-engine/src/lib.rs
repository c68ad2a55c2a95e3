pub mod buffer;
pub mod editing;
pub mod error;
pub mod mask;
pub mod validation;

// Re-export key types for easier usage
pub use editing::{event::*, field::*, patch::*, paste::*};
pub use error::MaskError;
pub use mask::{Mask, MaskPosition};
pub use validation::{DEFAULT_PLACEHOLDER, MaskConfig, ValidationTable};
