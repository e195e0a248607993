//! Error Types
//!
//! [`SinewError`] is the umbrella error of the `sinew` crate. Each subsystem
//! keeps its own error type; this enum only wraps them so application code
//! can use a single `?` chain.
//!
//! ```rust,ignore
//! use sinew::errors::Result;
//!
//! fn play(path: &str) -> Result<()> {
//!     let model = sinew::assets::load(path)?;
//!     let mut instance = sinew::Instance::new(model.skeleton.into(), "Take1")?;
//!     instance.update(1.0 / 60.0)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::animation::AnimationError;
use crate::assets::LoadError;

#[derive(Error, Debug)]
pub enum SinewError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// Scene file could not be opened or parsed.
    #[error(transparent)]
    Load(#[from] LoadError),

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// Clip lookup or skeleton evaluation failed.
    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),
}

/// Alias for `Result<T, SinewError>`.
pub type Result<T> = std::result::Result<T, SinewError>;
