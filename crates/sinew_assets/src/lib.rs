//! Scene-file loading for sinew.
//!
//! The only format is m3d. A skinned load returns mesh buffers plus a fully
//! validated [`Skeleton`](sinew_animation::Skeleton); a static load stops
//! after the triangle list.

pub mod error;
pub mod m3d;
pub mod material;
pub mod options;
pub mod vertex;

pub use error::{LoadError, ParseError, ParseErrorKind, Result};
pub use m3d::{M3dLoader, SkinnedModel, StaticModel, load};
pub use material::{M3dMaterial, Subset};
pub use options::{LabelPolicy, LoadOptions};
pub use vertex::{MAX_BONE_INFLUENCES, STORED_BONE_WEIGHTS, SkinnedVertex, Vertex};
