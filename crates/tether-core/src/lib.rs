//! Core types for the Tether model coupling adapter.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the types shared by every other Tether crate: grid identifiers,
//! element type tags, the aliasing [`SharedBuffer`], variable
//! declarations, and the model error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod element;
pub mod error;
pub mod id;
pub mod variable;

pub use buffer::SharedBuffer;
pub use element::ElementType;
pub use error::ModelError;
pub use id::GridId;
pub use variable::VariableSpec;
