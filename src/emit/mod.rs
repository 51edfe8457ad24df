//! # Emit Module
//!
//! Declaration tree for generated services and the emitter that turns it into
//! source text.
//!
//! The generator builds a [`ClassDecl`] through a [`ClassBuilder`]: class
//! decorations, delegating constructors and one [`MethodDecl`] per endpoint,
//! each with its routing and documentation [`Decoration`]s. An [`Emitter`]
//! renders the tree; [`RustSourceEmitter`] uses the Askama templates in
//! `templates/`:
//!
//! - `service.rs.txt` - one generated service struct with its methods
//! - `mod.rs.txt` - module declarations for the output directory

mod decl;
mod templates;

pub use decl::*;
pub use templates::*;
