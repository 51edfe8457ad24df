//! # Generator Module
//!
//! Turns the root services of a catalog into generated service classes.
//!
//! ## Overview
//!
//! Each root service is walked depth first. Operations returning a plain
//! type become endpoint methods; operations returning another routable
//! interface are resource locators, and the methods of that resource are
//! flattened into the root class under the locator's path:
//!
//! ```text
//! OrderService  @ /orders
//!   order(id) @ /{id}          -> OrderResource   (locator, no method)
//!     get()      GET            -> OrderDto        => GET /orders/{id}
//!     items()   @ /items        -> ItemResource    (locator)
//!       list()   GET            -> Vec<ItemDto>    => GET /orders/{id}/items
//! ```
//!
//! The generated `get` method calls `self.inner.order(id).get()`.
//!
//! ## Pipeline
//!
//! 1. **Return types** ([`resolve_operations`]) - merge interface operations
//!    with the implementation's narrower return types
//! 2. **Classification** ([`is_resource`]) - locator or terminal
//! 3. **Composition** ([`compose`], [`extend`]) - path prefix and invocation
//!    chain for the next level
//! 4. **Methods** ([`MethodStep`]) - parameter binding, route checks,
//!    documentation and the emitted [`MethodDecl`](crate::emit::MethodDecl)
//! 5. **Driver** ([`ServiceGenerator`]) - recursion with cycle and depth
//!    guards, descriptor registration
//! 6. **Project** ([`generate_project`]) - rendering and writing files
//!
//! Generation is fail-fast: the first [`GenerationError`] aborts the run and
//! nothing is written. Informational [`GenerationNote`]s are collected
//! alongside.

mod binding;
mod classify;
mod compose;
mod driver;
mod error;
mod method;
mod naming;
mod project;
mod return_type;

pub use binding::*;
pub use classify::*;
pub use compose::*;
pub use driver::*;
pub use error::*;
pub use method::*;
pub use naming::*;
pub use project::*;
pub use return_type::*;
