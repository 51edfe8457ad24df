//! # Introspection Module
//!
//! Supplies the generator with immutable descriptors of the declared service
//! interfaces, their implementations and the operations they expose.
//!
//! The generator only depends on the [`TypeIntrospector`] trait. The bundled
//! [`Catalog`] reads a YAML or JSON description of the types:
//!
//! ```yaml
//! types:
//!   - name: OrderService
//!     path: /orders
//!     operations:
//!       - name: order
//!         path: /{id}
//!         params: [{ name: id, type: String, source: path }]
//!         returns: OrderResource
//!   - name: OrderServiceImpl
//!     implements: OrderService
//! services:
//!   - interface: OrderService
//!     name: Orders
//! ```

mod load;
mod type_ref;
mod types;

pub use load::*;
pub use type_ref::*;
pub use types::*;
