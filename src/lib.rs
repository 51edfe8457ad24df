//! # restscaffold
//!
//! **restscaffold** is a build-time generator for REST service scaffolding. It
//! reads a catalog of interface, implementation and model types, walks every
//! root service together with the resources nested below it, and emits one
//! service class per root with routing and documentation metadata.
//!
//! ## Overview
//!
//! A root service exposes operations. Operations returning plain data become
//! endpoint methods; operations returning another routable interface are
//! resource locators whose own operations are flattened into the root class
//! under the locator's path. Each generated method forwards to the wrapped
//! implementation by walking the locator calls that lead to it.
//!
//! ## Architecture
//!
//! - **[`introspect`]** - type catalog, type expressions and the
//!   [`TypeIntrospector`](introspect::TypeIntrospector) seam
//! - **[`model`]** - the [`ModelRepository`](model::ModelRepository) of
//!   service descriptors
//! - **[`docs`]** - documentation model and tag lookup
//! - **[`generator`]** - return-type resolution, classification, path and
//!   invocation composition, method generation and the recursive driver
//! - **[`emit`]** - declaration tree and the Askama-based Rust emitter
//! - **[`config`]** - `restscaffold.toml`
//! - **[`logging`]** - tracing subscriber setup
//! - **[`cli`]** - the `restscaffold-gen` binary
//!
//! ### Generation Flow
//!
//! ```text
//! catalog + docs + restscaffold.toml
//!     -> ModelRepository
//!     -> ServiceGenerator (per root service: resolve, classify, compose, method)
//!     -> ClassDecl
//!     -> RustSourceEmitter
//!     -> <class>.rs + mod.rs
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! restscaffold-gen generate --catalog services.yaml --docs docs.yaml --output src/generated
//! restscaffold-gen inspect --catalog services.yaml
//! ```
//!
//! ```rust,ignore
//! use restscaffold::{generate_services, Catalog, DocumentationModel, GeneratorConfig};
//!
//! let catalog = Catalog::from_yaml_str(&std::fs::read_to_string("services.yaml")?)?;
//! let (repository, services) =
//!     generate_services(&catalog, DocumentationModel::default(), &GeneratorConfig::default())?;
//! for service in &services {
//!     for method in &service.class.methods {
//!         println!("{} {}", method.verb, method.route);
//!     }
//! }
//! ```

pub mod cli;
pub mod config;
pub mod docs;
pub mod emit;
pub mod generator;
pub mod introspect;
pub mod logging;
pub mod model;

pub use config::GeneratorConfig;
pub use docs::{ConfiguredTags, DocumentationModel, OperationDoc, TagRepository};
pub use generator::{
    generate_project, generate_services, render_project, GenerateOptions, GeneratedService,
    GenerationError, GenerationNote, ServiceGenerator,
};
pub use introspect::{load_catalog, Catalog, TypeIntrospector, TypeRef};
pub use model::{ModelRepository, ServiceDescriptor, ServiceId};
