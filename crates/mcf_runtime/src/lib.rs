//! # mcf_runtime
//!
//! Runtime shared by every OpenMCF resource module.
//!
//! A module run always follows the same steps: load the stack input,
//! validate the target manifest, configure the provider, register
//! resources with the engine, and export outputs. This crate owns those
//! steps and the seam to the provisioning engine.
//!
//! ## Features
//!
//! - `Engine` trait with deferred resource outputs
//! - `RecordingEngine` that records the graph for tests and previews
//! - Deterministic label builders
//! - Stack input loading from files, strings or the environment
//! - `OutputRegistry` for checking cross-stack references
//!
//! ## Example
//!
//! ```rust,no_run
//! use mcf_runtime::{FileSource, RecordingEngine, StackModule};
//!
//! # async fn run(module: &dyn StackModule) {
//! let engine = RecordingEngine::default();
//! module.run(&engine, &FileSource::new("stack-input.yaml")).await.unwrap();
//! println!("{}", engine.preview().to_yaml().unwrap());
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod labels;
pub mod module;
pub mod outputs;
pub mod property;
pub mod provider;
pub mod recording;
pub mod stack_input;

pub use engine::{Engine, ProviderHandle, ProviderRequest, ResourceHandle, ResourceRequest};
pub use error::{ModuleError, ModuleResult, WrapErr};
pub use module::{run_module, ResourceModule, StackModule};
pub use outputs::OutputRegistry;
pub use property::{OutputRef, PropertyMap, PropertyValue};
pub use provider::{setup_provider, EngineProvider};
pub use recording::{PreviewReport, RecordedProvider, RecordedResource, RecordingEngine};
pub use stack_input::{
    detect_kind, is_stack_input, load_stack_input, EnvSource, FileSource, InlineSource,
    StackInput, StackInputSource,
};
