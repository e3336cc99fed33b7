//! Entity recognition providers for gridner.
//!
//! Provider adapters normalize service payloads into `NamedEntity` lists, the
//! registry keeps their configuration, and extraction batches run them over
//! a column of text with bounded concurrency.

pub mod services;

pub use services::extraction::{extract_text, BatchError, ExtractionBatch, ExtractionEvent};
pub use services::providers::{Provider, ProviderError, ProviderSettings};
pub use services::registry::{ProviderDescriptor, ProviderKinds, ProviderRegistry, RegistryError};
pub use services::transport::{HttpTransport, Transport};
