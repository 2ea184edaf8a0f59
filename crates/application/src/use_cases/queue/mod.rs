pub mod ingest_addresses;

pub use ingest_addresses::{IngestAddressesUseCase, IngestOutcome};
