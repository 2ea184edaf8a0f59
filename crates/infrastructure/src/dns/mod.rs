pub mod forwarding;
pub mod ptr_provider;

pub use ptr_provider::PtrResolutionProvider;
