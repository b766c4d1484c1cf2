/*
[INPUT]:  Public API exports for opensrs-cli crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod input;
pub mod settings;

pub use input::{parse_field, request_data};
pub use settings::load_settings;
