pub mod scene;
pub mod triplet;

pub use scene::{render_lens, validate_circular_arc};
pub use triplet::WasmTriplet;
