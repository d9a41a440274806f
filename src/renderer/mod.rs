//! Rendering module
//!
//! Both backends draw the same `Scene`. The GPU backend tessellates it into
//! quads; the software backend rasterizes it on the CPU and presents the
//! framebuffer as a single stretched texture.

pub mod checkerboard;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod software;
pub mod vertex;

pub use checkerboard::{Texture, checkerboard};
pub use pipeline::{Batch, GpuRenderer, TextureSlot};
pub use scene::{Line, Scene};
pub use software::Framebuffer;
pub use vertex::Vertex;
