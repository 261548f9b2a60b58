//! Platform-independent core of the sonic wave visualizer.
//!
//! Nothing here touches a browser API: the web front-end plugs its audio
//! graph, canvas and animation-frame primitive in through the
//! [`AnalysisTap`], [`DrawSurface`] and [`FrameScheduler`] traits.

pub mod config;
pub mod constants;
pub mod controller;
pub mod energy;
pub mod error;
pub mod preset;
pub mod render;
pub mod sample;
pub mod scheduler;
pub mod state;
pub mod surface;
pub mod tap;

pub use config::*;
pub use controller::*;
pub use energy::*;
pub use error::*;
pub use preset::*;
pub use render::*;
pub use sample::*;
pub use scheduler::*;
pub use state::*;
pub use surface::*;
pub use tap::*;
