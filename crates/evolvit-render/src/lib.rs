//! Creature rendering pipeline.
//!
//! Sprite layout strings are decoded into organ lists, placed in world space
//! from each creature's pose, and drawn onto any [`Surface`]. The
//! [`AnimationScheduler`] decides when a poll+render cycle may run.

pub mod layout;
pub mod cache;
pub mod transform;
pub mod surface;
pub mod renderer;
pub mod scheduler;

pub use layout::{decode, LayoutError, SpriteLayout};
pub use cache::SpriteCache;
pub use transform::{transform_organ, CreaturePose, Placement};
pub use surface::{DisplayList, DrawCommand, Shape, Surface};
pub use renderer::{FrameRenderer, FrameStats};
pub use scheduler::{AnimationScheduler, RefreshDecision, SchedulerState};
