//! Geometry core for the pixel billboard.
//!
//! The billboard is a 5000 x 5000 grid of cells that wraps around in both
//! axes. This crate owns everything that reasons about that grid: mapping
//! screen pixels to world cells under the current pan/zoom, folding raw world
//! coordinates back onto the torus, laying out a purchased region, rejecting
//! overlapping purchases, hit-testing clicks, and finding the next ad to jump
//! to. It performs no I/O and does no painting; the host UI feeds it pointer
//! events and ad snapshots, and acts on the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Stateful shell ([`engine::EngineCore`]) turning input into actions |
//! | [`ads`] | Ad placements, their bounding boxes, and the polled ad store |
//! | [`camera`] | Viewport state and screen/world coordinate conversions |
//! | [`wrap`] | Toroidal canonicalization and the 3 x 3 wrap-copy offsets |
//! | [`viewport`] | Pan/zoom controller and its pure transition functions |
//! | [`input`] | Pointer/wheel event types and the drag gesture state |
//! | [`placement`] | Rectangle layout for new ads and overlap detection |
//! | [`hit`] | Click hit-testing against ad bounding boxes |
//! | [`nav`] | Nearest-ad search for the left/right navigation buttons |
//! | [`consts`] | Shared numeric constants (grid size, zoom limits, thresholds) |

pub mod ads;
pub mod camera;
pub mod consts;
pub mod engine;
pub mod hit;
pub mod input;
pub mod nav;
pub mod placement;
pub mod viewport;
pub mod wrap;
