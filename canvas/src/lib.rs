//! Scene editing core for the fixed-size creative canvas.
//!
//! This crate owns everything about the canvas that can be expressed without
//! a browser or a network: the element model and its logical-space
//! invariants, the tool/gesture state machine that turns pointer input into
//! committed elements, selection and transform normalization, and the
//! placement engine that finds room for newly inserted images. The host
//! forwards raw input to [`engine::EngineCore`] and reacts to the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::EngineCore`] and the interaction reducer |
//! | [`doc`] | Element types, sparse updates, and the ordered scene |
//! | [`viewport`] | Logical/display scale and coordinate conversions |
//! | [`input`] | Tools, keys, and the gesture state machine types |
//! | [`selection`] | Transform baking, clamps, flips, recolor |
//! | [`placement`] | Non-overlapping placement for inserted images |
//! | [`hit`] | Hit-testing pointer positions against elements |
//! | [`geom`] | Points and axis-aligned boxes |
//! | [`color`] | Hex colour parsing and normalization |
//! | [`consts`] | Canvas size, margins, clamps, and element defaults |

pub mod color;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod placement;
pub mod selection;
pub mod viewport;
