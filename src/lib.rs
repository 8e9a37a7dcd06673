//! Greetcard composes a board's greeting card: a decorative template with a scannable code that
//! points back to the board.
//!
//! - Build a [`CardPipeline`] from a [`CardConfig`]
//! - Drive it through a [`CardSession`] to get a [`GenerationState`]
//! - Download a `Ready` card as a PNG
#![forbid(unsafe_code)]

mod foundation;

/// Template and font assets.
pub mod assets;
/// Barcode encoding.
pub mod barcode;
/// Generation state machine and pipeline.
pub mod card;
pub mod compose;
pub mod config;
/// Drawing ops and surfaces.
pub mod render;
pub mod template;

pub mod animation;
/// Board-view auto-scroll.
pub mod scroll;

pub use crate::foundation::core::{Canvas, Point, RasterImage, Rect, Rgba8};
pub use crate::foundation::error::{GreetcardError, GreetcardResult, USER_FAILURE_MESSAGE};
pub use crate::foundation::geometry::GeometrySpec;

pub use crate::barcode::encode::{BarcodeImage, CodeEncoder};
pub use crate::card::download::download_file_name;
pub use crate::card::orchestrator::{CardPipeline, CardSession, payload_url};
pub use crate::card::state::{CardRequest, GenerationState, RunTicket};
pub use crate::compose::compositor::{CardResult, Compositor};
pub use crate::config::{CardConfig, ErrorCorrection, FontFile};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::surface::{DrawSurface, RecordingBackend, SurfaceBackend};
pub use crate::template::provider::{TemplateImage, TemplateOrigin, TemplateProvider};
