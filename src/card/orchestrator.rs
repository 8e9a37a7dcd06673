//! Card Orchestrator: drives fonts, template, barcode and composition for one board.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::assets::fonts::await_fonts;
use crate::assets::source::{AssetSource, FsAssetSource};
use crate::barcode::encode::CodeEncoder;
use crate::card::download::write_card;
use crate::card::state::{CardRequest, GenerationState, RunTicket};
use crate::compose::compositor::{CardResult, Compositor};
use crate::config::CardConfig;
use crate::foundation::error::{GreetcardError, GreetcardResult};
use crate::render::cpu::CpuBackend;
use crate::render::surface::SurfaceBackend;
use crate::template::provider::TemplateProvider;

/// URL the barcode points at: `<origin>/<board_path>/<board_id>`, one `/` between parts.
pub fn payload_url(origin: &str, board_path: &str, board_id: &str) -> String {
    format!(
        "{}/{}/{}",
        origin.trim_end_matches('/'),
        board_path.trim_matches('/'),
        board_id.trim_start_matches('/')
    )
}

/// The pipeline stages. Holds no per-run state; every run re-renders from scratch.
pub struct CardPipeline {
    config: CardConfig,
    source: Arc<dyn AssetSource>,
    backend: Box<dyn SurfaceBackend>,
}

impl CardPipeline {
    /// Filesystem assets under `config.assets_root`, CPU rendering.
    pub fn new(config: CardConfig) -> GreetcardResult<Self> {
        let source = Arc::new(FsAssetSource::new(config.assets_root.clone()));
        Self::with_parts(config, source, Box::new(CpuBackend::new()))
    }

    pub fn with_parts(
        config: CardConfig,
        source: Arc<dyn AssetSource>,
        backend: Box<dyn SurfaceBackend>,
    ) -> GreetcardResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            backend,
        })
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn payload_url(&self, request: &CardRequest) -> String {
        payload_url(
            &self.config.origin,
            &self.config.board_path,
            request.board_id(),
        )
    }

    /// Run every stage in order. Asset problems are recovered by the template fallback; encoding
    /// and composition failures are returned.
    #[tracing::instrument(skip(self, request), fields(board = board_label(request.board_id())))]
    pub fn run(&self, request: &CardRequest) -> GreetcardResult<CardResult> {
        let geometry = &self.config.geometry;

        let t0 = Instant::now();
        let fonts = await_fonts(
            self.source.clone(),
            &self.config.fonts,
            self.config.font_timeout(),
        );
        tracing::debug!(faces = fonts.faces().len(), elapsed = ?t0.elapsed(), "fonts ready");

        let t0 = Instant::now();
        let template = TemplateProvider::new(
            self.source.clone(),
            self.config.template_path.clone(),
            self.config.asset_timeout(),
            *geometry,
        )
        .resolve(self.backend.as_ref(), &fonts)?;
        tracing::debug!(origin = ?template.origin(), elapsed = ?t0.elapsed(), "template resolved");

        let url = self.payload_url(request);
        let barcode = CodeEncoder::new(self.config.error_correction)
            .encode(&url, geometry.barcode_pixel_size())?;

        Compositor::new(self.backend.as_ref()).compose(
            request.board_id(),
            template,
            barcode,
            geometry,
        )
    }
}

/// Generation state machine for one consuming view.
#[derive(Debug, Default)]
pub struct CardSession {
    state: GenerationState,
    next_run: u64,
    current: Option<u64>,
}

impl CardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Start a run: drops any previous result and moves to `Loading`.
    pub fn open(&mut self, request: CardRequest) -> RunTicket {
        self.next_run += 1;
        let run_id = self.next_run;
        if let Some(prev) = self.current.replace(run_id) {
            tracing::debug!(superseded = prev, run_id, "run superseded");
        }
        self.state = GenerationState::Loading {
            board_id: request.board_id().to_string(),
        };
        RunTicket { run_id, request }
    }

    /// Apply a run's outcome. Returns `false` (and changes nothing) for a stale ticket.
    pub fn commit(&mut self, ticket: RunTicket, outcome: GreetcardResult<CardResult>) -> bool {
        if self.current != Some(ticket.run_id) {
            tracing::debug!(run_id = ticket.run_id, "discarding stale run outcome");
            return false;
        }
        self.current = None;

        let board_id = ticket.request.board_id();
        self.state = match outcome {
            Ok(result) if result.board_id == board_id => {
                tracing::info!(
                    board = board_label(board_id),
                    width = result.width,
                    height = result.height,
                    "card ready"
                );
                GenerationState::Ready(result)
            }
            Ok(result) => {
                let e = GreetcardError::unexpected(format!(
                    "result for '{}' committed to run for '{}'",
                    board_label(&result.board_id),
                    board_label(board_id)
                ));
                tracing::error!(error = %e, "card failed");
                GenerationState::failed(board_id, &e)
            }
            Err(e) => {
                tracing::error!(board = board_label(board_id), error = %e, "card failed");
                GenerationState::failed(board_id, &e)
            }
        };
        true
    }

    /// Dismiss the view: back to `Idle`, discarding any result and in-flight run.
    pub fn close(&mut self) {
        self.current = None;
        self.state = GenerationState::Idle;
    }

    /// Open, run and commit in one step. Panics inside the pipeline end in `Failed`.
    pub fn generate(&mut self, pipeline: &CardPipeline, request: CardRequest) -> &GenerationState {
        let ticket = self.open(request);
        let outcome = run_caught(pipeline, ticket.request());
        self.commit(ticket, outcome);
        &self.state
    }

    /// Write the `Ready` card into `dir` under its download name.
    pub fn download(&self, dir: &Path) -> GreetcardResult<PathBuf> {
        let GenerationState::Ready(result) = &self.state else {
            return Err(GreetcardError::validation(format!(
                "no card to download (state: {})",
                self.state.label()
            )));
        };
        write_card(dir, result)
    }
}

/// Longest board-id prefix written to logs.
const BOARD_LOG_CHARS: usize = 64;

/// Board id as written to logs: at most [`BOARD_LOG_CHARS`] characters.
fn board_label(board_id: &str) -> &str {
    match board_id.char_indices().nth(BOARD_LOG_CHARS) {
        Some((end, _)) => &board_id[..end],
        None => board_id,
    }
}

/// Run the pipeline, mapping a panic to [`GreetcardError::Unexpected`].
pub fn run_caught(pipeline: &CardPipeline, request: &CardRequest) -> GreetcardResult<CardResult> {
    catch_unwind(AssertUnwindSafe(|| pipeline.run(request))).unwrap_or_else(|payload| {
        let msg = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic with non-string payload".to_string());
        Err(GreetcardError::unexpected(msg))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/card/orchestrator.rs"]
mod tests;
