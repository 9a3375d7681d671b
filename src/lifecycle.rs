//! Render lifecycle signal supplied by the host framework.

/// Rendering state of the page hosting the injector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Static prerendering; there is no live page to talk to yet.
    #[default]
    Prerendering,
    /// The page is live and its scripting engine is reachable.
    Interactive,
}

/// Host-provided signal reporting whether the first real render has happened.
pub trait RenderSignal {
    /// Current render mode, or `None` when the host cannot tell.
    ///
    /// An undeterminable mode is treated as interactive so injection is never
    /// skipped for good.
    fn render_mode(&self) -> Option<RenderMode>;

    /// Whether the page should be treated as interactive.
    fn is_interactive(&self) -> bool {
        self.render_mode().unwrap_or(RenderMode::Interactive) == RenderMode::Interactive
    }
}

impl RenderSignal for RenderMode {
    fn render_mode(&self) -> Option<RenderMode> {
        Some(*self)
    }
}

impl RenderSignal for Option<RenderMode> {
    fn render_mode(&self) -> Option<RenderMode> {
        *self
    }
}
