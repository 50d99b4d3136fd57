//! Directive handlers.
//!
//! [`StreamerEmbed`] ties the validator, the provider registry, the claim
//! store and a renderer together. Every call is independent: errors are
//! returned, never kept on the handler.

mod lifecycle;
mod render;

pub use lifecycle::{ClaimTransition, DIRECTIVE_MARKER};

use std::sync::Arc;

use streamer_platforms::ProviderRegistry;

use crate::config::DEFAULT_PAGE_URL_PATTERN;
use crate::database::ClaimRepository;
use crate::template::{BuiltinRenderer, Renderer};

/// Markup handed back to the host engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveOutput {
    pub html: String,
    /// Whether the host must skip its own markup expansion on `html`.
    pub no_parse: bool,
}

impl DirectiveOutput {
    fn markup(html: String) -> Self {
        Self {
            html,
            no_parse: false,
        }
    }

    fn literal(html: String) -> Self {
        Self {
            html,
            no_parse: true,
        }
    }
}

/// The page a directive is being rendered on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// Full page title, e.g. `Some Channel/Streams`.
    pub title: String,
    /// Preview renders must not persist anything.
    pub is_preview: bool,
}

impl PageContext {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_preview: false,
        }
    }

    pub fn preview(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_preview: true,
        }
    }

    /// Title without any subpage part.
    pub fn root_title(&self) -> &str {
        self.title
            .split_once('/')
            .map_or(self.title.as_str(), |(root, _)| root)
    }
}

pub struct StreamerEmbed {
    registry: ProviderRegistry,
    claims: Arc<dyn ClaimRepository>,
    renderer: Arc<dyn Renderer>,
    page_url_pattern: String,
}

impl StreamerEmbed {
    pub fn new(registry: ProviderRegistry, claims: Arc<dyn ClaimRepository>) -> Self {
        Self {
            registry,
            claims,
            renderer: Arc::new(BuiltinRenderer),
            page_url_pattern: DEFAULT_PAGE_URL_PATTERN.to_string(),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_page_url_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.page_url_pattern = pattern.into();
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn claims(&self) -> &Arc<dyn ClaimRepository> {
        &self.claims
    }
}
