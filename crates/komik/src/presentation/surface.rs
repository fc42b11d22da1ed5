use super::render;

/// Where rendered fragments end up. Every replace swaps the region wholesale.
pub trait Surface: Send + 'static {
    fn replace_content(&mut self, html: String);

    fn replace_identity(&mut self, html: String);

    fn scroll_to_top(&mut self) {}
}

/// Keeps the latest fragments in memory, used by the server and the cli
#[derive(Debug, Clone, Default)]
pub struct HtmlSurface {
    content: String,
    identity: String,
    renders: usize,
}

impl HtmlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Number of content replacements so far
    pub fn renders(&self) -> usize {
        self.renders
    }

    pub fn page(&self) -> String {
        render::page(&self.identity, &self.content)
    }
}

impl Surface for HtmlSurface {
    fn replace_content(&mut self, html: String) {
        self.content = html;
        self.renders += 1;
    }

    fn replace_identity(&mut self, html: String) {
        self.identity = html;
    }
}
