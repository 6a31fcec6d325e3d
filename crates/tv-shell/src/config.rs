//! Configuration for a shell session.

/// Configuration for a [`Shell`](crate::Shell).
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// How many roll results `history` keeps.
    pub history_limit: usize,
    /// Prefix roll and alarm lines with 🎲 / ⏰.
    pub glyphs: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            history_limit: 100,
            glyphs: true,
        }
    }
}

impl ShellConfig {
    /// Set the roll history size (at least 1).
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    /// Turn the line glyphs on or off.
    pub fn with_glyphs(mut self, glyphs: bool) -> Self {
        self.glyphs = glyphs;
        self
    }
}
