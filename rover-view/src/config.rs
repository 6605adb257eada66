/// Per-tree runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Keep displaced nodes in the recycle pool for reuse by later renders
    pub recycle: bool,
}

impl TreeConfig {
    pub fn new() -> Self {
        Self { recycle: true }
    }

    /// Drop displaced nodes instead of pooling them
    pub fn without_recycling(mut self) -> Self {
        self.recycle = false;
        self
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new()
    }
}
