#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SlideshowState {
    Running, // Cycling through pairs
    Stopped, // Stop signal observed, terminal
}
