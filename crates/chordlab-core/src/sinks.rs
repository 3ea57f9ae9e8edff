use crate::render::Grid;

/// External collaborator that applies a fully-specified frame to whatever
/// displays it (hardware, a console board, nothing). The engine does not
/// depend on its timing beyond "eventually visible".
pub trait IlluminationSink {
    fn apply(&mut self, grid: &Grid);
}

/// External collaborator that shows or speaks the per-trial notifications:
/// the instruction to carry out, and the result line ("", "Correct",
/// "Incorrect", or a rest message).
pub trait PresentationSink {
    fn command(&mut self, text: &str);
    fn result(&mut self, text: &str);
}

/// Drops every frame. Useful when a session runs without any display.
pub struct NullIllumination;

impl IlluminationSink for NullIllumination {
    fn apply(&mut self, _grid: &Grid) {}
}
