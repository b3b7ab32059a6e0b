use core::convert::Infallible;

use crate::render_ir::{DrawCommand, FontSpec, Frame};
use crate::render_layout::{HeuristicMeasurer, TextMeasurer};

/// Drawing surface a [`Canvas`](crate::Canvas) renders into.
///
/// Commands arrive with resolved, device-unit geometry. `present` commits
/// everything drawn so far and fires `on_complete` exactly once afterwards,
/// before returning, so the callback may borrow from the caller.
pub trait Surface: TextMeasurer {
    type Error;

    fn draw(&mut self, cmd: &DrawCommand) -> Result<(), Self::Error>;

    fn present<F>(&mut self, on_complete: F) -> Result<(), Self::Error>
    where
        F: FnOnce();
}

/// Headless surface that records commands instead of drawing pixels.
///
/// Drawn commands stay pending until `present` moves them into the
/// committed frame.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface<M = HeuristicMeasurer> {
    measurer: M,
    pending: Vec<DrawCommand>,
    committed: Frame,
    presents: usize,
}

impl RecordingSurface<HeuristicMeasurer> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> RecordingSurface<M>
where
    M: TextMeasurer,
{
    /// Record with an explicit measurer.
    pub fn with_measurer(measurer: M) -> Self {
        Self {
            measurer,
            pending: Vec::new(),
            committed: Frame::default(),
            presents: 0,
        }
    }

    /// Commands drawn since the last present.
    pub fn pending(&self) -> &[DrawCommand] {
        &self.pending
    }

    /// Commands committed by all presents so far.
    pub fn frame(&self) -> &Frame {
        &self.committed
    }

    pub fn present_count(&self) -> usize {
        self.presents
    }

    pub fn into_frame(self) -> Frame {
        self.committed
    }
}

impl<M> TextMeasurer for RecordingSurface<M>
where
    M: TextMeasurer,
{
    fn measure_text_px(&self, text: &str, font: &FontSpec) -> f32 {
        self.measurer.measure_text_px(text, font)
    }
}

impl<M> Surface for RecordingSurface<M>
where
    M: TextMeasurer,
{
    type Error = Infallible;

    fn draw(&mut self, cmd: &DrawCommand) -> Result<(), Self::Error> {
        self.pending.push(cmd.clone());
        Ok(())
    }

    fn present<F>(&mut self, on_complete: F) -> Result<(), Self::Error>
    where
        F: FnOnce(),
    {
        self.committed.commands.append(&mut self.pending);
        self.presents += 1;
        on_complete();
        Ok(())
    }
}
