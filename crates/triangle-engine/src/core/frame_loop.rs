use anyhow::Result;

use crate::input::{process_input, KeyBindings, KeyQuery};
use crate::render::{FrameOutcome, FrameRenderer, GraphicsBackend};
use crate::window::Host;

/// Whether the loop keeps going after an iteration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopControl {
    Continue,
    /// Close was requested; nothing was drawn this iteration.
    Exit,
}

/// One loop iteration: sample input, stop if closing, otherwise render.
///
/// The renderer receives the host's current viewport, so a resize recorded
/// since the last iteration reaches the backend before the draw.
pub fn run_iteration<K, B>(
    host: &mut Host,
    bindings: &KeyBindings,
    keys: &K,
    renderer: &mut FrameRenderer<B>,
) -> Result<(LoopControl, Option<FrameOutcome>)>
where
    K: KeyQuery + ?Sized,
    B: GraphicsBackend,
{
    process_input(keys, bindings, host);
    if host.should_close() {
        return Ok((LoopControl::Exit, None));
    }

    let outcome = renderer.render_frame(host.viewport())?;
    Ok((LoopControl::Continue, Some(outcome)))
}
