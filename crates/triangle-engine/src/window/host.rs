use std::fmt;

use crate::coords::Viewport;

type ResizeListener = Box<dyn FnMut(Viewport)>;

/// Platform-independent window state: drawable size, the close flag and
/// resize listeners.
///
/// The runtime feeds it from winit events; the frame loop reads it.
pub struct Host {
    viewport: Viewport,
    close_requested: bool,
    resize_listeners: Vec<ResizeListener>,
}

impl Host {
    /// A host whose viewport is exactly `width` x `height` physical pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            close_requested: false,
            resize_listeners: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn should_close(&self) -> bool {
        self.close_requested
    }

    /// Marks the window for closing. The loop stops before the next draw.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Registers `listener` to be called with every new viewport.
    pub fn on_resize<F>(&mut self, listener: F)
    where
        F: FnMut(Viewport) + 'static,
    {
        self.resize_listeners.push(Box::new(listener));
    }

    /// Records a new drawable size and notifies listeners.
    ///
    /// Platforms may repeat a size; repeats are ignored.
    pub fn handle_resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        log::debug!(
            "resize {}x{} -> {}x{}",
            self.viewport.width,
            self.viewport.height,
            viewport.width,
            viewport.height
        );
        self.viewport = viewport;
        for listener in &mut self.resize_listeners {
            listener(viewport);
        }
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("viewport", &self.viewport)
            .field("close_requested", &self.close_requested)
            .field("resize_listeners", &self.resize_listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn initial_viewport_matches_requested_size() {
        let host = Host::new(800, 600);
        assert_eq!(host.viewport(), Viewport::new(800, 600));
        assert!(!host.should_close());
    }

    #[test]
    fn request_close_is_sticky() {
        let mut host = Host::new(800, 600);
        host.request_close();
        host.request_close();
        assert!(host.should_close());
    }

    #[test]
    fn resize_updates_viewport_and_notifies_every_listener() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut host = Host::new(800, 600);
        for tag in 0..2 {
            let seen = Rc::clone(&seen);
            host.on_resize(move |vp| seen.borrow_mut().push((tag, vp)));
        }

        host.handle_resize(Viewport::new(1024, 768));

        assert_eq!(host.viewport(), Viewport::new(1024, 768));
        assert_eq!(
            *seen.borrow(),
            vec![(0, Viewport::new(1024, 768)), (1, Viewport::new(1024, 768))]
        );
    }

    #[test]
    fn repeated_size_does_not_notify() {
        let calls = Rc::new(RefCell::new(0));
        let mut host = Host::new(800, 600);
        let counter = Rc::clone(&calls);
        host.on_resize(move |_| *counter.borrow_mut() += 1);

        host.handle_resize(Viewport::new(800, 600));
        host.handle_resize(Viewport::new(0, 0));
        host.handle_resize(Viewport::new(0, 0));

        assert_eq!(*calls.borrow(), 1);
        assert!(host.viewport().is_empty());
    }
}
