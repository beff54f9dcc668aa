use crate::host::Host;
use crate::manifest::ManifestLoader;
use crate::reader::{Event, LoadOutcome, LoadTicket, Reader};

/// A reader wired to a manifest loader. Loads are awaited in place, so within
/// one session a later navigation always completes after an earlier one.
pub struct Session<H, L> {
    reader: Reader<H>,
    loader: L,
}

impl<H: Host, L: ManifestLoader> Session<H, L> {
    pub fn new(reader: Reader<H>, loader: L) -> Self {
        Self { reader, loader }
    }

    pub async fn open(&mut self, fragment: Option<&str>) -> LoadOutcome {
        let ticket = self.reader.open(fragment);
        self.load(ticket).await
    }

    /// Applies one event; returns the load outcome when the event navigated.
    pub async fn dispatch(&mut self, event: Event) -> Option<LoadOutcome> {
        let ticket = self.reader.handle(event)?;
        Some(self.load(ticket).await)
    }

    /// Ticks until no frame task is due or `max_frames` have run. Returns the
    /// number of frames run.
    pub fn run_frames(&mut self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && !self.reader.is_idle() {
            self.reader.tick();
            frames += 1;
        }
        if !self.reader.is_idle() {
            tracing::debug!(max_frames, "frame budget exhausted with tasks still due");
        }
        frames
    }

    pub fn reader(&self) -> &Reader<H> {
        &self.reader
    }

    pub fn reader_mut(&mut self) -> &mut Reader<H> {
        &mut self.reader
    }

    async fn load(&mut self, ticket: LoadTicket) -> LoadOutcome {
        let result = self.loader.load(ticket.chapter()).await;
        self.reader.complete_load(&ticket, result)
    }
}
