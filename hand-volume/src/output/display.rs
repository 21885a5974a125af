use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};

use super::level::{LevelUpdate, SharedLevel};
use super::{LevelDisplay, OutputSink};

#[derive(Debug)]
enum Message {
    Level(LevelUpdate),
    Shutdown,
}

/// Send side of the display context. Posting never blocks.
#[derive(Debug, Clone)]
pub struct LevelPoster {
    tx: Sender<Message>,
}

impl LevelPoster {
    pub fn post(&self, update: LevelUpdate) {
        if self.tx.send(Message::Level(update)).is_err() {
            tracing::warn!(
                "Display context has stopped, dropping level {}",
                update.level
            );
        }
    }
}

/// The one thread allowed to touch the output sink and the level display.
///
/// Every update is written to the [`SharedLevel`], the sink and the display
/// with the same value, in that order.
pub struct DisplayContext {
    poster: LevelPoster,
    shared: SharedLevel,
    handle: Option<JoinHandle<()>>,
}

impl DisplayContext {
    pub fn spawn<S>(
        sink: S,
        display: Option<Box<dyn LevelDisplay + Send>>,
        shared: SharedLevel,
    ) -> Result<Self>
    where
        S: OutputSink + Send + 'static,
    {
        let (tx, rx) = unbounded();
        let thread_shared = shared.clone();

        let handle = thread::Builder::new()
            .name("display".to_string())
            .spawn(move || run_display(rx, sink, display, thread_shared))
            .context("Failed to spawn display thread")?;

        Ok(Self {
            poster: LevelPoster { tx },
            shared,
            handle: Some(handle),
        })
    }

    pub fn poster(&self) -> LevelPoster {
        self.poster.clone()
    }

    pub fn level(&self) -> &SharedLevel {
        &self.shared
    }

    /// Apply every update posted so far, then stop the thread.
    pub fn shutdown(mut self) -> Result<()> {
        // The thread may already be gone if the sink panicked; join reports it.
        let _ = self.poster.tx.send(Message::Shutdown);
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| anyhow!("Display thread panicked")),
            None => Ok(()),
        }
    }
}

fn run_display<S: OutputSink>(
    rx: Receiver<Message>,
    mut sink: S,
    mut display: Option<Box<dyn LevelDisplay + Send>>,
    shared: SharedLevel,
) {
    tracing::debug!("Display context started");

    for message in rx {
        let update = match message {
            Message::Level(update) => update,
            Message::Shutdown => break,
        };

        shared.store(update.level);

        if let Err(e) = sink.set_level(update.level, update.max_level) {
            tracing::warn!("Failed to apply level {}: {:#}", update.level, e);
        }

        if let Some(display) = display.as_mut() {
            display.show(update.level, update.max_level);
        }
    }

    tracing::debug!("Display context stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<(u32, u32)>>>);

    impl Recorder {
        fn calls(&self) -> Vec<(u32, u32)> {
            self.0.lock().unwrap().clone()
        }
    }

    impl OutputSink for Recorder {
        fn set_level(&mut self, level: u32, max_level: u32) -> Result<()> {
            self.0.lock().unwrap().push((level, max_level));
            Ok(())
        }
    }

    impl LevelDisplay for Recorder {
        fn show(&mut self, level: u32, max_level: u32) {
            self.0.lock().unwrap().push((level, max_level));
        }
    }

    struct FailingSink;

    impl OutputSink for FailingSink {
        fn set_level(&mut self, _level: u32, _max_level: u32) -> Result<()> {
            bail!("mixer unavailable")
        }
    }

    #[test]
    fn sink_and_display_see_identical_levels() {
        let sink = Recorder::default();
        let display = Recorder::default();
        let context = DisplayContext::spawn(
            sink.clone(),
            Some(Box::new(display.clone())),
            SharedLevel::default(),
        )
        .unwrap();

        let poster = context.poster();
        for level in [3, 9, 0, 15] {
            poster.post(LevelUpdate {
                level,
                max_level: 15,
            });
        }
        let shared = context.level().clone();
        context.shutdown().unwrap();

        let expected = vec![(3, 15), (9, 15), (0, 15), (15, 15)];
        assert_eq!(sink.calls(), expected);
        assert_eq!(display.calls(), expected);
        assert_eq!(shared.get(), 15);
    }

    #[test]
    fn sink_errors_do_not_stop_the_context() {
        let display = Recorder::default();
        let context =
            DisplayContext::spawn(FailingSink, Some(Box::new(display.clone())), SharedLevel::default())
                .unwrap();

        let poster = context.poster();
        poster.post(LevelUpdate { level: 6, max_level: 15 });
        poster.post(LevelUpdate { level: 12, max_level: 15 });
        let shared = context.level().clone();
        context.shutdown().unwrap();

        assert_eq!(display.calls(), vec![(6, 15), (12, 15)]);
        assert_eq!(shared.get(), 12);
    }

    #[test]
    fn posting_after_shutdown_is_harmless() {
        let context =
            DisplayContext::spawn(Recorder::default(), None, SharedLevel::default()).unwrap();
        let poster = context.poster();
        context.shutdown().unwrap();

        poster.post(LevelUpdate { level: 1, max_level: 5 });
    }
}
