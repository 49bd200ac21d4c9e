//! Read → decode → present loop
//!
//! Pulls bytes from a [`ByteSource`] in small chunks, feeds them one at a
//! time to a [`FrameDecoder`] and hands every completed frame to a
//! [`FrameSink`]. Runs until the sink asks to quit or either side fails.

use paa3905_display::{FrameSink, SinkControl};
use paa3905_hal::ByteSource;
use paa3905_protocol::{FrameCompleted, FrameDecoder};

/// Buffer size for each source read
pub const RX_BUF_SIZE: usize = 64;

/// Counters kept while the pipeline runs
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStats {
    /// Bytes read from the source
    pub bytes: u64,
    /// Frames handed to the sink
    pub frames: u64,
    /// Frames whose sentinel arrived before 1225 samples
    pub short_frames: u64,
    /// Frames that received more than 1225 samples
    pub overrun_frames: u64,
}

/// Pipeline failure, tagged by side
#[derive(Debug, thiserror::Error)]
pub enum PipelineError<S, K> {
    #[error("byte source failed: {0}")]
    Source(#[source] S),
    #[error("frame sink failed: {0}")]
    Sink(#[source] K),
}

pub struct Pipeline<S, K> {
    source: S,
    sink: K,
    decoder: FrameDecoder,
    stats: PipelineStats,
}

impl<S: ByteSource, K: FrameSink> Pipeline<S, K> {
    pub fn new(source: S, sink: K) -> Self {
        Self {
            source,
            sink,
            decoder: FrameDecoder::new(),
            stats: PipelineStats::default(),
        }
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (S, K) {
        (self.source, self.sink)
    }

    /// Run until the sink quits
    ///
    /// Returns the final counters on a user quit.
    pub fn run(&mut self) -> Result<PipelineStats, PipelineError<S::Error, K::Error>> {
        loop {
            if self.step()?.is_quit() {
                return Ok(self.stats);
            }
        }
    }

    /// Perform one source read and process what it returned
    ///
    /// An idle read polls the sink instead. Bytes after a frame that made
    /// the sink quit are dropped.
    pub fn step(&mut self) -> Result<SinkControl, PipelineError<S::Error, K::Error>> {
        let mut buf = [0u8; RX_BUF_SIZE];
        let n = self
            .source
            .read_blocking(&mut buf)
            .map_err(PipelineError::Source)?;

        if n == 0 {
            return self.sink.poll().map_err(PipelineError::Sink);
        }

        self.stats.bytes += n as u64;
        log::trace!("RX: {} bytes", n);

        for &byte in &buf[..n] {
            if let Some(completed) = self.decoder.feed(byte) {
                if self.handle_frame(completed)?.is_quit() {
                    return Ok(SinkControl::Quit);
                }
            }
        }
        Ok(SinkControl::Continue)
    }

    fn handle_frame(
        &mut self,
        completed: FrameCompleted,
    ) -> Result<SinkControl, PipelineError<S::Error, K::Error>> {
        self.stats.frames += 1;
        if completed.is_short() {
            self.stats.short_frames += 1;
            // The first frame after attach is normally partial
            log::debug!(
                "Short frame #{}: {} samples",
                self.stats.frames,
                completed.samples
            );
        } else if completed.overran() {
            self.stats.overrun_frames += 1;
            log::warn!(
                "Frame #{} overran: {} samples, missing sentinel?",
                self.stats.frames,
                completed.samples
            );
        } else {
            log::debug!(
                "Frame #{}: mean {}",
                self.stats.frames,
                completed.frame.mean()
            );
        }

        self.sink
            .present(&completed.frame)
            .map_err(PipelineError::Sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paa3905_display::DisplayError;
    use paa3905_hal::{Exhausted, SliceSource};
    use paa3905_protocol::{encode_frame, Frame, FRAME_PIXELS, SENTINEL};

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<Frame>,
        polls: usize,
        quit_after: Option<usize>,
    }

    impl FrameSink for RecordingSink {
        type Error = DisplayError;

        fn present(&mut self, frame: &Frame) -> Result<SinkControl, Self::Error> {
            self.frames.push(frame.clone());
            match self.quit_after {
                Some(limit) if self.frames.len() >= limit => Ok(SinkControl::Quit),
                _ => Ok(SinkControl::Continue),
            }
        }

        fn poll(&mut self) -> Result<SinkControl, Self::Error> {
            self.polls += 1;
            Ok(SinkControl::Continue)
        }
    }

    /// Yields one idle read, then the wrapped bytes
    struct IdleOnce<'a> {
        idled: bool,
        inner: SliceSource<'a>,
    }

    impl ByteSource for IdleOnce<'_> {
        type Error = Exhausted;

        fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            if !self.idled {
                self.idled = true;
                return Ok(0);
            }
            self.inner.read_blocking(buf)
        }
    }

    fn gradient() -> [u8; FRAME_PIXELS] {
        let mut raster = [0u8; FRAME_PIXELS];
        for (i, sample) in raster.iter_mut().enumerate() {
            *sample = (i % 250) as u8;
        }
        raster
    }

    #[test]
    fn test_frames_reach_sink_in_order() {
        let raster = gradient();
        let mut stream = vec![1, 2, 3, SENTINEL];
        stream.extend_from_slice(&encode_frame(&raster));
        stream.extend_from_slice(&encode_frame(&[9; FRAME_PIXELS]));

        let mut sink = RecordingSink::default();
        let mut pipeline = Pipeline::new(SliceSource::new(&stream), &mut sink);

        // Finite source ends the run
        assert!(matches!(
            pipeline.run(),
            Err(PipelineError::Source(Exhausted))
        ));
        let stats = pipeline.stats();
        drop(pipeline);

        assert_eq!(sink.frames.len(), 3);
        assert_eq!(sink.frames[0].get(34, 34), Some(1));
        assert_eq!(sink.frames[1], Frame::from_sensor_raster(&raster));
        assert!(sink.frames[2].pixels().all(|p| p == 9));

        assert_eq!(stats.bytes, stream.len() as u64);
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.short_frames, 1);
        assert_eq!(stats.overrun_frames, 0);
    }

    #[test]
    fn test_quit_stops_run() {
        let mut stream = Vec::new();
        for _ in 0..5 {
            stream.extend_from_slice(&[4, 5, SENTINEL]);
        }

        let sink = RecordingSink {
            quit_after: Some(2),
            ..Default::default()
        };
        let mut pipeline = Pipeline::new(SliceSource::new(&stream), sink);

        let stats = pipeline.run().unwrap();
        assert_eq!(stats.frames, 2);

        let (_, sink) = pipeline.into_parts();
        assert_eq!(sink.frames.len(), 2);
    }

    #[test]
    fn test_idle_read_polls_sink() {
        let stream = [SENTINEL];
        let source = IdleOnce {
            idled: false,
            inner: SliceSource::new(&stream),
        };
        let mut pipeline = Pipeline::new(source, RecordingSink::default());

        assert_eq!(pipeline.step().unwrap(), SinkControl::Continue);
        assert_eq!(pipeline.stats().frames, 0);
        assert_eq!(pipeline.step().unwrap(), SinkControl::Continue);

        let (_, sink) = pipeline.into_parts();
        assert_eq!(sink.polls, 1);
        assert_eq!(sink.frames.len(), 1);
    }

    #[test]
    fn test_overrun_is_counted() {
        let mut stream = vec![3u8; FRAME_PIXELS + 10];
        stream.push(SENTINEL);

        let mut pipeline = Pipeline::new(SliceSource::new(&stream), RecordingSink::default());
        let _ = pipeline.run();

        let stats = pipeline.stats();
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.overrun_frames, 1);
        assert_eq!(stats.short_frames, 0);
    }

    #[test]
    fn test_frame_split_across_reads() {
        // Longer than several RX buffers
        let stream = encode_frame(&gradient());
        assert!(stream.len() > RX_BUF_SIZE * 10);

        let mut pipeline = Pipeline::new(SliceSource::new(&stream), RecordingSink::default());
        let _ = pipeline.run();

        let (_, sink) = pipeline.into_parts();
        assert_eq!(sink.frames, vec![Frame::from_sensor_raster(&gradient())]);
    }

    #[test]
    fn test_terminal_stop_flag_ends_run_cleanly() {
        use crate::sink::TerminalSink;
        use std::sync::atomic::AtomicBool;
        use std::sync::Arc;

        let stream = [7, SENTINEL];
        let source = IdleOnce {
            idled: false,
            inner: SliceSource::new(&stream),
        };
        let sink = TerminalSink::new(Vec::new(), Arc::new(AtomicBool::new(true)));
        let mut pipeline = Pipeline::new(source, sink);

        // Quit on the idle poll, before any bytes are read
        let stats = pipeline.run().unwrap();
        assert_eq!(stats, PipelineStats::default());
    }
}
