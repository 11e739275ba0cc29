//! The poll+render loop.

use crate::client::SnapshotSource;
use crate::poller::StatePoller;
use anyhow::Result;
use evolvit_core::{RenderConfig, SchedulerConfig};
use evolvit_render::{AnimationScheduler, DisplayList, FrameRenderer, FrameStats, RefreshDecision};
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Receives each finished frame
pub trait FrameSink {
    fn present(&mut self, frame: &DisplayList, stats: &FrameStats, status: &str) -> Result<()>;
}

pub struct Animator<S> {
    scheduler: AnimationScheduler,
    poller: StatePoller<S>,
    renderer: FrameRenderer,
    surface: DisplayList,
    refresh_period: Duration,
}

impl<S: SnapshotSource> Animator<S> {
    pub fn new(source: S, render: RenderConfig, scheduler: &SchedulerConfig) -> Self {
        Self {
            scheduler: AnimationScheduler::new(Duration::from_millis(
                scheduler.min_update_interval_ms,
            )),
            poller: StatePoller::new(source),
            renderer: FrameRenderer::new(render),
            surface: DisplayList::new(),
            refresh_period: Duration::from_secs_f64(1.0 / scheduler.refresh_rate_hz.max(1) as f64),
        }
    }

    pub fn poller(&self) -> &StatePoller<S> {
        &self.poller
    }

    pub fn surface(&self) -> &DisplayList {
        &self.surface
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    /// One poll followed by one render of whatever snapshot is current
    pub async fn cycle(&mut self) -> FrameStats {
        self.poller.poll().await;
        self.renderer
            .render_frame(self.poller.snapshot(), &mut self.surface)
    }

    /// Drive cycles from refresh ticks until `cancel` fires.
    ///
    /// The in-flight fetch is never interrupted; cancellation takes effect
    /// on the next refresh.
    pub async fn run<K: FrameSink>(&mut self, sink: &mut K, cancel: CancellationToken) -> Result<()> {
        let start = Instant::now();
        let mut ticker = interval(self.refresh_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            min_interval_ms = self.scheduler.min_interval().as_millis() as u64,
            "Animation loop started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => self.scheduler.stop(),
                _ = ticker.tick() => {}
            }

            match self.scheduler.on_refresh(start.elapsed()) {
                RefreshDecision::Stop => break,
                RefreshDecision::Wait => continue,
                RefreshDecision::Update => {
                    let stats = self.cycle().await;
                    let took = self.scheduler.complete(start.elapsed());

                    crate::record_histogram!("cycle_duration_ms", took.as_secs_f64() * 1000.0);
                    if took > self.scheduler.min_interval() {
                        debug!(took_ms = took.as_millis() as u64, "Cycle overran the update interval");
                    }

                    sink.present(&self.surface, &stats, &self.poller.status_line())?;
                }
            }
        }

        info!(cycles = self.scheduler.cycles(), "Animation loop stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::tests::{sample_snapshot, ScriptedSource};
    use evolvit_core::{Color, Error, Point};
    use evolvit_render::Shape;

    #[derive(Default)]
    struct CollectingSink {
        frames: Vec<(usize, FrameStats, String)>,
    }

    impl FrameSink for CollectingSink {
        fn present(&mut self, frame: &DisplayList, stats: &FrameStats, status: &str) -> Result<()> {
            self.frames.push((frame.shapes().len(), *stats, status.to_string()));
            Ok(())
        }
    }

    fn animator(results: Vec<evolvit_core::Result<evolvit_core::Snapshot>>) -> Animator<ScriptedSource> {
        Animator::new(
            ScriptedSource::new(results),
            RenderConfig::default(),
            &SchedulerConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_failed_fetch_renders_previous_snapshot() {
        let mut animator = animator(vec![
            Ok(sample_snapshot()),
            Err(Error::Network("connection refused".to_string())),
        ]);

        let first = animator.cycle().await;
        let first_shapes = animator.surface().shapes().to_vec();

        let second = animator.cycle().await;

        assert_eq!(first, second);
        assert_eq!(second.creatures_drawn, 1);
        assert_eq!(animator.surface().shapes(), first_shapes.as_slice());
        assert!(animator.surface().shapes().contains(&Shape::Circle {
            center: Point::new(105.0, 100.0),
            radius: 4.0,
            color: Color::RED,
        }));
        assert_eq!(animator.poller().consecutive_failures(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_presents_frames_until_cancelled() {
        let scheduler = SchedulerConfig {
            min_update_interval_ms: 100,
            refresh_rate_hz: 100,
        };
        let mut animator = Animator::new(
            ScriptedSource::new(vec![Ok(sample_snapshot())]),
            RenderConfig::default(),
            &scheduler,
        );
        let mut sink = CollectingSink::default();
        let cancel = CancellationToken::new();

        let stopper = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(450)).await;
            stopper.cancel();
        });

        animator.run(&mut sink, cancel).await.unwrap();

        // Cycles at 0, 100, 200, 300 and 400ms
        assert_eq!(sink.frames.len(), 5);
        assert_eq!(sink.frames[0].1.creatures_drawn, 1);
        assert_eq!(sink.frames[0].2, "live");
        // Later fetches fail; the first snapshot keeps being drawn
        assert_eq!(sink.frames[4].0, sink.frames[0].0);
        assert!(sink.frames[4].2.starts_with("stale"));
        assert!(animator.scheduler().is_stopped());
    }
}
