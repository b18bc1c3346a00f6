use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, info};

use crate::bounce::BounceAnimator;
use crate::config::{CoverConfig, TimingConfig};
use crate::countdown::{format_clock, Countdown, Tick};
use crate::cover::{Alignment, CoverSurface, Side};
use crate::palette::ColorCycler;
use crate::player::PlayerHandle;
use crate::schedule::{cancel_if_present, Activities, Scheduler};

/// Externally visible state of the break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreakState {
    pub active: bool,
    pub seconds_remaining: u32,
    pub alignment: Alignment,
}

struct Session {
    active: bool,
    alignment: Alignment,
    // Bumped on every start and end; timer callbacks carry the value they
    // were armed with and do nothing once it is stale.
    generation: u64,
    countdown: Countdown,
    bounce: BounceAnimator,
    colors: ColorCycler,
    rng: fastrand::Rng,
    cover: Box<dyn CoverSurface>,
    work: Activities,
}

impl Session {
    fn is_current(&self, generation: u64) -> bool {
        self.active && self.generation == generation
    }

    fn attach_cover(&mut self) {
        if let Err(err) = self.cover.ensure_attached() {
            debug!("cover not attached yet: {}", err);
        }
    }

    fn randomize_label(&mut self) {
        let bounds = self.cover.bounds();
        let label = self.cover.label_size();
        self.bounce.randomize_start(bounds, label, &mut self.rng);
        let (x, y) = self.bounce.position();
        self.cover.set_label_position(x, y);
    }

    fn step_label(&mut self) {
        let bounds = self.cover.bounds();
        let label = self.cover.label_size();
        self.bounce.step(bounds, label);
        let (x, y) = self.bounce.position();
        self.cover.set_label_position(x, y);
    }

    fn advance_color(&mut self) {
        let color = self.colors.advance();
        self.cover.set_label_color(color);
    }

    fn apply_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
        self.cover.set_alignment(alignment);
    }

    /// Cover shown at full width with the first color and a fresh label position.
    fn open(&mut self, seconds: u32) {
        self.work.cancel_all();
        self.generation += 1;
        self.active = true;
        self.countdown.start(seconds);

        self.attach_cover();
        self.apply_alignment(Alignment::Full);
        self.cover.set_label_text(&format_clock(seconds));
        let color = self.colors.reset();
        self.cover.set_label_color(color);
        self.cover.show();
        self.randomize_label();
    }

    fn close(&mut self) {
        self.work.cancel_all();
        self.generation += 1;
        self.active = false;
        self.countdown.reset();

        self.cover.hide();
        self.cover.set_label_text("");
        let color = self.colors.reset();
        self.cover.set_label_color(color);
        self.apply_alignment(Alignment::Full);
    }
}

struct Inner {
    timing: TimingConfig,
    player: Box<dyn PlayerHandle>,
    scheduler: Rc<dyn Scheduler>,
    session: RefCell<Session>,
}

/// Coordinates muting, the cover and the countdown for commercial breaks.
///
/// Cloning yields another handle to the same controller. Scheduled callbacks
/// hold weak references, so dropping the last handle silences them.
#[derive(Clone)]
pub struct BreakController {
    inner: Rc<Inner>,
}

impl BreakController {
    pub fn new(
        config: &CoverConfig,
        player: Box<dyn PlayerHandle>,
        mut cover: Box<dyn CoverSurface>,
        scheduler: Rc<dyn Scheduler>,
        rng: fastrand::Rng,
    ) -> Self {
        let colors = ColorCycler::new(config.appearance.palette.clone());
        cover.hide();
        cover.set_label_text("");
        cover.set_label_color(colors.current());
        cover.set_alignment(Alignment::Full);

        let session = Session {
            active: false,
            alignment: Alignment::Full,
            generation: 0,
            countdown: Countdown::new(),
            bounce: BounceAnimator::new(config.timing.bounce_speed),
            colors,
            rng,
            cover,
            work: Activities::default(),
        };

        BreakController {
            inner: Rc::new(Inner {
                timing: config.timing,
                player,
                scheduler,
                session: RefCell::new(session),
            }),
        }
    }

    pub fn state(&self) -> BreakState {
        let session = self.inner.session.borrow();
        BreakState {
            active: session.active,
            seconds_remaining: session.countdown.remaining(),
            alignment: session.alignment,
        }
    }

    pub fn is_active(&self) -> bool {
        self.inner.session.borrow().active
    }

    pub fn color_index(&self) -> usize {
        self.inner.session.borrow().colors.index()
    }

    /// Mutes the player and covers it for `seconds`. A break already in
    /// progress is torn down first; its remaining time is discarded.
    pub fn start_break(&self, seconds: u32) {
        let Some(surface) = self.inner.player.locate() else {
            debug!("player not found, break not started");
            return;
        };
        surface.set_muted(true);

        let generation = {
            let mut session = self.inner.session.borrow_mut();
            session.open(seconds);
            session.generation
        };
        self.arm(generation, seconds.saturating_mul(1000));
        info!("break started for {}", format_clock(seconds));
    }

    /// Unmutes and uncovers the player and stops every break activity.
    /// Safe to call when no break is active.
    pub fn end_break(&self) {
        let Some(surface) = self.inner.player.locate() else {
            debug!("player not found, break left as is");
            return;
        };
        surface.set_muted(false);

        let was_active = {
            let mut session = self.inner.session.borrow_mut();
            let was_active = session.active;
            session.close();
            was_active
        };
        if was_active {
            info!("break ended");
        }
    }

    /// Starts a break of `seconds` when idle; otherwise adds `seconds` to the
    /// running break and moves its deadline. The animation keeps running.
    ///
    /// A break whose automatic end was skipped because the player was gone
    /// has a stopped countdown; extending it restarts the ticks.
    pub fn extend_or_start(&self, seconds: u32) {
        if !self.is_active() {
            self.start_break(seconds);
            return;
        }

        let (generation, deadline_ms, label, stalled) = {
            let mut session = self.inner.session.borrow_mut();
            let stalled = !session.countdown.is_running();
            session.countdown.extend(seconds);
            let label = session.countdown.label();
            session.cover.set_label_text(&label);
            cancel_if_present(&mut session.work.deadline);
            if stalled {
                cancel_if_present(&mut session.work.countdown);
            }
            (session.generation, session.countdown.deadline_ms(), label, stalled)
        };

        let scheduler = &self.inner.scheduler;
        let deadline = scheduler.after(
            deadline_ms,
            Box::new(self.task(generation, Self::on_deadline)),
        );
        let countdown = stalled.then(|| {
            scheduler.every(
                self.inner.timing.tick_ms,
                Box::new(self.task(generation, Self::on_tick)),
            )
        });

        {
            let mut session = self.inner.session.borrow_mut();
            session.work.deadline = Some(deadline);
            if countdown.is_some() {
                session.work.countdown = countdown;
            }
        }
        info!("break extended to {}", label);
    }

    /// Shrinks the cover toward one side, or restores full width when it is
    /// already shrunk that way. Ignored while idle or while the cover is hidden.
    pub fn toggle_alignment(&self, side: Side) {
        let mut session = self.inner.session.borrow_mut();
        if !session.active || !session.cover.is_visible() {
            return;
        }
        let next = session.alignment.toggled(side);
        session.apply_alignment(next);
        session.randomize_label();
        debug!("cover alignment now {:?}", next);
    }

    /// Handles a change in the host page: attaches the cover to a newly
    /// mounted player and keeps the player unmuted outside of a break.
    pub fn sync_player(&self) {
        let active = {
            let mut session = self.inner.session.borrow_mut();
            session.attach_cover();
            session.active
        };
        if active {
            return;
        }
        if let Some(surface) = self.inner.player.locate() {
            surface.set_muted(false);
        }
    }

    fn arm(&self, generation: u64, deadline_ms: u32) {
        let scheduler = &self.inner.scheduler;
        let countdown = scheduler.every(
            self.inner.timing.tick_ms,
            Box::new(self.task(generation, Self::on_tick)),
        );
        let color = scheduler.every(
            self.inner.timing.color_period_ms,
            Box::new(self.task(generation, Self::on_color)),
        );
        let frame = scheduler.next_frame(Box::new(self.task(generation, Self::on_frame)));
        let deadline = scheduler.after(
            deadline_ms,
            Box::new(self.task(generation, Self::on_deadline)),
        );

        let mut session = self.inner.session.borrow_mut();
        session.work.countdown = Some(countdown);
        session.work.color = Some(color);
        session.work.frame = Some(frame);
        session.work.deadline = Some(deadline);
    }

    fn task(&self, generation: u64, run: fn(&BreakController, u64)) -> impl FnMut() + 'static {
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        move || {
            if let Some(inner) = weak.upgrade() {
                run(&BreakController { inner }, generation);
            }
        }
    }

    fn on_tick(&self, generation: u64) {
        let expired = {
            let mut session = self.inner.session.borrow_mut();
            if !session.is_current(generation) {
                return;
            }
            match session.countdown.tick() {
                Tick::Updated(left) => {
                    session.cover.set_label_text(&format_clock(left));
                    false
                }
                Tick::Expired => {
                    cancel_if_present(&mut session.work.countdown);
                    true
                }
            }
        };
        if expired {
            self.end_break();
        }
    }

    fn on_color(&self, generation: u64) {
        let mut session = self.inner.session.borrow_mut();
        if session.is_current(generation) {
            session.advance_color();
        }
    }

    fn on_frame(&self, generation: u64) {
        {
            let mut session = self.inner.session.borrow_mut();
            if !session.is_current(generation) {
                return;
            }
            session.step_label();
        }
        let frame = self
            .inner
            .scheduler
            .next_frame(Box::new(self.task(generation, Self::on_frame)));
        self.inner.session.borrow_mut().work.frame = Some(frame);
    }

    fn on_deadline(&self, generation: u64) {
        {
            let mut session = self.inner.session.borrow_mut();
            if !session.is_current(generation) {
                return;
            }
            session.work.deadline = None;
        }
        self.end_break();
    }

    #[cfg(test)]
    pub(crate) fn activities_idle(&self) -> bool {
        self.inner.session.borrow().work.is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Rig;

    #[test]
    fn starts_idle_with_hidden_cover() {
        let rig = Rig::new();
        assert_eq!(rig.controller.state(), BreakState::default());
        assert!(!rig.cover.borrow().visible);
        assert_eq!(rig.clock.pending(), 0);
    }

    #[test]
    fn start_mutes_and_covers() {
        let rig = Rig::new();
        rig.controller.start_break(30);

        let state = rig.controller.state();
        assert!(state.active);
        assert_eq!(state.seconds_remaining, 30);
        assert_eq!(state.alignment, Alignment::Full);
        assert!(rig.muted());

        let cover = rig.cover.borrow();
        assert!(cover.visible);
        assert!(cover.attached);
        assert_eq!(cover.text, "0:30");
        assert_eq!(cover.color, "#1E90FF");
        assert_eq!(rig.clock.pending(), 4);
    }

    #[test]
    fn countdown_updates_label_each_second() {
        let rig = Rig::new();
        rig.controller.start_break(65);
        rig.clock.advance(1000);
        assert_eq!(rig.cover.borrow().text, "1:04");
        rig.clock.advance(60_000);
        assert_eq!(rig.cover.borrow().text, "0:04");
        assert_eq!(rig.controller.state().seconds_remaining, 4);
    }

    #[test]
    fn ending_twice_is_idempotent() {
        let rig = Rig::new();
        rig.controller.start_break(120);
        rig.clock.advance(4500);
        rig.controller.toggle_alignment(Side::Left);

        rig.controller.end_break();
        rig.controller.end_break();

        assert_eq!(rig.controller.state(), BreakState::default());
        assert_eq!(rig.controller.color_index(), 0);
        assert!(!rig.muted());
        assert!(!rig.cover.borrow().visible);
        assert_eq!(rig.cover.borrow().text, "");
        assert_eq!(rig.cover.borrow().alignment, Alignment::Full);
        assert!(rig.controller.activities_idle());
        assert_eq!(rig.clock.pending(), 0);
    }

    #[test]
    fn ending_from_idle_just_unmutes() {
        let rig = Rig::new();
        rig.controller.end_break();
        rig.controller.end_break();
        assert_eq!(rig.controller.state(), BreakState::default());
        assert_eq!(rig.player.borrow().mute_calls, vec![false, false]);
    }

    #[test]
    fn restart_replaces_the_running_break() {
        let rig = Rig::new();
        rig.controller.start_break(120);
        rig.controller.start_break(30);

        assert_eq!(rig.controller.state().seconds_remaining, 30);
        assert_eq!(rig.clock.pending(), 4);

        rig.clock.advance(10_000);
        assert_eq!(rig.controller.state().seconds_remaining, 20);

        rig.clock.advance(19_999);
        assert!(rig.controller.is_active());
        rig.clock.advance(1);
        assert!(!rig.controller.is_active());

        rig.clock.advance(200_000);
        assert_eq!(rig.player.borrow().mute_calls, vec![true, true, false]);
        assert_eq!(rig.clock.pending(), 0);
    }

    #[test]
    fn extend_adds_to_remaining_time_and_moves_deadline() {
        let rig = Rig::new();
        rig.controller.extend_or_start(60);
        assert_eq!(rig.controller.state().seconds_remaining, 60);

        rig.clock.advance(10_000);
        assert_eq!(rig.controller.state().seconds_remaining, 50);
        let color_before = rig.controller.color_index();

        rig.controller.extend_or_start(60);
        assert_eq!(rig.controller.state().seconds_remaining, 110);
        assert_eq!(rig.cover.borrow().text, "1:50");
        assert_eq!(rig.controller.color_index(), color_before);
        assert_eq!(rig.player.borrow().mute_calls, vec![true]);

        // The first 60 second deadline has passed; the break continues.
        rig.clock.advance(60_000);
        assert!(rig.controller.is_active());

        rig.clock.advance(49_999);
        assert!(rig.controller.is_active());
        rig.clock.advance(1);
        assert!(!rig.controller.is_active());
        assert_eq!(rig.player.borrow().mute_calls, vec![true, false]);
        assert_eq!(rig.clock.pending(), 0);
    }

    #[test]
    fn alignment_toggles_only_while_active() {
        let rig = Rig::new();
        rig.controller.toggle_alignment(Side::Left);
        assert_eq!(rig.controller.state().alignment, Alignment::Full);
        assert_eq!(rig.cover.borrow().alignment, Alignment::Full);

        rig.controller.start_break(30);
        rig.controller.toggle_alignment(Side::Left);
        assert_eq!(rig.controller.state().alignment, Alignment::RightShrunk);
        rig.controller.toggle_alignment(Side::Left);
        assert_eq!(rig.controller.state().alignment, Alignment::Full);

        rig.controller.toggle_alignment(Side::Left);
        rig.controller.toggle_alignment(Side::Right);
        assert_eq!(rig.controller.state().alignment, Alignment::LeftShrunk);
        assert_eq!(rig.cover.borrow().alignment, Alignment::LeftShrunk);
    }

    #[test]
    fn new_break_resets_alignment() {
        let rig = Rig::new();
        rig.controller.start_break(30);
        rig.controller.toggle_alignment(Side::Right);
        rig.controller.start_break(30);
        assert_eq!(rig.controller.state().alignment, Alignment::Full);
        assert_eq!(rig.cover.borrow().alignment, Alignment::Full);
    }

    #[test]
    fn label_stays_inside_cover_across_toggles() {
        let rig = Rig::new();
        rig.controller.start_break(120);
        for step in 0..40 {
            rig.clock.advance(1_500);
            let side = if step % 3 == 0 { Side::Left } else { Side::Right };
            rig.controller.toggle_alignment(side);
        }
        let cover = rig.cover.borrow();
        assert!(cover.positions > 1000);
        assert_eq!(cover.out_of_bounds, 0);
    }

    #[test]
    fn colors_cycle_every_two_seconds_and_reset_on_end() {
        let rig = Rig::new();
        rig.controller.start_break(120);
        rig.clock.advance(1999);
        assert_eq!(rig.controller.color_index(), 0);
        rig.clock.advance(1);
        assert_eq!(rig.controller.color_index(), 1);
        rig.clock.advance(8000);
        assert_eq!(rig.controller.color_index(), 0);
        rig.clock.advance(2000);
        assert_eq!(rig.cover.borrow().color, "#228B22");

        rig.controller.end_break();
        assert_eq!(rig.controller.color_index(), 0);
        assert_eq!(rig.cover.borrow().color, "#1E90FF");
    }

    #[test]
    fn short_break_ends_on_its_own_exactly_once() {
        let rig = Rig::new();
        rig.controller.start_break(1);
        rig.clock.advance(1000);
        assert!(!rig.controller.is_active());
        assert_eq!(rig.clock.pending(), 0);

        rig.clock.advance(10_000);
        assert_eq!(rig.player.borrow().mute_calls, vec![true, false]);
        assert!(rig.controller.activities_idle());
    }

    #[test]
    fn missing_player_abandons_start() {
        let rig = Rig::new();
        rig.present.set(false);
        rig.controller.start_break(30);
        assert!(!rig.controller.is_active());
        assert!(!rig.cover.borrow().visible);
        assert_eq!(rig.clock.pending(), 0);
    }

    #[test]
    fn missing_player_leaves_break_running_on_end() {
        let rig = Rig::new();
        rig.controller.start_break(30);
        rig.present.set(false);
        rig.controller.end_break();
        assert!(rig.controller.is_active());
        assert!(rig.muted());

        rig.present.set(true);
        rig.controller.end_break();
        assert!(!rig.controller.is_active());
        assert!(!rig.muted());
    }

    #[test]
    fn sync_unmutes_only_when_idle() {
        let rig = Rig::new();
        rig.controller.sync_player();
        assert_eq!(rig.player.borrow().mute_calls, vec![false]);

        rig.controller.start_break(30);
        rig.controller.sync_player();
        assert!(rig.muted());
        assert_eq!(rig.player.borrow().mute_calls, vec![false, true]);
    }

    #[test]
    fn sync_attaches_cover_once_player_mounts() {
        let rig = Rig::without_player();
        rig.controller.sync_player();
        assert!(!rig.cover.borrow().attached);
        assert!(rig.player.borrow().mute_calls.is_empty());

        rig.present.set(true);
        rig.attachable.set(true);
        rig.controller.sync_player();
        assert!(rig.cover.borrow().attached);
        assert_eq!(rig.player.borrow().mute_calls, vec![false]);
        assert!(!rig.cover.borrow().visible);

        rig.controller.start_break(30);
        assert!(rig.cover.borrow().visible);
        assert!(rig.cover.borrow().attached);
    }

    #[test]
    fn break_survives_unattachable_cover() {
        let rig = Rig::new();
        rig.attachable.set(false);
        rig.controller.start_break(30);
        assert!(rig.controller.is_active());
        assert!(!rig.cover.borrow().attached);

        rig.attachable.set(true);
        rig.controller.sync_player();
        assert!(rig.cover.borrow().attached);
        assert!(rig.muted());
    }

    #[test]
    fn hidden_cover_keeps_its_alignment() {
        let rig = Rig::new();
        rig.controller.start_break(30);
        rig.cover.borrow_mut().visible = false;
        rig.controller.toggle_alignment(Side::Left);
        assert_eq!(rig.controller.state().alignment, Alignment::Full);
        assert_eq!(rig.cover.borrow().alignment, Alignment::Full);
    }

    #[test]
    fn extend_restarts_countdown_stopped_by_missing_player() {
        let rig = Rig::new();
        rig.controller.start_break(2);
        rig.present.set(false);
        rig.clock.advance(3000);
        assert!(rig.controller.is_active());
        assert_eq!(rig.cover.borrow().text, "0:00");

        rig.present.set(true);
        rig.controller.extend_or_start(60);
        assert_eq!(rig.cover.borrow().text, "1:00");

        rig.clock.advance(10_000);
        assert_eq!(rig.controller.state().seconds_remaining, 50);
        assert_eq!(rig.cover.borrow().text, "0:50");

        rig.clock.advance(50_000);
        assert!(!rig.controller.is_active());
        assert!(!rig.muted());
        assert_eq!(rig.clock.pending(), 0);
    }

    #[test]
    fn dropped_controller_stops_firing() {
        let rig = Rig::new();
        rig.controller.start_break(30);
        let Rig {
            controller,
            clock,
            player,
            ..
        } = rig;
        drop(controller);
        assert_eq!(clock.pending(), 0);
        clock.advance(60_000);
        assert_eq!(player.borrow().mute_calls, vec![true]);
    }
}
