//! Game session state machine.
//!
//! The session owns round, strikes, score and the active level. It consumes
//! events produced by the capture task and is the only writer of the
//! response-phase gate: the gate is `Accepting` only between the end of
//! rendering and the input that completes or strikes the level.

use core::fmt::Write;

use heapless::{consts::U256, String};
use log::{debug, info, warn};

use crate::context::Context;
use crate::direction::Direction;
use crate::input::{Event, EventConsumer};
use crate::leaderboard::{self, Merge};
use crate::level::{flash_delay_ms, num_times_to_flash, Level, MAX_STRIKES};
use crate::phase::{Phase, ResponsePhase};
use crate::storage::StorageError;

/// LED pulse acknowledging a correct input
pub const CORRECT_PULSE_MS: u32 = 50;
/// LED pulse signalling a strike
pub const STRIKE_PULSE_MS: u32 = 500;

pub const WELCOME: &str = "Press centre to start or down to view high scores.";
pub const GO: &str = "GO!";
pub const NOT_READY: &str = "Not ready!";
pub const STRIKE: &str = "Strike!";
pub const NO_CARD: &str = "No card connected!";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum State {
    /// Waiting for a start signal
    Idle,
    /// A new level is about to be generated and shown
    Rendering,
    /// Level shown, matching player input
    AwaitingInput,
    /// Level fully matched, score and round already updated
    RoundPassed,
    /// Mismatch recorded, the same level is retried next
    Struck,
    /// Third strike, final score not yet handed to the leaderboard
    GameOver,
}

pub struct Session<'a, C: Context> {
    ctx: C,
    phase: &'a ResponsePhase,
    events: EventConsumer<'a>,
    state: State,
    round: u32,
    strikes: u8,
    score: u32,
    level: Level,
    card_inserted: bool,
}

impl<'a, C: Context> Session<'a, C> {
    pub fn new(ctx: C, phase: &'a ResponsePhase, events: EventConsumer<'a>) -> Self {
        phase.store(Phase::Idle);
        Self {
            ctx,
            phase,
            events,
            state: State::Idle,
            round: 1,
            strikes: 0,
            score: 0,
            level: Level::new(),
            card_inserted: false,
        }
    }

    /// Show the start prompt
    pub fn greet(&mut self) {
        self.ctx.clear_screen();
        self.ctx.show_text(WELCOME);
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn strikes(&self) -> u8 {
        self.strikes
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn card_inserted(&self) -> bool {
        self.card_inserted
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    /// Advance the state machine by one step
    ///
    /// Returns `WouldBlock` while idle or awaiting input with no event
    /// pending, otherwise the state entered.
    pub fn tick(&mut self) -> nb::Result<State, &'static str> {
        match self.state {
            State::Idle => {
                let event = self.events.dequeue().ok_or(nb::Error::WouldBlock)?;
                self.on_idle_event(event);
            }
            State::Rendering => self.render().map_err(nb::Error::Other)?,
            State::AwaitingInput => {
                let event = self.events.dequeue().ok_or(nb::Error::WouldBlock)?;
                self.on_game_event(event).map_err(nb::Error::Other)?;
            }
            State::RoundPassed => {
                self.ctx.clear_screen();
                self.state = State::Rendering;
            }
            State::Struck => {
                self.drain();
                self.ctx.clear_screen();
                self.phase.store(Phase::Accepting);
                self.ctx.show_text(GO);
                self.state = State::AwaitingInput;
            }
            State::GameOver => self.finish(),
        }
        Ok(self.state)
    }

    fn on_idle_event(&mut self, event: Event) {
        match event {
            Event::Start => self.start(),
            Event::ViewScores => self.show_scores(),
            Event::CardInserted => self.acknowledge_card(),
            Event::Input(_) | Event::NotReady => self.not_ready(),
        }
    }

    fn on_game_event(&mut self, event: Event) -> Result<(), &'static str> {
        match event {
            Event::Input(presses) if self.phase.is_accepting() => {
                let expected = self
                    .level
                    .expected()
                    .ok_or("Awaiting input without a pending flash")?;
                match presses.resolve(expected) {
                    Some(Ok(_)) => self.correct()?,
                    Some(Err(pressed)) => self.strike(expected, pressed),
                    None => {}
                }
            }
            Event::Input(_) | Event::NotReady => self.not_ready(),
            Event::CardInserted => self.acknowledge_card(),
            Event::Start | Event::ViewScores => debug!("ignoring {:?} during a game", event),
        }
        Ok(())
    }

    fn start(&mut self) {
        self.phase.store(Phase::Busy);
        self.round = 1;
        self.strikes = 0;
        self.score = 0;
        self.level = Level::new();
        self.drain();
        self.ctx.clear_screen();
        info!("game started");
        self.state = State::Rendering;
    }

    fn render(&mut self) -> Result<(), &'static str> {
        let len = num_times_to_flash(self.round, self.strikes);
        let ctx = &mut self.ctx;
        self.level = Level::generate(len, || ctx.gen_random())?;
        debug!(
            "round {}: {} flashes after {} strikes",
            self.round, len, self.strikes
        );

        let unit = flash_delay_ms(self.round);
        self.ctx.clear_screen();
        for i in 0..self.level.flashes().len() {
            let direction = self.level.flashes()[i];
            self.ctx.draw_arrow(direction);
            self.ctx.delay_ms(unit);
            self.ctx.clear_screen();
            // the blank gap shows inputs pressed while the arrow was up
            self.reject_pending();
            self.ctx.delay_ms(unit);
        }

        self.drain();
        self.phase.store(Phase::Accepting);
        self.ctx.show_text(GO);
        self.state = State::AwaitingInput;
        Ok(())
    }

    fn correct(&mut self) -> Result<(), &'static str> {
        self.level.advance()?;
        let complete = self.level.is_complete();
        if complete {
            self.phase.store(Phase::Busy);
        }
        self.pulse(CORRECT_PULSE_MS);
        if complete {
            let gained = self.level.len() as u32;
            self.score += gained;
            self.round += 1;
            info!(
                "level of {} passed, score {}, advancing to round {}",
                gained, self.score, self.round
            );
            self.drain();
            self.state = State::RoundPassed;
        }
        Ok(())
    }

    fn strike(&mut self, expected: Direction, pressed: Direction) {
        self.phase.store(Phase::Busy);
        self.strikes += 1;
        self.level.reset();
        info!(
            "strike {} of {}: expected {}, got {}",
            self.strikes,
            MAX_STRIKES,
            expected.as_str(),
            pressed.as_str()
        );
        self.ctx.clear_screen();
        self.ctx.show_text(STRIKE);
        self.pulse(STRIKE_PULSE_MS);
        self.reject_pending();
        self.state = if self.strikes >= MAX_STRIKES {
            State::GameOver
        } else {
            State::Struck
        };
    }

    fn finish(&mut self) {
        info!("game over after round {}, score {}", self.round, self.score);
        let status = self.record_score();

        let mut text: String<U256> = String::new();
        if self.summarize(status, &mut text).is_err() {
            warn!("game over summary truncated");
        }
        self.ctx.clear_screen();
        self.ctx.show_text(&text);

        self.level = Level::new();
        self.phase.store(Phase::Idle);
        self.state = State::Idle;
    }

    fn summarize(&self, status: Option<&str>, text: &mut String<U256>) -> core::fmt::Result {
        write!(text, "Game over.\nYour score: {}\n", self.score)?;
        if let Some(status) = status {
            writeln!(text, "{}", status)?;
        }
        text.write_str("Centre to play again or down to view scores.")
    }

    /// Hand the final score to the leaderboard, returning a status line
    fn record_score(&mut self) -> Option<&'static str> {
        if !self.card_inserted {
            return Some(NO_CARD);
        }
        match leaderboard::record(self.ctx.card(), self.score) {
            Ok(Merge::Inserted { rank: 1 }) => Some("New high score!"),
            Ok(Merge::Inserted { .. }) => Some("Made the top ten!"),
            Ok(Merge::Discarded) => None,
            Err(err) => Some(err.as_str()),
        }
    }

    fn show_scores(&mut self) {
        let mut text: String<U256> = String::new();
        if self.list_scores(&mut text).is_err() {
            warn!("score listing truncated");
        }
        self.ctx.clear_screen();
        self.ctx.show_text(&text);
    }

    fn list_scores(&mut self, text: &mut String<U256>) -> core::fmt::Result {
        text.write_str("High Scores:\n")?;
        if !self.card_inserted {
            writeln!(text, "{}", NO_CARD)?;
        } else {
            match leaderboard::load(self.ctx.card()) {
                Ok(board) if board.is_empty() => {
                    writeln!(text, "{}", StorageError::NotFound.as_str())?
                }
                Ok(board) => list_ranked(board.scores(), text)?,
                Err(err) => writeln!(text, "{}", err.as_str())?,
            }
        }
        text.write_str("Centre: new game. Down: reload scores.")
    }

    fn not_ready(&mut self) {
        debug!("input outside of the response phase");
        self.ctx.show_text(NOT_READY);
    }

    fn acknowledge_card(&mut self) {
        if !self.card_inserted {
            info!("card insertion acknowledged");
        }
        self.card_inserted = true;
    }

    fn pulse(&mut self, ms: u32) {
        self.ctx.led_on();
        self.ctx.delay_ms(ms);
        self.ctx.led_off();
    }

    /// Drain the queue, telling the player when inputs were thrown away
    fn reject_pending(&mut self) {
        if self.drain() > 0 {
            self.not_ready();
        }
    }

    /// Reject every pending input, keeping card acknowledgements
    fn drain(&mut self) -> usize {
        let mut rejected = 0;
        while let Some(event) = self.events.dequeue() {
            match event {
                Event::CardInserted => self.acknowledge_card(),
                Event::Input(_) | Event::NotReady => rejected += 1,
                Event::Start | Event::ViewScores => {}
            }
        }
        if rejected > 0 {
            debug!("rejected {} inputs outside of the response phase", rejected);
        }
        rejected
    }
}

/// Two ranked scores per row, so a full top ten fits on the panel
fn list_ranked<W: Write>(scores: &[u32], out: &mut W) -> core::fmt::Result {
    for (row, pair) in scores.chunks(2).enumerate() {
        let rank = row * 2 + 1;
        match pair {
            [left, right] => writeln!(out, "{:>2}. {:<6}{:>2}. {}", rank, left, rank + 1, right)?,
            [left] => writeln!(out, "{:>2}. {}", rank, left)?,
            _ => {}
        }
    }
    Ok(())
}
