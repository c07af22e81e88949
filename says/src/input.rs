//! Input capture task.
//!
//! Invoked periodically by the board scheduler, it turns debounced switch
//! edges into logical `Event`s and hands them to the session through a
//! single-producer single-consumer queue. It never blocks and never draws.

use heapless::{
    consts::U8,
    spsc::{Consumer, Producer, Queue},
};
use log::{trace, warn};

use crate::direction::{Direction, Presses};
use crate::phase::{Phase, ResponsePhase};

/// Physical switches and sense lines read by the capture task
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Switch {
    North,
    East,
    South,
    West,
    Centre,
    /// Card-detect sense line, acknowledged with a long press
    CardDetect,
}

impl Switch {
    pub const DIRECTIONAL: [Switch; 4] = [Switch::North, Switch::East, Switch::South, Switch::West];

    pub const ALL: [Switch; 6] = [
        Switch::North,
        Switch::East,
        Switch::South,
        Switch::West,
        Switch::Centre,
        Switch::CardDetect,
    ];

    /// Position of the switch in `ALL`
    pub fn index(self) -> usize {
        match self {
            Switch::North => 0,
            Switch::East => 1,
            Switch::South => 2,
            Switch::West => 3,
            Switch::Centre => 4,
            Switch::CardDetect => 5,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Switch::North => Some(Direction::Up),
            Switch::East => Some(Direction::Right),
            Switch::South => Some(Direction::Down),
            Switch::West => Some(Direction::Left),
            Switch::Centre | Switch::CardDetect => None,
        }
    }
}

/// Debounced edge triggers of the board switches
///
/// Taking a trigger clears it, so each physical press yields one event.
pub trait Switches {
    /// Take a pending press edge of `switch`
    fn take_press(&mut self, switch: Switch) -> bool;
    /// Take a pending long press of `switch`
    fn take_long_press(&mut self, switch: Switch) -> bool;
}

/// Logical event produced by the capture task
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Event {
    /// Centre pressed while idle
    Start,
    /// South pressed while idle
    ViewScores,
    /// Directional presses captured while the level was accepting input
    Input(Presses),
    /// Directional press outside of an accepting window
    NotReady,
    /// Card insertion acknowledged on the sense line
    CardInserted,
}

pub type EventQueue = Queue<Event, U8>;
pub type EventProducer<'a> = Producer<'a, Event, U8>;
pub type EventConsumer<'a> = Consumer<'a, Event, U8>;

pub struct Capture<'a> {
    events: EventProducer<'a>,
    phase: &'a ResponsePhase,
    dropped: u32,
}

impl<'a> Capture<'a> {
    pub fn new(events: EventProducer<'a>, phase: &'a ResponsePhase) -> Self {
        Self {
            events,
            phase,
            dropped: 0,
        }
    }

    /// Number of events lost because the session fell behind
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Run one capture cycle
    pub fn poll<S: Switches>(&mut self, switches: &mut S) {
        if switches.take_long_press(Switch::CardDetect) {
            self.emit(Event::CardInserted);
        }

        let phase = self.phase.load();
        let centre = switches.take_press(Switch::Centre);
        if phase == Phase::Idle && centre {
            self.emit(Event::Start);
            return;
        }

        let mut presses = Presses::new();
        for &switch in Switch::DIRECTIONAL.iter() {
            if switches.take_press(switch) {
                if let Some(direction) = switch.direction() {
                    presses.insert(direction);
                }
            }
        }
        if presses.is_empty() {
            return;
        }

        match phase {
            Phase::Idle if presses.contains(Direction::Down) => self.emit(Event::ViewScores),
            Phase::Accepting => self.emit(Event::Input(presses)),
            Phase::Idle | Phase::Busy => self.emit(Event::NotReady),
        }
    }

    fn emit(&mut self, event: Event) {
        trace!("captured {:?}", event);
        if self.events.enqueue(event).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
            warn!("event queue full, dropping {:?}", event);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedSwitches;
    use super::*;

    #[test]
    fn centre_starts_when_idle() {
        let phase = ResponsePhase::new();
        let mut queue = EventQueue::new();
        let (producer, mut consumer) = queue.split();
        let mut capture = Capture::new(producer, &phase);
        let mut switches = ScriptedSwitches::new();

        switches.press(Switch::Centre);
        capture.poll(&mut switches);
        assert_eq!(consumer.dequeue(), Some(Event::Start));
        assert_eq!(consumer.dequeue(), None);
        assert!(!switches.is_pending(Switch::Centre));
    }

    #[test]
    fn south_views_scores_when_idle() {
        let phase = ResponsePhase::new();
        let mut queue = EventQueue::new();
        let (producer, mut consumer) = queue.split();
        let mut capture = Capture::new(producer, &phase);
        let mut switches = ScriptedSwitches::new();

        switches.press(Switch::South);
        capture.poll(&mut switches);
        assert_eq!(consumer.dequeue(), Some(Event::ViewScores));

        switches.press(Switch::East);
        capture.poll(&mut switches);
        assert_eq!(consumer.dequeue(), Some(Event::NotReady));
    }

    #[test]
    fn busy_reports_not_ready_and_swallows_centre() {
        let phase = ResponsePhase::new();
        phase.store(Phase::Busy);
        let mut queue = EventQueue::new();
        let (producer, mut consumer) = queue.split();
        let mut capture = Capture::new(producer, &phase);
        let mut switches = ScriptedSwitches::new();

        switches.press(Switch::Centre);
        capture.poll(&mut switches);
        assert_eq!(consumer.dequeue(), None);
        assert!(!switches.is_pending(Switch::Centre));

        switches.press(Switch::North);
        switches.press(Switch::South);
        capture.poll(&mut switches);
        assert_eq!(consumer.dequeue(), Some(Event::NotReady));
        assert_eq!(consumer.dequeue(), None);
    }

    #[test]
    fn accepting_forwards_all_presses_of_a_poll() {
        let phase = ResponsePhase::new();
        phase.store(Phase::Accepting);
        let mut queue = EventQueue::new();
        let (producer, mut consumer) = queue.split();
        let mut capture = Capture::new(producer, &phase);
        let mut switches = ScriptedSwitches::new();

        switches.press(Switch::West);
        switches.press(Switch::North);
        capture.poll(&mut switches);

        let mut expected = Presses::new();
        expected.insert(Direction::Left);
        expected.insert(Direction::Up);
        assert_eq!(consumer.dequeue(), Some(Event::Input(expected)));
        assert_eq!(consumer.dequeue(), None);

        capture.poll(&mut switches);
        assert_eq!(consumer.dequeue(), None);
    }

    #[test]
    fn card_insertion_in_any_phase() {
        let phase = ResponsePhase::new();
        phase.store(Phase::Accepting);
        let mut queue = EventQueue::new();
        let (producer, mut consumer) = queue.split();
        let mut capture = Capture::new(producer, &phase);
        let mut switches = ScriptedSwitches::new();

        switches.long_press_card();
        capture.poll(&mut switches);
        assert_eq!(consumer.dequeue(), Some(Event::CardInserted));
    }

    #[test]
    fn full_queue_drops_without_blocking() {
        let phase = ResponsePhase::new();
        let mut queue = EventQueue::new();
        let (producer, _consumer) = queue.split();
        let mut capture = Capture::new(producer, &phase);
        let mut switches = ScriptedSwitches::new();

        for _ in 0..12 {
            switches.press(Switch::East);
            capture.poll(&mut switches);
        }
        assert!(capture.dropped() > 0);
    }
}
