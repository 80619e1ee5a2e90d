//! Mock collaborators for host tests
//!
//! One shared register file backs every collaborator trait, so a
//! callback can snapshot the hardware at the moment it runs.

use std::boxed::Box;
use std::sync::{Arc, Mutex, MutexGuard};
use std::vec::Vec;

use fanout_hal::{
    CycleCounter, Edge, EdgeRegisters, InterruptControl, Line, LineRegistry, ServiceRoutine,
    TimerRegisters, LINE_COUNT,
};

use crate::callback::Callback;
use crate::config::{BoardVariant, IcpControl, LineConfig, OcpControl, TimerLayout};
use crate::mux::{InterruptMux, Peripherals};
use crate::pins::PinDescriptor;
use crate::source::{ChannelIndex, GpioBit};

/// Line wiring of the reference board
pub const LINES: LineConfig = LineConfig {
    system_tick: 7,
    aux_timer: 4,
    gpio: 5,
};

/// Default tick interval of the reference board
pub const TICK_INTERVAL: u32 = 1_000;

/// Something the mock hardware observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Disable,
    Enable,
    Install(Line, ServiceRoutine),
    Remove(Line, ServiceRoutine),
    Callback {
        label: &'static str,
        interrupts_enabled: bool,
        control: u32,
        pending: [u32; 2],
    },
}

#[derive(Debug, Default)]
pub struct MockState {
    pub interrupts_enabled: bool,
    pub installed: [Option<ServiceRoutine>; LINE_COUNT as usize],
    pub control: u32,
    pub control_writes: Vec<u32>,
    pub applied: Vec<u32>,
    pub icp_windows: [Option<(u32, u32)>; 2],
    pub pending: [u32; 2],
    pub pending_writes: Vec<(Edge, u32)>,
    pub enabled: [u32; 2],
    pub count: u32,
    pub compares: Vec<u32>,
    pub events: Vec<Event>,
    /// Configuration writes made with interrupts enabled
    pub unmasked_writes: u32,
}

impl MockState {
    fn note_write(&mut self) {
        if self.interrupts_enabled {
            self.unmasked_writes += 1;
        }
    }
}

fn edge_index(edge: Edge) -> usize {
    match edge {
        Edge::Rising => 0,
        Edge::Falling => 1,
    }
}

/// Handle to the shared mock register file
#[derive(Debug, Clone)]
pub struct MockHandle(Arc<Mutex<MockState>>);

impl MockHandle {
    pub fn new() -> Self {
        let state = MockState {
            interrupts_enabled: true,
            ..MockState::default()
        };
        Self(Arc::new(Mutex::new(state)))
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.0.lock().unwrap()
    }

    /// Run `f` against the register file
    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn events(&self) -> Vec<Event> {
        self.lock().events.clone()
    }

    /// Labels of the callbacks that ran, in order
    pub fn callbacks(&self) -> Vec<&'static str> {
        self.lock()
            .events
            .iter()
            .filter_map(|event| match event {
                Event::Callback { label, .. } => Some(*label),
                _ => None,
            })
            .collect()
    }

    /// Install/remove calls, in order
    pub fn registry_calls(&self) -> Vec<Event> {
        self.lock()
            .events
            .iter()
            .filter(|event| matches!(event, Event::Install(..) | Event::Remove(..)))
            .cloned()
            .collect()
    }

    pub fn clear_events(&self) {
        self.lock().events.clear();
    }

    fn record_callback(&self, label: &'static str) {
        let mut state = self.lock();
        let event = Event::Callback {
            label,
            interrupts_enabled: state.interrupts_enabled,
            control: state.control,
            pending: state.pending,
        };
        state.events.push(event);
    }
}

impl InterruptControl for MockHandle {
    fn disable_interrupts(&mut self) {
        let mut state = self.lock();
        state.interrupts_enabled = false;
        state.events.push(Event::Disable);
    }

    fn enable_interrupts(&mut self) {
        let mut state = self.lock();
        state.interrupts_enabled = true;
        state.events.push(Event::Enable);
    }
}

impl LineRegistry for MockHandle {
    fn install(&mut self, line: Line, routine: ServiceRoutine) {
        let mut state = self.lock();
        assert!(!state.interrupts_enabled, "install outside a masked window");
        assert!(state.installed[line.index()].is_none(), "line {} already taken", line.number());
        state.installed[line.index()] = Some(routine);
        state.events.push(Event::Install(line, routine));
    }

    fn remove(&mut self, line: Line, routine: ServiceRoutine) {
        let mut state = self.lock();
        assert!(!state.interrupts_enabled, "remove outside a masked window");
        assert_eq!(state.installed[line.index()], Some(routine));
        state.installed[line.index()] = None;
        state.events.push(Event::Remove(line, routine));
    }
}

impl TimerRegisters for MockHandle {
    fn control(&self) -> u32 {
        self.lock().control
    }

    fn write_control(&mut self, value: u32) {
        let mut state = self.lock();
        state.control = value;
        state.control_writes.push(value);
        state.note_write();
    }

    fn apply(&mut self, mask: u32) {
        let mut state = self.lock();
        state.applied.push(mask);
        state.note_write();
    }

    fn write_icp_window(&mut self, channel: u8, start: u32, stop: u32) {
        let mut state = self.lock();
        state.icp_windows[channel as usize] = Some((start, stop));
        state.note_write();
    }
}

impl EdgeRegisters for MockHandle {
    fn pending(&self, edge: Edge) -> u32 {
        self.lock().pending[edge_index(edge)]
    }

    fn write_pending(&mut self, edge: Edge, value: u32) {
        let mut state = self.lock();
        state.pending[edge_index(edge)] &= value;
        state.pending_writes.push((edge, value));
    }

    fn enabled(&self, edge: Edge) -> u32 {
        self.lock().enabled[edge_index(edge)]
    }

    fn write_enabled(&mut self, edge: Edge, value: u32) {
        let mut state = self.lock();
        state.enabled[edge_index(edge)] = value;
        state.note_write();
    }
}

impl CycleCounter for MockHandle {
    fn count(&self) -> u32 {
        self.lock().count
    }

    fn set_compare(&mut self, value: u32) {
        let mut state = self.lock();
        state.compares.push(value);
        state.note_write();
    }
}

/// Callback that logs `label` (with a hardware snapshot) when it runs
pub fn recorder(hw: &MockHandle, label: &'static str) -> Callback {
    let hw = hw.clone();
    let f: &'static (dyn Fn() + Sync) = Box::leak(Box::new(move || hw.record_callback(label)));
    Callback::new(f)
}

/// Like [`recorder`], then applies `effect` to the register file
///
/// Lets a callback raise flags while it runs, the way a source firing
/// again mid-callback would.
pub fn recorder_then(
    hw: &MockHandle,
    label: &'static str,
    effect: fn(&mut MockState),
) -> Callback {
    let hw = hw.clone();
    let f: &'static (dyn Fn() + Sync) = Box::leak(Box::new(move || {
        hw.record_callback(label);
        hw.with(effect);
    }));
    Callback::new(f)
}

/// Timer layout of the reference board
///
/// Flags in bits 8-11, enables in 12-15, ICP polarity/enable-window bits
/// above that.
pub fn timer_layout() -> TimerLayout {
    TimerLayout {
        ocp: [
            OcpControl {
                flag: 1 << 8,
                enable: 1 << 12,
            },
            OcpControl {
                flag: 1 << 9,
                enable: 1 << 13,
            },
        ],
        icp: [
            IcpControl {
                flag: 1 << 10,
                enable: 1 << 14,
                control_and: !((1 << 16) | (1 << 20)),
                polarity: 1 << 16,
                control_or: 1 << 20,
                apply: 1 << 2,
            },
            IcpControl {
                flag: 1 << 11,
                enable: 1 << 15,
                control_and: !((1 << 17) | (1 << 21)),
                polarity: 1 << 17,
                control_or: 1 << 21,
                apply: 1 << 3,
            },
        ],
        apply_control: 1,
    }
}

fn bit(position: u8) -> GpioBit {
    GpioBit::new(position).unwrap()
}

/// Reference board
///
/// | pin | resources            |
/// |-----|----------------------|
/// | 0   | gpio 0               |
/// | 1   | gpio 1               |
/// | 2   | gpio 5               |
/// | 3   | gpio 31              |
/// | 4   | gpio 4 + OCP0        |
/// | 5   | OCP1                 |
/// | 6   | ICP0                 |
/// | 7   | gpio 7 + ICP1        |
/// | 8   | system tick          |
/// | 9   | nothing              |
pub fn reference_variant() -> BoardVariant {
    let pins = [
        PinDescriptor::gpio(bit(0)),
        PinDescriptor::gpio(bit(1)),
        PinDescriptor::gpio(bit(5)),
        PinDescriptor::gpio(bit(31)),
        PinDescriptor::gpio(bit(4)).with_output_compare(ChannelIndex::First),
        PinDescriptor::none().with_output_compare(ChannelIndex::Second),
        PinDescriptor::none().with_input_capture(ChannelIndex::First),
        PinDescriptor::gpio(bit(7)).with_input_capture(ChannelIndex::Second),
        PinDescriptor::tick_pin(),
        PinDescriptor::none(),
    ];
    BoardVariant::new(LINES, timer_layout(), TICK_INTERVAL)
        .with_pins(&pins)
        .unwrap()
}

pub type MockMux<'a> = InterruptMux<'a, MockHandle, MockHandle, MockHandle, MockHandle>;

/// Runtime over a fresh mock register file
pub fn mock_mux(variant: &BoardVariant) -> (MockMux<'_>, MockHandle) {
    let hw = MockHandle::new();
    let peripherals = Peripherals {
        registry: hw.clone(),
        timer: hw.clone(),
        gpio: hw.clone(),
        counter: hw.clone(),
    };
    let mux = InterruptMux::new(variant, peripherals).unwrap();
    (mux, hw)
}
