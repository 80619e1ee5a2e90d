//! Interrupt multiplexer runtime
//!
//! Owns the callback table, the tick state and the peripherals, and runs
//! the attach/detach protocol: the first user of a shared line installs
//! its demultiplexer, the last one to leave removes it.
//!
//! Every slot/enable-bit pair is updated inside a single
//! [`InterruptGuard`]. On attach the slot is written before the enable
//! bit; on detach the enable bit is cleared before the slot. A
//! demultiplexer therefore never sees an enabled source without a
//! callback except as a spurious flag, which it clears.

use fanout_hal::{
    CycleCounter, Edge, EdgeRegisters, IrqReturn, LineRegistry, ServiceRoutine, TimerRegisters,
};

use crate::callback::{Callback, CallbackTable};
use crate::config::{BoardVariant, ConfigError, LineAssignment};
use crate::demux::{service_edges, service_timer, TickState};
use crate::guard::InterruptGuard;
use crate::pins::{resolve, PinDescriptor, PinError};
use crate::source::{GpioBit, LogicalSource, Mode};

/// Hardware collaborators owned by the runtime
#[derive(Debug)]
pub struct Peripherals<R, T, G, C> {
    /// Physical line registry and global interrupt flag
    pub registry: R,
    /// Auxiliary timer register block
    pub timer: T,
    /// GPIO edge register block
    pub gpio: G,
    /// Core counter/compare
    pub counter: C,
}

/// Which demultiplexers are currently installed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Installed {
    tick: bool,
    timer: bool,
    edge: bool,
}

impl Installed {
    fn get(&self, routine: ServiceRoutine) -> bool {
        match routine {
            ServiceRoutine::SystemTick => self.tick,
            ServiceRoutine::AuxTimer => self.timer,
            ServiceRoutine::GpioEdge => self.edge,
        }
    }
}

/// Interrupt multiplexing runtime
///
/// Constructed once at startup. Application code attaches and detaches
/// callbacks by pin id; the line registry calls [`service`](Self::service)
/// with the routine it has installed when a line fires.
pub struct InterruptMux<'a, R, T, G, C> {
    variant: &'a BoardVariant,
    lines: LineAssignment,
    hw: Peripherals<R, T, G, C>,
    callbacks: CallbackTable,
    tick: TickState,
    installed: Installed,
}

impl<'a, R, T, G, C> InterruptMux<'a, R, T, G, C>
where
    R: LineRegistry,
    T: TimerRegisters,
    G: EdgeRegisters,
    C: CycleCounter,
{
    /// Create the runtime for a board variant
    ///
    /// Fails if the variant does not validate. No line is installed
    /// until the first attach.
    pub fn new(
        variant: &'a BoardVariant,
        peripherals: Peripherals<R, T, G, C>,
    ) -> Result<Self, ConfigError> {
        let lines = variant.validate()?;
        info!(
            "interrupt mux: {} pins, tick interval {}",
            variant.pin_count(),
            variant.tick_interval
        );

        Ok(Self {
            variant,
            lines,
            hw: peripherals,
            callbacks: CallbackTable::new(),
            tick: TickState::new(variant.tick_interval),
            installed: Installed::default(),
        })
    }

    /// Attach `callback` to every interrupt source behind `pin`
    ///
    /// - Tick-designated pin: a non-zero [`Mode::Interval`] replaces the
    ///   tick interval; the tick is armed one interval from now if it was
    ///   not running.
    /// - Timer channels: each channel's slot and enable bit are set.
    /// - GPIO bit: the edge selected by `mode` is enabled. Interval modes
    ///   enable no edge.
    ///
    /// Re-attaching replaces the previous callback. An unknown pin
    /// returns [`PinError::OutOfRange`] without touching any state.
    pub fn attach_interrupt(
        &mut self,
        pin: u32,
        callback: Callback,
        mode: Mode,
    ) -> Result<(), PinError> {
        let desc = *resolve(&self.variant.pins, pin)?;

        if desc.system_tick {
            self.attach_tick(callback, mode);
        }
        if desc.is_timer_capable() {
            self.attach_timer(&desc, callback);
        }
        if let (Some(bit), Some(edge)) = (desc.gpio_bit, mode.edge()) {
            self.attach_edge(bit, edge, callback);
        }

        Ok(())
    }

    /// Remove whatever is attached behind `pin`
    ///
    /// Both edges of a GPIO bit are disabled regardless of which one was
    /// attached. A demultiplexer is removed once nothing on its line is
    /// enabled. Detaching an unattached pin changes nothing.
    pub fn detach_interrupt(&mut self, pin: u32) -> Result<(), PinError> {
        let desc = *resolve(&self.variant.pins, pin)?;

        if desc.system_tick {
            self.detach_tick();
        }
        if desc.is_timer_capable() {
            self.detach_timer(&desc);
        }
        if let Some(bit) = desc.gpio_bit {
            self.detach_edge(bit);
        }

        Ok(())
    }

    /// Program the edge-detection window of the pin's input-capture channel
    ///
    /// The polarity bit is set when `start <= stop`. Pins without an
    /// input-capture channel are left untouched.
    pub fn icp_filter(&mut self, pin: u32, start: u32, stop: u32) -> Result<(), PinError> {
        let desc = *resolve(&self.variant.pins, pin)?;
        let Some(index) = desc.input_capture else {
            return Ok(());
        };

        let control = *self.variant.timer.icp(index);
        // Flag clears in the timer ISR also read-modify-write the control register
        let timer = &mut self.hw.timer;
        let _guard = InterruptGuard::new(&mut self.hw.registry);

        timer.modify_control(|c| c & control.control_and);
        timer.write_icp_window(index.as_u8(), start, stop);
        timer.modify_control(|c| c & control.control_and);
        if start <= stop {
            timer.modify_control(|c| c | control.polarity);
        }
        timer.modify_control(|c| c | control.control_or);
        timer.apply(control.apply);

        debug!("icp{} window {}..{}", index.as_u8(), start, stop);
        Ok(())
    }

    /// Run the demultiplexer for `routine`
    pub fn service(&mut self, routine: ServiceRoutine) -> IrqReturn {
        match routine {
            ServiceRoutine::SystemTick => self.service_tick(),
            ServiceRoutine::AuxTimer => self.service_timer(),
            ServiceRoutine::GpioEdge => self.service_edges(),
        }
    }

    /// System tick service routine
    pub fn service_tick(&mut self) -> IrqReturn {
        self.tick.service(&mut self.hw.counter, &self.callbacks)
    }

    /// Auxiliary timer service routine
    pub fn service_timer(&mut self) -> IrqReturn {
        service_timer(&mut self.hw.timer, &self.variant.timer, &self.callbacks)
    }

    /// GPIO edge service routine
    pub fn service_edges(&mut self) -> IrqReturn {
        service_edges(&mut self.hw.gpio, &self.callbacks)
    }

    /// Check whether `routine` is installed on its line
    pub fn is_installed(&self, routine: ServiceRoutine) -> bool {
        self.installed.get(routine)
    }

    /// Callback table
    pub fn callbacks(&self) -> &CallbackTable {
        &self.callbacks
    }

    /// Current tick interval
    pub fn tick_interval(&self) -> u32 {
        self.tick.interval()
    }

    /// Replace the tick interval
    ///
    /// Same effect as attaching the tick pin with a non-zero interval.
    /// Not synchronized with a tick in progress.
    pub fn set_tick_interval(&self, interval: u32) {
        if interval != 0 {
            self.tick.set_interval(interval);
        }
    }

    /// Compare value of the next tick
    pub fn next_tick(&self) -> u32 {
        self.tick.next()
    }

    /// Board variant in use
    pub fn variant(&self) -> &'a BoardVariant {
        self.variant
    }

    /// Line wiring in use
    pub fn lines(&self) -> LineAssignment {
        self.lines
    }

    /// Hardware collaborators
    pub fn peripherals(&self) -> &Peripherals<R, T, G, C> {
        &self.hw
    }

    /// Hardware collaborators, mutably
    pub fn peripherals_mut(&mut self) -> &mut Peripherals<R, T, G, C> {
        &mut self.hw
    }

    fn attach_tick(&mut self, callback: Callback, mode: Mode) {
        if let Some(interval) = mode.interval() {
            self.tick.set_interval(interval);
        }

        let mut guard = InterruptGuard::new(&mut self.hw.registry);
        self.callbacks.set(LogicalSource::SystemTick, callback);

        if !self.installed.tick {
            guard.install(self.lines.system_tick, ServiceRoutine::SystemTick);
            self.installed.tick = true;
            self.tick.arm(&mut self.hw.counter);
            debug!(
                "tick installed on line {}, first compare {}",
                self.lines.system_tick,
                self.tick.next()
            );
        }
    }

    fn detach_tick(&mut self) {
        let mut guard = InterruptGuard::new(&mut self.hw.registry);

        if self.installed.tick {
            guard.remove(self.lines.system_tick, ServiceRoutine::SystemTick);
            self.installed.tick = false;
            debug!("tick removed from line {}", self.lines.system_tick);
        }
        self.callbacks.clear(LogicalSource::SystemTick);
    }

    fn attach_timer(&mut self, desc: &PinDescriptor, callback: Callback) {
        let variant = self.variant;
        let layout = &variant.timer;
        let mut guard = InterruptGuard::new(&mut self.hw.registry);

        if !self.installed.timer {
            guard.install(self.lines.aux_timer, ServiceRoutine::AuxTimer);
            self.installed.timer = true;
            debug!("timer demux installed on line {}", self.lines.aux_timer);
        }

        for channel in desc.timer_channels() {
            self.callbacks.set(LogicalSource::Timer(channel), callback);
            let enable = layout.enable(channel);
            self.hw.timer.modify_control(|c| c | enable);
            self.hw.timer.apply(layout.apply_control);
        }
    }

    fn detach_timer(&mut self, desc: &PinDescriptor) {
        let variant = self.variant;
        let layout = &variant.timer;
        let mut guard = InterruptGuard::new(&mut self.hw.registry);

        for channel in desc.timer_channels() {
            let enable = layout.enable(channel);
            self.hw.timer.modify_control(|c| c & !enable);
            self.hw.timer.apply(layout.apply_control);
            self.callbacks.clear(LogicalSource::Timer(channel));
        }

        if self.installed.timer && self.hw.timer.control() & layout.enable_mask() == 0 {
            guard.remove(self.lines.aux_timer, ServiceRoutine::AuxTimer);
            self.installed.timer = false;
            debug!("timer demux removed from line {}", self.lines.aux_timer);
        }
    }

    fn attach_edge(&mut self, bit: GpioBit, edge: Edge, callback: Callback) {
        let mut guard = InterruptGuard::new(&mut self.hw.registry);

        if !self.installed.edge {
            guard.install(self.lines.gpio, ServiceRoutine::GpioEdge);
            self.installed.edge = true;
            debug!("gpio demux installed on line {}", self.lines.gpio);
        }

        self.callbacks.set(LogicalSource::DigitalEdge { bit, edge }, callback);
        let enabled = self.hw.gpio.enabled(edge);
        self.hw.gpio.write_enabled(edge, enabled | bit.mask());
    }

    fn detach_edge(&mut self, bit: GpioBit) {
        let mut guard = InterruptGuard::new(&mut self.hw.registry);

        for edge in Edge::ALL {
            let enabled = self.hw.gpio.enabled(edge);
            self.hw.gpio.write_enabled(edge, enabled & !bit.mask());
            self.callbacks.clear(LogicalSource::DigitalEdge { bit, edge });
        }

        if self.installed.edge && !self.hw.gpio.any_enabled() {
            guard.remove(self.lines.gpio, ServiceRoutine::GpioEdge);
            self.installed.edge = false;
            debug!("gpio demux removed from line {}", self.lines.gpio);
        }
    }
}
