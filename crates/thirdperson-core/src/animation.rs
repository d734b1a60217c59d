//! Signals sent to the animation graph.
//!
//! The controller only ever talks about this fixed set of parameters. The sink
//! maps them onto whatever the animation backend uses, once, at startup.

use std::fmt;

/// Animation graph parameters driven by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationParam {
    /// Smoothed movement speed (float).
    Speed,
    /// Ground contact (bool).
    Grounded,
    /// Jump state (bool).
    Jump,
    /// Free-fall state (bool).
    FreeFall,
    /// Input magnitude (float).
    MotionSpeed,
    /// Double-jump flip (trigger).
    Flip,
}

impl AnimationParam {
    pub const ALL: [Self; 6] = [
        Self::Speed,
        Self::Grounded,
        Self::Jump,
        Self::FreeFall,
        Self::MotionSpeed,
        Self::Flip,
    ];

    /// Parameter name in the animation graph.
    pub fn name(self) -> &'static str {
        match self {
            Self::Speed => "Speed",
            Self::Grounded => "Grounded",
            Self::Jump => "Jump",
            Self::FreeFall => "FreeFall",
            Self::MotionSpeed => "MotionSpeed",
            Self::Flip => "Flip",
        }
    }
}

/// A single value sent to the animation graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationSignal {
    Speed(f32),
    Grounded(bool),
    Jump(bool),
    FreeFall(bool),
    MotionSpeed(f32),
    Flip,
}

impl AnimationSignal {
    pub fn param(self) -> AnimationParam {
        match self {
            Self::Speed(_) => AnimationParam::Speed,
            Self::Grounded(_) => AnimationParam::Grounded,
            Self::Jump(_) => AnimationParam::Jump,
            Self::FreeFall(_) => AnimationParam::FreeFall,
            Self::MotionSpeed(_) => AnimationParam::MotionSpeed,
            Self::Flip => AnimationParam::Flip,
        }
    }
}

/// Value of a parameter as last seen by [`AnimationSignals`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationValue {
    Float(f32),
    Bool(bool),
    /// Number of times the trigger fired.
    Trigger(u32),
}

impl fmt::Display for AnimationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(value) => write!(f, "{value:.2}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Trigger(count) => write!(f, "fired {count}x"),
        }
    }
}

/// Receives animation signals.
pub trait AnimationSink {
    fn send(&mut self, signal: AnimationSignal);
}

/// Latest value of every animation parameter.
///
/// Useful as a sink on its own: adapters can copy it into their animation
/// backend after the tick, and tests can inspect it directly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimationSignals {
    pub speed: f32,
    pub grounded: bool,
    pub jump: bool,
    pub free_fall: bool,
    pub motion_speed: f32,
    /// Number of flip triggers received.
    pub flips: u32,
    /// Number of times `jump` went from false to true.
    pub jumps: u32,
}

impl AnimationSignals {
    /// Latest value of `param`.
    pub fn value(&self, param: AnimationParam) -> AnimationValue {
        match param {
            AnimationParam::Speed => AnimationValue::Float(self.speed),
            AnimationParam::Grounded => AnimationValue::Bool(self.grounded),
            AnimationParam::Jump => AnimationValue::Bool(self.jump),
            AnimationParam::FreeFall => AnimationValue::Bool(self.free_fall),
            AnimationParam::MotionSpeed => AnimationValue::Float(self.motion_speed),
            AnimationParam::Flip => AnimationValue::Trigger(self.flips),
        }
    }
}

impl AnimationSink for AnimationSignals {
    fn send(&mut self, signal: AnimationSignal) {
        tracing::trace!(param = signal.param().name(), ?signal, "Animation signal");
        match signal {
            AnimationSignal::Speed(value) => self.speed = value,
            AnimationSignal::Grounded(value) => self.grounded = value,
            AnimationSignal::Jump(value) => {
                if value && !self.jump {
                    self.jumps += 1;
                }
                self.jump = value;
            }
            AnimationSignal::FreeFall(value) => self.free_fall = value,
            AnimationSignal::MotionSpeed(value) => self.motion_speed = value,
            AnimationSignal::Flip => self.flips += 1,
        }
    }
}

/// Optional animation sink. Every send is a no-op when absent.
pub struct Animator<'a>(Option<&'a mut dyn AnimationSink>);

impl<'a> Animator<'a> {
    /// Borrow whatever sink sits in `slot`.
    pub fn new(slot: &'a mut Option<&mut dyn AnimationSink>) -> Self {
        match slot {
            Some(sink) => {
                let sink: &'a mut dyn AnimationSink = &mut **sink;
                Self(Some(sink))
            }
            None => Self(None),
        }
    }

    pub fn with(sink: &'a mut dyn AnimationSink) -> Self {
        Self(Some(sink))
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn send(&mut self, signal: AnimationSignal) {
        if let Some(sink) = self.0.as_deref_mut() {
            sink.send(signal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = AnimationParam::ALL.iter().map(|p| p.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), AnimationParam::ALL.len());
    }

    #[test]
    fn test_signals_record_latest_values() {
        let mut signals = AnimationSignals::default();
        signals.send(AnimationSignal::Speed(2.5));
        signals.send(AnimationSignal::Jump(true));
        signals.send(AnimationSignal::Jump(true));
        signals.send(AnimationSignal::Jump(false));
        signals.send(AnimationSignal::Flip);

        assert!((signals.speed - 2.5).abs() < f32::EPSILON);
        assert!(!signals.jump);
        assert_eq!(signals.jumps, 1);
        assert_eq!(signals.flips, 1);
        assert_eq!(AnimationSignal::Flip.param(), AnimationParam::Flip);
    }

    #[test]
    fn test_value_by_param() {
        let mut signals = AnimationSignals::default();
        signals.send(AnimationSignal::MotionSpeed(0.5));
        signals.send(AnimationSignal::FreeFall(true));
        signals.send(AnimationSignal::Flip);
        signals.send(AnimationSignal::Flip);

        assert_eq!(
            signals.value(AnimationParam::MotionSpeed),
            AnimationValue::Float(0.5)
        );
        assert_eq!(
            signals.value(AnimationParam::FreeFall),
            AnimationValue::Bool(true)
        );
        assert_eq!(signals.value(AnimationParam::Flip), AnimationValue::Trigger(2));
        assert_eq!(signals.value(AnimationParam::Flip).to_string(), "fired 2x");
        assert_eq!(signals.value(AnimationParam::Speed).to_string(), "0.00");
        assert_eq!(
            AnimationSignal::Grounded(true).param(),
            AnimationParam::Grounded
        );
    }

    #[test]
    fn test_absent_sink_is_a_no_op() {
        let mut animator = Animator::none();
        animator.send(AnimationSignal::Grounded(true));

        let mut slot: Option<&mut dyn AnimationSink> = None;
        Animator::new(&mut slot).send(AnimationSignal::Flip);
    }

    #[test]
    fn test_slot_forwards_to_sink() {
        let mut signals = AnimationSignals::default();
        {
            let mut slot: Option<&mut dyn AnimationSink> = Some(&mut signals);
            Animator::new(&mut slot).send(AnimationSignal::Grounded(true));
        }
        assert!(signals.grounded);
    }
}
