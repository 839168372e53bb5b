//! Easing curves mapping normalized time [0,1] onto [0,1].

/// Natural frequency of the spring snap, in units of the track duration.
const SNAP_OMEGA: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    /// Critically damped spring released at t = 0, normalized so it lands
    /// exactly on 1 at t = 1.
    SpringSnap,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::SpringSnap => critically_damped(t) / critically_damped(1.0),
        }
    }
}

fn critically_damped(t: f32) -> f32 {
    let wt = SNAP_OMEGA * t;
    1.0 - (1.0 + wt) * (-wt).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::SpringSnap,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
        }
    }

    #[test]
    fn curves_are_monotonic() {
        for easing in ALL {
            let mut prev = easing.apply(0.0);
            for step in 1..=200 {
                let value = easing.apply(step as f32 / 200.0);
                assert!(value + 1e-6 >= prev, "{easing:?} dips at step {step}");
                prev = value;
            }
        }
    }

    #[test]
    fn input_outside_unit_range_is_clamped() {
        assert_eq!(Easing::QuadOut.apply(-1.0), 0.0);
        assert_eq!(Easing::QuadOut.apply(2.0), 1.0);
    }

    #[test]
    fn spring_snap_front_loads_its_motion() {
        assert!(Easing::SpringSnap.apply(0.3) > 0.6);
        assert!(Easing::SpringSnap.apply(0.3) > Easing::QuadOut.apply(0.3));
    }
}
