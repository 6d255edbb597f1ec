// cs-core/src/units.rs

use uom::si::f64::{
    Capacitance as UomCapacitance, ElectricalResistance as UomElectricalResistance,
    Frequency as UomFrequency, Inductance as UomInductance,
};

// Public canonical unit types (SI, f64)
pub type Capacitance = UomCapacitance;
pub type Resistance = UomElectricalResistance;
pub type Frequency = UomFrequency;
pub type Inductance = UomInductance;

#[inline]
pub fn farad(v: f64) -> Capacitance {
    use uom::si::capacitance::farad;
    Capacitance::new::<farad>(v)
}

#[inline]
pub fn henry(v: f64) -> Inductance {
    use uom::si::inductance::henry;
    Inductance::new::<henry>(v)
}

#[inline]
pub fn hz(v: f64) -> Frequency {
    use uom::si::frequency::hertz;
    Frequency::new::<hertz>(v)
}

#[inline]
pub fn ohm(v: f64) -> Resistance {
    use uom::si::electrical_resistance::ohm;
    Resistance::new::<ohm>(v)
}

pub mod constants {
    /// Vacuum permeability (H/m).
    pub const MU_0: f64 = 4.0e-7 * core::f64::consts::PI;

    /// Default excitation frequency for reactive branches (Hz).
    pub const DEFAULT_FREQUENCY_HZ: f64 = 60.0;

    /// Default ambient temperature (°C).
    pub const DEFAULT_AMBIENT_C: f64 = 25.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        assert_eq!(farad(1e-6).value, 1e-6);
        assert_eq!(henry(0.5).value, 0.5);
        assert_eq!(hz(60.0).value, 60.0);
        assert_eq!(ohm(1000.0).value, 1000.0);
    }

    #[test]
    fn mu_0_value() {
        assert!((constants::MU_0 - 1.256_637_061_4e-6).abs() < 1e-15);
    }
}
