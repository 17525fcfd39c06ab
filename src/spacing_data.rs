//! Measurement values attached to typeset nodes.

/// A size as a number together with its unit. The unit is generic so that
/// borrowed (`&'static str`) and owned (`String`) forms share one
/// definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement<T> {
    /// The numeric part of the measurement.
    pub number: f64,
    /// The unit the number is expressed in, e.g. `"em"` or `"pt"`.
    pub unit: T,
}

/// Measurement with an owned unit string, as stored in parse nodes.
pub type MeasurementOwned = Measurement<String>;
