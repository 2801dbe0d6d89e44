//! Two-port algebra, parameter bundles, and the component library.

/// Prototype filters, attenuators, and matching sections.
pub mod builders;
/// Lumped component constructors and the closed component-kind set.
pub mod components;
/// S/Z/Y parameter bundles and derived figures of merit.
pub mod params;
/// Transmission lines, stubs, and the shunt-tee adapter.
pub mod transmission;
/// ABCD two-port value type and conversions.
pub mod twoport;

pub use components::ComponentKind;
pub use params::{SParameters, YParameters, ZParameters};
pub use transmission::TransmissionLine;
pub use twoport::TwoPort;
