/// Array storage.
///
/// Defines the arena that owns every array created by a script, the stable
/// handles stored inside values, and the ordered keys used to address array
/// slots. Includes reachability-based reclamation and display rendering.
pub mod array;

/// The dynamic value type.
///
/// Defines `Variant` together with its coercion, promotion, truthiness and
/// display rules.
pub mod core;
