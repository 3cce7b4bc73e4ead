//! Measurement fields of a wheel specification
//!
//! The external (camelCase) and internal (snake_case) names of every
//! measurement, and its length ceiling, are declared once below. The macro
//! expands that list into the `Measurements` struct and the
//! `MEASUREMENT_FIELDS` descriptor table, so the two can never drift apart.

use serde::{Deserialize, Serialize};

/// Describes one measurement field: its names on both sides of the API,
/// its length ceiling, and typed access to its slot in `Measurements`.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    /// Name used in request and response bodies
    pub external: &'static str,
    /// Name used in the stored record
    pub internal: &'static str,
    /// Maximum length in characters
    pub max_length: usize,
    /// Reads the field from a measurement set
    pub get: fn(&Measurements) -> &str,
    /// Writes the field into a measurement set
    pub set: fn(&mut Measurements, String),
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("external", &self.external)
            .field("internal", &self.internal)
            .field("max_length", &self.max_length)
            .finish()
    }
}

macro_rules! measurement_fields {
    ($( $(#[$doc:meta])* $internal:ident => $external:literal, $max:literal; )*) => {
        /// The dimensional measurements recorded on a wheel specification form.
        ///
        /// Values are free-form text carrying units and tolerances,
        /// e.g. `"915 (900-1000)"`.
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct Measurements {
            $( $(#[$doc])* pub $internal: String, )*
        }

        /// Every measurement field, in form order.
        pub const MEASUREMENT_FIELDS: &[FieldSpec] = &[
            $(
                FieldSpec {
                    external: $external,
                    internal: stringify!($internal),
                    max_length: $max,
                    get: |m| m.$internal.as_str(),
                    set: |m, value| m.$internal = value,
                },
            )*
        ];
    };
}

measurement_fields! {
    /// e.g. `915 (900-1000)`
    tread_diameter_new => "treadDiameterNew", 50;
    /// e.g. `837 (800-900)`
    last_shop_issue_size => "lastShopIssueSize", 50;
    /// e.g. `825 (800-900)`
    condemning_dia => "condemningDia", 50;
    /// e.g. `1600 (+2,-1)`
    wheel_gauge => "wheelGauge", 50;
    variation_same_axle => "variationSameAxle", 20;
    variation_same_bogie => "variationSameBogie", 20;
    variation_same_coach => "variationSameCoach", 20;
    wheel_profile => "wheelProfile", 100;
    /// Intermediate wheel-wear profile
    intermediate_wwp => "intermediateWWP", 50;
    bearing_seat_diameter => "bearingSeatDiameter", 50;
    roller_bearing_outer_dia => "rollerBearingOuterDia", 50;
    roller_bearing_bore_dia => "rollerBearingBoreDia", 50;
    roller_bearing_width => "rollerBearingWidth", 50;
    axle_box_housing_bore_dia => "axleBoxHousingBoreDia", 50;
    wheel_disc_width => "wheelDiscWidth", 50;
}

/// Looks up a measurement by its external name.
pub fn by_external(name: &str) -> Option<&'static FieldSpec> {
    MEASUREMENT_FIELDS.iter().find(|spec| spec.external == name)
}

/// Looks up a measurement by its internal name.
pub fn by_internal(name: &str) -> Option<&'static FieldSpec> {
    MEASUREMENT_FIELDS.iter().find(|spec| spec.internal == name)
}
