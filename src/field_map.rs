//! Field Mapping
//!
//! Translates filter names into backend query fields. Each rule names the
//! backend parameter and a value template containing one `{}` placeholder
//! that receives the rendered filter value.
//!
//! [`FieldMapping::standard`] covers the catalog's granule search vocabulary.
//! Additional-attribute filters share the repeated `attribute[]` parameter
//! and encode `type,NAME,value` (or `type,NAME,min,max` for bounds) in the
//! template.

use std::collections::HashMap;

use crate::filters::FilterValue;

/// Placeholder replaced by the rendered filter value
pub const VALUE_PLACEHOLDER: &str = "{}";

/// Backend field and value template for one filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub backend_field: String,
    pub template: String,
}

impl FieldRule {
    pub fn new(backend_field: impl Into<String>, template: impl Into<String>) -> Self {
        FieldRule {
            backend_field: backend_field.into(),
            template: template.into(),
        }
    }

    /// Format one alternative of a filter value
    pub fn format(&self, value: &FilterValue) -> String {
        self.template.replacen(VALUE_PLACEHOLDER, &value.render(), 1)
    }
}

/// Filter name to backend field lookup
#[derive(Debug, Clone, Default)]
pub struct FieldMapping {
    rules: HashMap<String, FieldRule>,
}

impl FieldMapping {
    /// Empty mapping
    pub fn new() -> Self {
        FieldMapping::default()
    }

    /// Builder-style rule registration
    pub fn with(
        mut self,
        filter: impl Into<String>,
        backend_field: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.insert(filter, FieldRule::new(backend_field, template));
        self
    }

    pub fn insert(&mut self, filter: impl Into<String>, rule: FieldRule) {
        self.rules.insert(filter.into(), rule);
    }

    pub fn get(&self, filter: &str) -> Option<&FieldRule> {
        self.rules.get(filter)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Mapping for the granule search API
    pub fn standard() -> Self {
        const RULES: &[(&str, &str, &str)] = &[
            ("absoluteorbit", "orbit_number", "{}"),
            ("asfframe", "attribute[]", "int,FRAME_NUMBER,{}"),
            ("maxbaselineperp", "attribute[]", "float,INSAR_BASELINE,,{}"),
            ("minbaselineperp", "attribute[]", "float,INSAR_BASELINE,{},"),
            ("beammode", "attribute[]", "string,BEAM_MODE,{}"),
            ("beamswath", "attribute[]", "string,BEAM_MODE_TYPE,{}"),
            ("collectionname", "attribute[]", "string,MISSION_NAME,{}"),
            ("maxdoppler", "attribute[]", "float,DOPPLER,,{}"),
            ("mindoppler", "attribute[]", "float,DOPPLER,{},"),
            ("maxfaradayrotation", "attribute[]", "float,FARADAY_ROTATION,,{}"),
            ("minfaradayrotation", "attribute[]", "float,FARADAY_ROTATION,{},"),
            ("flightdirection", "attribute[]", "string,ASCENDING_DESCENDING,{}"),
            ("flightline", "attribute[]", "string,FLIGHT_LINE,{}"),
            ("frame", "attribute[]", "int,CENTER_ESA_FRAME,{}"),
            ("granule_list", "readable_granule_name[]", "{}"),
            ("product_list", "granule_ur[]", "{}"),
            ("maxinsarstacksize", "attribute[]", "int,INSAR_STACK_SIZE,,{}"),
            ("mininsarstacksize", "attribute[]", "int,INSAR_STACK_SIZE,{},"),
            ("lookdirection", "attribute[]", "string,LOOK_DIRECTION,{}"),
            ("offnadirangle", "attribute[]", "float,OFF_NADIR_ANGLE,{}"),
            ("platform", "platform[]", "{}"),
            ("polarization", "attribute[]", "string,POLARIZATION,{}"),
            ("polygon", "polygon", "{}"),
            ("linestring", "line", "{}"),
            ("point", "point", "{}"),
            ("bbox", "bounding_box", "{}"),
            ("processinglevel", "attribute[]", "string,PROCESSING_TYPE,{}"),
            ("relativeorbit", "attribute[]", "int,PATH_NUMBER,{}"),
            ("processingdate", "updated_since", "{}"),
            ("start", "temporal", "{},"),
            ("end", "temporal", ",{}"),
            ("season", "temporal", ",,{}"),
        ];

        RULES
            .iter()
            .fold(FieldMapping::new(), |mapping, (filter, field, template)| {
                mapping.with(*filter, *field, *template)
            })
    }
}
