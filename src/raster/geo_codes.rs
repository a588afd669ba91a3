//! GeoKey code tables loaded from the bundled definitions file
//!
//! Used to turn numeric GeoKey and EPSG codes into readable names
//! when logging what a raster's georeferencing says.

use std::collections::HashMap;
use lazy_static::lazy_static;

use crate::raster::errors::{PipelineError, PipelineResult};

lazy_static! {
    // Parse the TOML file at startup
    static ref GEO_CODE_TABLES: GeoCodeTables = {
        let content = include_str!("../../geo_codes.toml");
        GeoCodeTables::from_str(content).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse geo code tables: {}", e);
            GeoCodeTables::default()
        })
    };
}

/// Container for GeoKey and coordinate system code tables
#[derive(Debug, Default)]
pub struct GeoCodeTables {
    // Maps GeoKey IDs to key names
    pub key_names: HashMap<u16, String>,
    // Maps model type codes to names
    pub model_type_names: HashMap<u16, String>,
    // Maps raster type codes to names
    pub raster_type_names: HashMap<u16, String>,
    // Maps geographic CS codes to names
    pub geographic_cs_names: HashMap<u16, String>,
    // Maps projected CS codes to names
    pub projected_cs_names: HashMap<u16, String>,
    // Maps linear unit codes to names
    pub linear_unit_names: HashMap<u16, String>,
    // Maps angular unit codes to names
    pub angular_unit_names: HashMap<u16, String>,
}

impl GeoCodeTables {
    /// Parse code tables from a TOML string
    pub fn from_str(content: &str) -> PipelineResult<Self> {
        let toml_value: toml::Value = match content.parse() {
            Ok(value) => value,
            Err(e) => return Err(PipelineError::GenericError(format!("Failed to parse TOML: {}", e))),
        };

        let mut tables = GeoCodeTables::default();

        Self::parse_code_table(&toml_value, "key_ids", &mut tables.key_names);
        Self::parse_code_table(&toml_value, "model_type_codes", &mut tables.model_type_names);
        Self::parse_code_table(&toml_value, "raster_type_codes", &mut tables.raster_type_names);
        Self::parse_code_table(&toml_value, "geographic_cs_codes", &mut tables.geographic_cs_names);
        Self::parse_code_table(&toml_value, "projected_cs_codes", &mut tables.projected_cs_names);
        Self::parse_code_table(&toml_value, "linear_unit_codes", &mut tables.linear_unit_names);
        Self::parse_code_table(&toml_value, "angular_unit_codes", &mut tables.angular_unit_names);

        Ok(tables)
    }

    /// Helper to parse one code table from TOML
    fn parse_code_table(toml_value: &toml::Value, table_name: &str, target: &mut HashMap<u16, String>) {
        if let Some(table) = toml_value.get(table_name).and_then(|v| v.as_table()) {
            for (k, v) in table {
                if let (Ok(id), Some(name)) = (k.parse::<u16>(), v.as_str()) {
                    target.insert(id, name.to_string());
                }
            }
        }
    }

    /// Get a GeoKey name by ID
    pub fn get_key_name(&self, key_id: u16) -> String {
        self.key_names.get(&key_id)
            .cloned()
            .unwrap_or_else(|| format!("Unknown-{}", key_id))
    }

    /// Describe a coordinate system code, checking geographic then projected tables
    pub fn get_crs_description(&self, code: u16) -> String {
        self.geographic_cs_names.get(&code)
            .or_else(|| self.projected_cs_names.get(&code))
            .cloned()
            .unwrap_or_else(|| format!("EPSG:{}", code))
    }
}

/// Get a GeoKey name
pub fn get_key_name(key: u16) -> String {
    GEO_CODE_TABLES.get_key_name(key)
}

/// Get a coordinate system description for an EPSG code
pub fn get_crs_description(code: u16) -> String {
    GEO_CODE_TABLES.get_crs_description(code)
}
