use geo::{Intersects, Rect, coord};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::model::SourceRoad;

/// Which source roads to keep while loading
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceFilter {
    /// `[west, south, east, north]` in the coordinates of the input
    pub bbox: Option<[f64; 4]>,
    /// Road classes dropped on load
    pub exclude_classes: Vec<String>,
}

impl SourceFilter {
    pub fn validate(&self) -> Result<(), Error> {
        if let Some([west, south, east, north]) = self.bbox
            && (west > east || south > north)
        {
            return Err(Error::InvalidConfig(format!(
                "bbox must be [west, south, east, north], got [{west}, {south}, {east}, {north}]"
            )));
        }
        Ok(())
    }

    pub(super) fn keeps(&self, road: &SourceRoad) -> bool {
        if let Some(class) = &road.class
            && self.exclude_classes.iter().any(|excluded| excluded == class)
        {
            return false;
        }
        match self.bbox {
            Some([west, south, east, north]) => {
                let extent = Rect::new(coord! { x: west, y: south }, coord! { x: east, y: north });
                road.geometry.intersects(&extent)
            }
            None => true,
        }
    }
}

/// Property (or CSV column) names of the target network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetFields {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    /// Pre-existing speed text; not read when unset
    pub fallback_speed: Option<String>,
    /// WKT geometry column, CSV input only
    pub geometry: String,
}

impl Default for TargetFields {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            from_node: "from_node".to_string(),
            to_node: "to_node".to_string(),
            fallback_speed: None,
            geometry: "geometry".to_string(),
        }
    }
}

impl TargetFields {
    /// Whether `name` is consumed into a dedicated field rather than passed through
    pub(super) fn is_reserved(&self, name: &str) -> bool {
        name == self.id
            || name == self.from_node
            || name == self.to_node
            || name == self.geometry
            || self.fallback_speed.as_deref() == Some(name)
    }
}
