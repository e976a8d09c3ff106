//! Visualization references
//!
//! Only table visualizations can feed a destination; charts and other kinds
//! are never offered for selection.

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::VisualizationId;

/// Visualization type tag of tabular visualizations
pub const TABLE_KIND: &str = "TABLE";

/// A visualization of a query, as listed on the query object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationRef {
    pub id: VisualizationId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl VisualizationRef {
    pub fn new(id: VisualizationId, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
        }
    }

    pub fn is_tabular(&self) -> bool {
        self.kind == TABLE_KIND
    }

    /// Returns `self` if it may back a destination
    pub fn ensure_tabular(&self) -> Result<&Self, DomainError> {
        if self.is_tabular() {
            Ok(self)
        } else {
            Err(DomainError::NotTabular(self.name.clone()))
        }
    }
}

/// Filters a query's visualizations down to the selectable ones, keeping order
pub fn selectable(visualizations: &[VisualizationRef]) -> Vec<&VisualizationRef> {
    visualizations.iter().filter(|v| v.is_tabular()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_tables_are_selectable() {
        let visualizations = vec![
            VisualizationRef::new(VisualizationId::new(1), "Table", "TABLE"),
            VisualizationRef::new(VisualizationId::new(2), "Trend", "CHART"),
            VisualizationRef::new(VisualizationId::new(3), "Raw rows", "TABLE"),
        ];

        let names: Vec<&str> = selectable(&visualizations)
            .iter()
            .map(|v| v.name.as_str())
            .collect();
        assert_eq!(names, vec!["Table", "Raw rows"]);
    }

    #[test]
    fn test_ensure_tabular() {
        let chart = VisualizationRef::new(VisualizationId::new(2), "Trend", "CHART");
        assert_eq!(
            chart.ensure_tabular(),
            Err(DomainError::NotTabular("Trend".to_string()))
        );
    }
}
