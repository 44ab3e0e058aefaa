//! Delivery area management rules.
//!
//! Staff edit delivery areas through a plain HTML form, so every field
//! arrives as a string. [`DeliveryAreaInput::parse`] turns that into the
//! typed payload the API expects; [`AreaQuery`] filters the list view.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{BranchId, Price};

/// Why a delivery area form was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryAreaError {
    #[error("Please fill in all required fields")]
    MissingFields,
    #[error("{0} must be a number")]
    InvalidNumber(&'static str),
    #[error("{0} cannot be negative")]
    Negative(&'static str),
}

/// Raw delivery area form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAreaForm {
    #[serde(default)]
    pub branch_id: String,
    #[serde(default)]
    pub area_name: String,
    #[serde(default)]
    pub fee: String,
    #[serde(default)]
    pub estimated_time_min: String,
    #[serde(default)]
    pub estimated_time_max: String,
    /// Checkbox value; browsers omit unchecked boxes entirely.
    #[serde(default)]
    pub is_active: Option<String>,
}

/// A validated delivery area, ready to send to the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryAreaInput {
    pub branch_id: BranchId,
    pub area_name: String,
    pub fee: Price,
    pub estimated_time_min: u32,
    pub estimated_time_max: u32,
    pub is_active: bool,
}

impl DeliveryAreaInput {
    /// Validate a submitted form.
    ///
    /// # Errors
    ///
    /// [`DeliveryAreaError::MissingFields`] if any required field is blank,
    /// otherwise [`DeliveryAreaError::InvalidNumber`] naming the first field
    /// that is not a number, or [`DeliveryAreaError::Negative`] for a fee
    /// below zero.
    pub fn parse(form: &DeliveryAreaForm) -> Result<Self, DeliveryAreaError> {
        let branch_id = form.branch_id.trim();
        let area_name = form.area_name.trim();
        let fee = form.fee.trim();
        let min = form.estimated_time_min.trim();
        let max = form.estimated_time_max.trim();

        if [branch_id, area_name, fee, min, max]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(DeliveryAreaError::MissingFields);
        }

        let branch_id = BranchId::from_str(branch_id)
            .map_err(|_| DeliveryAreaError::InvalidNumber("Branch"))?;
        let fee = Decimal::from_str(fee)
            .map(Price::new)
            .map_err(|_| DeliveryAreaError::InvalidNumber("Fee"))?;
        if fee.amount() < Decimal::ZERO {
            return Err(DeliveryAreaError::Negative("Fee"));
        }
        let estimated_time_min = min
            .parse()
            .map_err(|_| DeliveryAreaError::InvalidNumber("Minimum time"))?;
        let estimated_time_max = max
            .parse()
            .map_err(|_| DeliveryAreaError::InvalidNumber("Maximum time"))?;

        Ok(Self {
            branch_id,
            area_name: area_name.to_owned(),
            fee,
            estimated_time_min,
            estimated_time_max,
            is_active: form.is_active.is_some(),
        })
    }
}

/// Status filter on the delivery area list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl AreaFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::Active, Self::Inactive];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    const fn accepts(self, is_active: bool) -> bool {
        match self {
            Self::All => true,
            Self::Active => is_active,
            Self::Inactive => !is_active,
        }
    }
}

/// Search term and status filter for the delivery area list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AreaQuery {
    #[serde(default)]
    pub filter: AreaFilter,
    #[serde(default)]
    pub search: String,
}

impl AreaQuery {
    /// Whether an area with this name and status should be listed.
    #[must_use]
    pub fn matches(&self, area_name: &str, is_active: bool) -> bool {
        if !self.filter.accepts(is_active) {
            return false;
        }

        let term = self.search.trim();
        term.is_empty() || area_name.to_lowercase().contains(&term.to_lowercase())
    }

    /// Whether the user narrowed the list in any way.
    #[must_use]
    pub fn is_narrowed(&self) -> bool {
        self.filter != AreaFilter::All || !self.search.trim().is_empty()
    }
}

/// Delivery window label, e.g. `"20-35 min"`.
#[must_use]
pub fn estimated_time_label(min: u32, max: u32) -> String {
    format!("{min}-{max} min")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> DeliveryAreaForm {
        DeliveryAreaForm {
            branch_id: "3".to_string(),
            area_name: "  Nasr City ".to_string(),
            fee: "22.50".to_string(),
            estimated_time_min: "20".to_string(),
            estimated_time_max: "35".to_string(),
            is_active: Some("on".to_string()),
        }
    }

    #[test]
    fn test_parse_valid_form() {
        let input = DeliveryAreaInput::parse(&form()).unwrap();
        assert_eq!(input.branch_id, BranchId::new(3));
        assert_eq!(input.area_name, "Nasr City");
        assert_eq!(input.fee, Price::from_piastres(2250));
        assert_eq!(input.estimated_time_min, 20);
        assert_eq!(input.estimated_time_max, 35);
        assert!(input.is_active);
    }

    #[test]
    fn test_unchecked_box_is_inactive() {
        let mut f = form();
        f.is_active = None;
        assert!(!DeliveryAreaInput::parse(&f).unwrap().is_active);
    }

    #[test]
    fn test_blank_fields_are_missing() {
        let clears: [fn(&mut DeliveryAreaForm); 5] = [
            |f: &mut DeliveryAreaForm| f.branch_id.clear(),
            |f: &mut DeliveryAreaForm| f.area_name = "   ".to_string(),
            |f: &mut DeliveryAreaForm| f.fee.clear(),
            |f: &mut DeliveryAreaForm| f.estimated_time_min.clear(),
            |f: &mut DeliveryAreaForm| f.estimated_time_max.clear(),
        ];
        for clear in clears {
            let mut f = form();
            clear(&mut f);
            assert_eq!(
                DeliveryAreaInput::parse(&f),
                Err(DeliveryAreaError::MissingFields)
            );
        }
    }

    #[test]
    fn test_invalid_numbers_name_the_field() {
        let mut f = form();
        f.fee = "cheap".to_string();
        assert_eq!(
            DeliveryAreaInput::parse(&f),
            Err(DeliveryAreaError::InvalidNumber("Fee"))
        );

        let mut f = form();
        f.estimated_time_max = "-5".to_string();
        assert_eq!(
            DeliveryAreaInput::parse(&f),
            Err(DeliveryAreaError::InvalidNumber("Maximum time"))
        );
    }

    #[test]
    fn test_negative_fee_is_rejected() {
        let mut f = form();
        f.fee = "-15".to_string();
        assert_eq!(
            DeliveryAreaInput::parse(&f),
            Err(DeliveryAreaError::Negative("Fee"))
        );

        f.fee = "0".to_string();
        assert!(DeliveryAreaInput::parse(&f).unwrap().fee.is_zero());
    }

    #[test]
    fn test_query_filters_by_status() {
        let active = AreaQuery {
            filter: AreaFilter::Active,
            search: String::new(),
        };
        assert!(active.matches("Maadi", true));
        assert!(!active.matches("Maadi", false));

        let inactive = AreaQuery {
            filter: AreaFilter::Inactive,
            search: String::new(),
        };
        assert!(inactive.matches("Maadi", false));
        assert!(!inactive.matches("Maadi", true));
    }

    #[test]
    fn test_query_search_is_case_insensitive() {
        let query = AreaQuery {
            filter: AreaFilter::All,
            search: "NASR".to_string(),
        };
        assert!(query.matches("Nasr City", false));
        assert!(!query.matches("Heliopolis", true));
        assert!(query.is_narrowed());
        assert!(!AreaQuery::default().is_narrowed());
    }

    #[test]
    fn test_filter_from_query_string() {
        let filter: AreaFilter = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(filter, AreaFilter::Inactive);
        assert_eq!(filter.as_str(), "inactive");
    }

    #[test]
    fn test_estimated_time_label() {
        assert_eq!(estimated_time_label(20, 35), "20-35 min");
    }
}
