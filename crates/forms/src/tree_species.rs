//! Tree-species catalogue form: a root-only draft.

use verdant_core::error::CoreError;
use verdant_core::numeric::non_blank;
use verdant_core::tree_species::{
    GrowthRate, TreeSpecies, TreeSpeciesPayload, TREE_SPECIES_RESOURCE,
};

use crate::form::EntityForm;

#[derive(Debug, Clone, PartialEq)]
pub struct TreeSpeciesDraft {
    pub common_name: String,
    pub scientific_name: String,
    pub family: String,
    pub description: String,
    pub co2_absorption_kg_per_year: Option<f64>,
    pub average_height_m: Option<f64>,
    pub growth_rate: GrowthRate,
    pub lifespan_years: Option<i64>,
    pub price_per_tree: Option<f64>,
    pub is_active: bool,
}

impl Default for TreeSpeciesDraft {
    fn default() -> Self {
        Self {
            common_name: String::new(),
            scientific_name: String::new(),
            family: String::new(),
            description: String::new(),
            co2_absorption_kg_per_year: None,
            average_height_m: None,
            growth_rate: GrowthRate::default(),
            lifespan_years: None,
            price_per_tree: None,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TreeSpeciesField {
    CommonName(String),
    ScientificName(String),
    Family(String),
    Description(String),
    Co2AbsorptionKgPerYear(Option<f64>),
    AverageHeightM(Option<f64>),
    GrowthRate(GrowthRate),
    LifespanYears(Option<i64>),
    PricePerTree(Option<f64>),
    IsActive(bool),
}

impl TreeSpeciesDraft {
    pub fn update_root_field(&mut self, field: TreeSpeciesField) {
        match field {
            TreeSpeciesField::CommonName(v) => self.common_name = v,
            TreeSpeciesField::ScientificName(v) => self.scientific_name = v,
            TreeSpeciesField::Family(v) => self.family = v,
            TreeSpeciesField::Description(v) => self.description = v,
            TreeSpeciesField::Co2AbsorptionKgPerYear(v) => self.co2_absorption_kg_per_year = v,
            TreeSpeciesField::AverageHeightM(v) => self.average_height_m = v,
            TreeSpeciesField::GrowthRate(v) => self.growth_rate = v,
            TreeSpeciesField::LifespanYears(v) => self.lifespan_years = v,
            TreeSpeciesField::PricePerTree(v) => self.price_per_tree = v,
            TreeSpeciesField::IsActive(v) => self.is_active = v,
        }
    }
}

/// The tree-species create/edit form.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSpeciesForm;

impl EntityForm for TreeSpeciesForm {
    type Draft = TreeSpeciesDraft;
    type Remote = TreeSpecies;
    type Payload = TreeSpeciesPayload;
    type Reference = ();

    const RESOURCE: &'static str = TREE_SPECIES_RESOURCE;

    fn hydrate(species: &TreeSpecies) -> TreeSpeciesDraft {
        TreeSpeciesDraft {
            common_name: species.common_name.clone(),
            scientific_name: species.scientific_name.clone().unwrap_or_default(),
            family: species.family.clone().unwrap_or_default(),
            description: species.description.clone().unwrap_or_default(),
            co2_absorption_kg_per_year: species.co2_absorption_kg_per_year,
            average_height_m: species.average_height_m,
            growth_rate: species.growth_rate.unwrap_or_default(),
            lifespan_years: species.lifespan_years,
            price_per_tree: species.price_per_tree,
            is_active: species.is_active.unwrap_or(true),
        }
    }

    fn to_payload(draft: &TreeSpeciesDraft) -> Result<TreeSpeciesPayload, CoreError> {
        let payload = TreeSpeciesPayload {
            common_name: draft.common_name.trim().to_string(),
            scientific_name: non_blank(&draft.scientific_name),
            family: non_blank(&draft.family),
            description: non_blank(&draft.description),
            co2_absorption_kg_per_year: draft.co2_absorption_kg_per_year.unwrap_or(0.0),
            average_height_m: draft.average_height_m,
            growth_rate: draft.growth_rate,
            lifespan_years: draft.lifespan_years,
            price_per_tree: draft.price_per_tree,
            is_active: draft.is_active,
        };
        payload.validate()?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_species_is_active_by_default() {
        assert!(TreeSpeciesDraft::default().is_active);
    }

    #[test]
    fn payload_defaults_co2_and_omits_optionals() {
        let mut draft = TreeSpeciesDraft::default();
        draft.update_root_field(TreeSpeciesField::CommonName(" Acacia ".into()));
        let payload = TreeSpeciesForm::to_payload(&draft).unwrap();
        assert_eq!(payload.common_name, "Acacia");
        assert_eq!(payload.co2_absorption_kg_per_year, 0.0);
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("pricePerTree").is_none());
        assert_eq!(value["co2AbsorptionKgPerYear"], 0.0);
    }

    #[test]
    fn negative_lifespan_rejected() {
        let mut draft = TreeSpeciesDraft::default();
        draft.update_root_field(TreeSpeciesField::CommonName("Acacia".into()));
        draft.update_root_field(TreeSpeciesField::LifespanYears(Some(-3)));
        assert!(TreeSpeciesForm::to_payload(&draft).is_err());
    }
}
