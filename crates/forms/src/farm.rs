//! Farm form: a root-only draft.

use verdant_core::error::CoreError;
use verdant_core::farm::{Farm, FarmPayload, FarmStatus, FARMS_RESOURCE};
use verdant_core::numeric::non_blank;
use verdant_core::types::AreaUnit;

use crate::form::EntityForm;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FarmDraft {
    pub name: String,
    pub owner_name: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area: Option<f64>,
    pub area_unit: AreaUnit,
    pub soil_type: String,
    pub notes: String,
    pub status: FarmStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FarmField {
    Name(String),
    OwnerName(String),
    Location(String),
    Latitude(Option<f64>),
    Longitude(Option<f64>),
    Area(Option<f64>),
    AreaUnit(AreaUnit),
    SoilType(String),
    Notes(String),
    Status(FarmStatus),
}

impl FarmDraft {
    pub fn update_root_field(&mut self, field: FarmField) {
        match field {
            FarmField::Name(v) => self.name = v,
            FarmField::OwnerName(v) => self.owner_name = v,
            FarmField::Location(v) => self.location = v,
            FarmField::Latitude(v) => self.latitude = v,
            FarmField::Longitude(v) => self.longitude = v,
            FarmField::Area(v) => self.area = v,
            FarmField::AreaUnit(v) => self.area_unit = v,
            FarmField::SoilType(v) => self.soil_type = v,
            FarmField::Notes(v) => self.notes = v,
            FarmField::Status(v) => self.status = v,
        }
    }
}

/// The farm create/edit form.
#[derive(Debug, Clone, Copy, Default)]
pub struct FarmForm;

impl EntityForm for FarmForm {
    type Draft = FarmDraft;
    type Remote = Farm;
    type Payload = FarmPayload;
    type Reference = ();

    const RESOURCE: &'static str = FARMS_RESOURCE;

    fn hydrate(farm: &Farm) -> FarmDraft {
        FarmDraft {
            name: farm.name.clone(),
            owner_name: farm.owner_name.clone().unwrap_or_default(),
            location: farm.location.clone().unwrap_or_default(),
            latitude: farm.latitude,
            longitude: farm.longitude,
            area: farm.area,
            area_unit: farm.area_unit.unwrap_or_default(),
            soil_type: farm.soil_type.clone().unwrap_or_default(),
            notes: farm.notes.clone().unwrap_or_default(),
            status: farm.status.unwrap_or_default(),
        }
    }

    fn to_payload(draft: &FarmDraft) -> Result<FarmPayload, CoreError> {
        let payload = FarmPayload {
            name: draft.name.trim().to_string(),
            owner_name: non_blank(&draft.owner_name),
            location: non_blank(&draft.location),
            latitude: draft.latitude,
            longitude: draft.longitude,
            area: draft.area.unwrap_or(0.0),
            area_unit: draft.area_unit,
            soil_type: non_blank(&draft.soil_type),
            notes: non_blank(&draft.notes),
            status: draft.status,
        };
        payload.validate()?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hydrate_then_payload_keeps_values() {
        let farm = Farm {
            id: 4,
            name: "Kericho North".into(),
            owner_name: Some("J. Kiprono".into()),
            area: Some(12.0),
            area_unit: Some(AreaUnit::Acre),
            ..Default::default()
        };
        let draft = FarmForm::hydrate(&farm);
        assert_eq!(draft.location, "");
        let payload = FarmForm::to_payload(&draft).unwrap();
        assert_eq!(payload.owner_name.as_deref(), Some("J. Kiprono"));
        assert_eq!(payload.area, 12.0);
        assert_eq!(payload.area_unit, AreaUnit::Acre);
        assert_eq!(payload.location, None);
    }

    #[test]
    fn out_of_range_latitude_fails_validation() {
        let mut draft = FarmDraft::default();
        draft.update_root_field(FarmField::Name("Kericho".into()));
        draft.update_root_field(FarmField::Latitude(Some(120.0)));
        assert!(FarmForm::to_payload(&draft).is_err());
    }
}
