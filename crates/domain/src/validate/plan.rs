//! VPS plan validation.

use serde_json::Value as Json;

use crate::doc::PlanDocument;

use super::{
    as_object, check_slug, optional_timestamp, require_str, require_u64, Errors, ValidationError,
};

#[tracing::instrument(skip_all)]
pub fn validate_plan_document(value: &Json) -> Result<PlanDocument, ValidationError> {
    let mut errors = Errors::default();
    let Some(obj) = as_object(value, "", &mut errors) else {
        return Err(ValidationError::single("", "expected an object"));
    };

    let id = require_str(obj, "", "id", &mut errors).unwrap_or_default();
    if !id.is_empty() {
        check_slug(&id, "id", &mut errors);
    }
    let name = require_str(obj, "", "name", &mut errors).unwrap_or_default();
    let price_monthly = require_u64(obj, "", "priceMonthly", &mut errors).unwrap_or_default();

    let mut spec_u32 = |field: &str| -> u32 {
        match require_u64(obj, "", field, &mut errors) {
            Some(n) if n >= 1 && n <= u32::MAX as u64 => n as u32,
            Some(_) => {
                errors.push(field, "must be at least 1");
                0
            }
            None => 0,
        }
    };
    let cpu_cores = spec_u32("cpuCores");
    let ram_mb = spec_u32("ramMb");
    let storage_gb = spec_u32("storageGb");

    let features = match obj.get("features") {
        None | Some(Json::Null) => Vec::new(),
        Some(Json::Array(items)) => {
            let mut features = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match item.as_str() {
                    Some(s) if !s.trim().is_empty() => features.push(s.to_owned()),
                    _ => errors.push(format!("features[{i}]"), "must be a non-empty string"),
                }
            }
            features
        }
        Some(_) => {
            errors.push("features", "must be an array of strings");
            Vec::new()
        }
    };

    let featured = match obj.get("featured") {
        None | Some(Json::Null) => false,
        Some(Json::Bool(b)) => *b,
        Some(_) => {
            errors.push("featured", "must be a boolean");
            false
        }
    };

    let created_at = optional_timestamp(obj, "", "createdAt", &mut errors);
    let updated_at = optional_timestamp(obj, "", "updatedAt", &mut errors);

    errors.into_result(PlanDocument {
        id,
        name,
        price_monthly,
        cpu_cores,
        ram_mb,
        storage_gb,
        features,
        featured,
        created_at,
        updated_at,
    })
}
