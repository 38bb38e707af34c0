use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, TimeZone, Utc};

use crate::models::{FleetOverride, FormState, LaunchTemplateConfig, LaunchTemplateSpecification, SpotFleetDocument};

pub const FLEET_ROLE_NAME: &str = "aws-ec2-spot-fleet-tagging-role";
pub const ALLOCATION_STRATEGY: &str = "priceCapacityOptimized";
pub const ON_DEMAND_ALLOCATION_STRATEGY: &str = "lowestPrice";
pub const FLEET_TYPE: &str = "maintain";
pub const LAUNCH_TEMPLATE_VERSION: &str = "$Default";
/// How long a generated request stays valid.
pub const VALIDITY_YEARS: i32 = 6;

/// IAM role ARN the fleet assumes, scoped to `account_id`.
pub fn fleet_role_arn(account_id: &str) -> String {
    format!("arn:aws:iam::{}:role/{}", account_id, FLEET_ROLE_NAME)
}

/// Millisecond precision UTC timestamp, e.g. `2024-01-01T00:00:00.000Z`.
pub fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Calendar year increment. Feb 29 rolls over to Mar 1 when the target year
/// has no leap day.
pub fn add_years(at: DateTime<Utc>, years: i32) -> DateTime<Utc> {
    let target_year = at.year() + years;
    if let Some(shifted) = at.with_year(target_year) {
        return shifted;
    }
    match NaiveDate::from_ymd_opt(target_year, 3, 1) {
        Some(date) => Utc.from_utc_datetime(&date.and_time(at.time())),
        None => at,
    }
}

/// Every (instance type, subnet) pair, instance types in the outer loop.
pub fn build_overrides(instance_types: &[String], subnet_ids: &[String]) -> Vec<FleetOverride> {
    instance_types
        .iter()
        .flat_map(|instance_type| {
            subnet_ids.iter().map(move |subnet_id| FleetOverride {
                instance_type: instance_type.clone(),
                weighted_capacity: 1,
                subnet_id: subnet_id.clone(),
            })
        })
        .collect()
}

/// Build the Spot Fleet request for `form`, valid from `now`.
///
/// The form is expected to have passed validation already; nothing is checked here.
pub fn build(form: &FormState, now: DateTime<Utc>) -> SpotFleetDocument {
    let valid_until = add_years(now, VALIDITY_YEARS);
    SpotFleetDocument {
        iam_fleet_role: fleet_role_arn(&form.account_id),
        allocation_strategy: ALLOCATION_STRATEGY.to_string(),
        target_capacity: form.target_capacity,
        valid_from: iso_timestamp(&now),
        valid_until: iso_timestamp(&valid_until),
        terminate_instances_with_expiration: true,
        fleet_type: FLEET_TYPE.to_string(),
        on_demand_allocation_strategy: ON_DEMAND_ALLOCATION_STRATEGY.to_string(),
        launch_specifications: Vec::new(),
        launch_template_configs: vec![LaunchTemplateConfig {
            launch_template_specification: LaunchTemplateSpecification {
                launch_template_id: form.launch_template_id.clone(),
                version: LAUNCH_TEMPLATE_VERSION.to_string(),
            },
            overrides: build_overrides(&form.instance_types, &form.subnet_ids),
        }],
    }
}
