use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;
use crate::models::FormState;

static ACCOUNT_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{12}$").unwrap());
static LAUNCH_TEMPLATE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^lt-[a-z0-9]{17}$").unwrap());
static SUBNET_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^subnet-[a-z0-9]{17}$").unwrap());

pub fn is_valid_account_id(value: &str) -> bool {
    ACCOUNT_ID_RE.is_match(value)
}

pub fn is_valid_launch_template_id(value: &str) -> bool {
    LAUNCH_TEMPLATE_ID_RE.is_match(value)
}

pub fn is_valid_subnet_id(value: &str) -> bool {
    SUBNET_ID_RE.is_match(value)
}

/// Validate a complete form. Rules are checked in a fixed order and the first
/// failing rule decides the error.
pub fn validate(form: &FormState) -> Result<(), ValidationError> {
    let subnets_blank = form.subnet_ids.first().map_or(true, |s| s.is_empty());
    if form.account_id.is_empty()
        || form.launch_template_id.is_empty()
        || form.target_capacity == 0
        || form.instance_types.is_empty()
        || subnets_blank
    {
        return Err(ValidationError::MissingRequiredField);
    }
    if !is_valid_account_id(&form.account_id) {
        return Err(ValidationError::InvalidAccountId);
    }
    if !is_valid_launch_template_id(&form.launch_template_id) {
        return Err(ValidationError::InvalidLaunchTemplateId);
    }
    let filled = form.filled_subnet_ids();
    if filled.is_empty() {
        return Err(ValidationError::NoSubnets);
    }
    for (i, subnet) in filled.iter().enumerate() {
        if !is_valid_subnet_id(subnet) {
            return Err(ValidationError::InvalidSubnetId);
        }
        if filled[..i].contains(subnet) {
            return Err(ValidationError::DuplicateSubnet);
        }
    }
    Ok(())
}

/// Add-time check for a single subnet ID against the entries already present.
pub fn check_new_subnet(existing: &[String], candidate: &str) -> Result<(), ValidationError> {
    if candidate.is_empty() {
        return Err(ValidationError::MissingRequiredField);
    }
    if existing.iter().any(|s| s == candidate) {
        return Err(ValidationError::DuplicateSubnet);
    }
    if !is_valid_subnet_id(candidate) {
        return Err(ValidationError::InvalidSubnetId);
    }
    Ok(())
}
