use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::services::input_validator::check_new_subnet;

/// The generator form: the single source of truth that the JSON document and the
/// shareable URL are projected from.
///
/// `target_capacity` of `0` means the field has not been filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub account_id: String,
    pub launch_template_id: String,
    pub target_capacity: u32,
    pub instance_types: Vec<String>,
    pub subnet_ids: Vec<String>,
}

impl FormState {
    /// Add a subnet ID typed by the user.
    ///
    /// A rejected addition leaves the existing entries untouched. On success, blank
    /// placeholder entries are dropped.
    pub fn add_subnet(&mut self, raw: &str) -> Result<(), ValidationError> {
        let candidate = raw.trim();
        check_new_subnet(&self.subnet_ids, candidate)?;
        self.subnet_ids.retain(|s| !s.is_empty());
        self.subnet_ids.push(candidate.to_string());
        Ok(())
    }

    /// Remove the subnet at `index`; out of range indexes are ignored.
    pub fn remove_subnet(&mut self, index: usize) -> Option<String> {
        if index < self.subnet_ids.len() {
            Some(self.subnet_ids.remove(index))
        } else {
            None
        }
    }

    /// Select `name` if it is not selected yet, otherwise deselect it.
    pub fn toggle_instance_type(&mut self, name: &str) {
        if let Some(pos) = self.instance_types.iter().position(|t| t == name) {
            self.instance_types.remove(pos);
        } else {
            self.instance_types.push(name.to_string());
        }
    }

    /// Replace the selected instance types, keeping first-seen order.
    pub fn set_instance_types<I, S>(&mut self, types: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for t in types {
            let t = t.into();
            if !t.is_empty() && !out.contains(&t) {
                out.push(t);
            }
        }
        self.instance_types = out;
    }

    /// Subnet IDs without blank placeholder entries.
    pub fn filled_subnet_ids(&self) -> Vec<String> {
        self.subnet_ids.iter().filter(|s| !s.is_empty()).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBNET_A: &str = "subnet-0123456789abcdefg";
    const SUBNET_B: &str = "subnet-aaaaaaaaaaaaaaaaa";

    #[test]
    fn test_add_subnet_drops_blank_placeholder() {
        let mut form = FormState { subnet_ids: vec![String::new()], ..Default::default() };
        form.add_subnet(SUBNET_A).unwrap();
        assert_eq!(form.subnet_ids, vec![SUBNET_A.to_string()]);
    }

    #[test]
    fn test_add_subnet_rejects_duplicate_and_keeps_entries() {
        let mut form = FormState::default();
        form.add_subnet(SUBNET_A).unwrap();
        form.add_subnet(SUBNET_B).unwrap();
        assert_eq!(form.add_subnet(SUBNET_A), Err(ValidationError::DuplicateSubnet));
        assert_eq!(form.subnet_ids, vec![SUBNET_A.to_string(), SUBNET_B.to_string()]);
    }

    #[test]
    fn test_add_subnet_rejects_bad_shape() {
        let mut form = FormState::default();
        form.add_subnet(SUBNET_A).unwrap();
        assert_eq!(form.add_subnet("subnet-123"), Err(ValidationError::InvalidSubnetId));
        assert_eq!(form.add_subnet("subnet-0123456789ABCDEFG"), Err(ValidationError::InvalidSubnetId));
        assert_eq!(form.subnet_ids.len(), 1);
    }

    #[test]
    fn test_add_blank_subnet_is_rejected() {
        let mut form = FormState::default();
        assert_eq!(form.add_subnet("   "), Err(ValidationError::MissingRequiredField));
        assert!(form.subnet_ids.is_empty());
    }

    #[test]
    fn test_remove_subnet() {
        let mut form = FormState {
            subnet_ids: vec![SUBNET_A.into(), SUBNET_B.into()],
            ..Default::default()
        };
        assert_eq!(form.remove_subnet(5), None);
        assert_eq!(form.remove_subnet(0).as_deref(), Some(SUBNET_A));
        assert_eq!(form.subnet_ids, vec![SUBNET_B.to_string()]);
    }

    #[test]
    fn test_toggle_instance_type() {
        let mut form = FormState::default();
        form.toggle_instance_type("t2.micro");
        form.toggle_instance_type("m5.large");
        form.toggle_instance_type("t2.micro");
        assert_eq!(form.instance_types, vec!["m5.large".to_string()]);
    }

    #[test]
    fn test_set_instance_types_dedupes() {
        let mut form = FormState::default();
        form.set_instance_types(["c5.large", "", "t3.micro", "c5.large"]);
        assert_eq!(form.instance_types, vec!["c5.large".to_string(), "t3.micro".to_string()]);
    }
}
