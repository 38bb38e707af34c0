use serde::Serialize;

/// A catalog entry as shown in the instance type picker.
#[derive(Clone, Debug, Serialize)]
pub struct InstanceTypeOption {
    pub name: String,
    pub selected: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct SubnetRow {
    pub index: usize,
    pub subnet_id: String,
}

/// Raw field values echoed back into the form inputs.
#[derive(Clone, Debug, Default, Serialize)]
pub struct GeneratorFormData {
    pub account_id: String,
    pub launch_template_id: String,
    pub target_capacity: String,
}
