/// Error types for form validation and configuration import
use thiserror::Error;

/// Rejections produced while validating or editing the form.
///
/// The display strings are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is empty (or the subnet list only holds a blank entry)
    #[error("Please fill in all required fields")]
    MissingRequiredField,

    /// Account ID is not exactly 12 ASCII digits
    #[error("AWS Account ID must be exactly 12 digits")]
    InvalidAccountId,

    /// Launch template ID does not look like `lt-` + 17 lowercase alphanumerics
    #[error("AWS EC2 Launch Templates must start with \"lt-\" and be followed by 17 characters")]
    InvalidLaunchTemplateId,

    /// No subnet ID has been provided
    #[error("You must add at least one subnet ID")]
    NoSubnets,

    /// The subnet ID is already part of the form
    #[error("This subnet ID is already added")]
    DuplicateSubnet,

    /// Subnet ID does not look like `subnet-` + 17 lowercase alphanumerics
    #[error("AWS VPC Subnets must start with \"subnet-\" and be followed by 17 characters")]
    InvalidSubnetId,
}

/// Failures when turning a Spot Fleet request document back into form state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// Required structure is missing or has the wrong JSON type
    #[error("Malformed Spot Fleet document: {0}")]
    MalformedDocument(String),

    /// The document decoded fine but the values it carries are invalid
    #[error("Imported configuration is invalid: {0}")]
    ValidationFailed(#[from] ValidationError),
}
