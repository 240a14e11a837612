//! Audit trail records.
//!
//! Every formula application produces an [`AuditStep`] so a computed value
//! can be traced back to the rule, its inputs and the legal reference.

use serde::{Deserialize, Serialize};

/// Represents a single step in the calculation audit trail.
///
/// # Example
///
/// ```
/// use planilla_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "essalud_plame_days".to_string(),
///     rule_name: "PLAME Days".to_string(),
///     legal_ref: "PLAME".to_string(),
///     input: serde_json::json!({"month_days": "30", "subsidy_days": "5"}),
///     output: serde_json::json!({"plame_days": "25"}),
///     reasoning: "30 - 5 = 25".to_string(),
/// };
/// assert_eq!(step.rule_id, "essalud_plame_days");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequence number of this step within the calculation.
    pub step_number: u32,
    /// A machine-readable identifier for the rule applied.
    pub rule_id: String,
    /// A human-readable name for the rule applied.
    pub rule_name: String,
    /// Reference to the regulation or form the rule comes from.
    pub legal_ref: String,
    /// The input values used by this rule.
    pub input: serde_json::Value,
    /// The output values produced by this rule.
    pub output: serde_json::Value,
    /// A human-readable explanation of the calculation.
    pub reasoning: String,
}
