use super::DataValue;

/// Breakdown of a dice roll.
///
/// `value` is what arithmetic sees; `details` is the human-readable
/// breakdown; `individual_values` are the single draws.
#[derive(Clone, Debug, PartialEq)]
pub struct RollResult {
    value: DataValue,
    details: String,
    individual_values: Vec<DataValue>,
}

impl RollResult {
    pub fn new(value: DataValue) -> Self {
        RollResult {
            value,
            details: String::new(),
            individual_values: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    #[must_use]
    pub fn with_individual_values(mut self, values: Vec<DataValue>) -> Self {
        self.individual_values = values;
        self
    }

    pub fn value(&self) -> &DataValue {
        &self.value
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn individual_values(&self) -> &[DataValue] {
        &self.individual_values
    }
}
