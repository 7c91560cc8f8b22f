//! Per-session symbol namespaces.

use rustc_hash::FxHashMap;
use tally_ir::RollExpression;
use tally_value::DataValue;

/// Variables (`$x`), properties (`@x`) and roll results (`#x`).
///
/// The three namespaces never collide. Roll names may also be declared
/// ahead of time with the expression they roll on first use.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    variables: FxHashMap<String, DataValue>,
    properties: FxHashMap<String, DataValue>,
    roll_results: FxHashMap<String, DataValue>,
    pending_rolls: FxHashMap<String, RollExpression>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    // Variables

    pub fn set_variable(&mut self, name: impl Into<String>, value: DataValue) {
        self.variables.insert(name.into(), value);
    }

    pub fn variable(&self, name: &str) -> Option<&DataValue> {
        self.variables.get(name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn remove_variable(&mut self, name: &str) -> Option<DataValue> {
        self.variables.remove(name)
    }

    // Properties

    pub fn set_property(&mut self, name: impl Into<String>, value: DataValue) {
        self.properties.insert(name.into(), value);
    }

    pub fn property(&self, name: &str) -> Option<&DataValue> {
        self.properties.get(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn remove_property(&mut self, name: &str) -> Option<DataValue> {
        self.properties.remove(name)
    }

    // Rolls

    /// Declare `name` to roll `expression` the first time it is resolved.
    pub fn declare_roll(&mut self, name: impl Into<String>, expression: RollExpression) {
        self.pending_rolls.insert(name.into(), expression);
    }

    /// Take the declared, not yet rolled expression for `name`.
    pub fn take_pending_roll(&mut self, name: &str) -> Option<RollExpression> {
        self.pending_rolls.remove(name)
    }

    pub fn add_roll_result(&mut self, name: impl Into<String>, value: DataValue) {
        self.roll_results.insert(name.into(), value);
    }

    pub fn roll_result(&self, name: &str) -> Option<&DataValue> {
        self.roll_results.get(name)
    }

    pub fn has_roll_result(&self, name: &str) -> bool {
        self.roll_results.contains_key(name)
    }

    // Listings, sorted by name

    pub fn variables(&self) -> Vec<(&str, &DataValue)> {
        sorted(&self.variables)
    }

    pub fn properties(&self) -> Vec<(&str, &DataValue)> {
        sorted(&self.properties)
    }

    pub fn roll_results(&self) -> Vec<(&str, &DataValue)> {
        sorted(&self.roll_results)
    }

    pub fn clear(&mut self) {
        self.variables.clear();
        self.properties.clear();
        self.roll_results.clear();
        self.pending_rolls.clear();
    }
}

fn sorted(map: &FxHashMap<String, DataValue>) -> Vec<(&str, &DataValue)> {
    let mut entries: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_namespaces_do_not_collide() {
        let mut table = SymbolTable::new();
        table.set_variable("hp", DataValue::long(1));
        table.set_property("hp", DataValue::long(2));
        table.add_roll_result("hp", DataValue::long(3));

        assert_eq!(table.variable("hp"), Some(&DataValue::long(1)));
        assert_eq!(table.property("hp"), Some(&DataValue::long(2)));
        assert_eq!(table.roll_result("hp"), Some(&DataValue::long(3)));

        assert_eq!(table.remove_variable("hp"), Some(DataValue::long(1)));
        assert!(!table.has_variable("hp"));
        assert!(table.has_property("hp"));
        assert!(table.has_roll_result("hp"));
    }

    #[test]
    fn test_pending_roll_is_taken_once() {
        let mut table = SymbolTable::new();
        table.declare_roll("roll1", RollExpression::new("2d6"));
        assert_eq!(
            table.take_pending_roll("roll1").map(|e| e.notation().to_string()),
            Some("2d6".to_string())
        );
        assert!(table.take_pending_roll("roll1").is_none());
    }

    #[test]
    fn test_listings_are_sorted() {
        let mut table = SymbolTable::new();
        table.set_variable("b", DataValue::long(2));
        table.set_variable("a", DataValue::long(1));
        let names: Vec<&str> = table.variables().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_clear() {
        let mut table = SymbolTable::new();
        table.set_property("str", DataValue::long(16));
        table.declare_roll("atk", RollExpression::new("d20"));
        table.clear();
        assert!(table.properties().is_empty());
        assert!(table.take_pending_roll("atk").is_none());
    }
}
