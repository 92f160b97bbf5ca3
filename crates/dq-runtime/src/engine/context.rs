use std::collections::BTreeMap;

/// Token bindings that only ever grow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationContext {
    values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlreadyBound {
    pub token: String,
    pub existing: f64,
}

impl EvaluationContext {
    pub fn bind(&mut self, token: impl Into<String>, value: f64) -> Result<(), AlreadyBound> {
        let token = token.into();
        if let Some(existing) = self.values.get(&token) {
            return Err(AlreadyBound {
                token,
                existing: *existing,
            });
        }
        self.values.insert(token, value);
        Ok(())
    }

    pub fn get(&self, token: &str) -> Option<f64> {
        self.values.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values
            .iter()
            .map(|(token, value)| (token.as_str(), *value))
    }
}
