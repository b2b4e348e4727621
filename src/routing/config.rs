//! Router configuration

use crate::error::{Result, RouteError};
use std::collections::HashMap;

/// Parameters of a routing search
#[derive(Debug, Clone, PartialEq)]
pub struct RouteConfig {
    /// Grid spacing between candidate positions
    pub step: f64,
    /// Discount for continuing in the current direction
    pub inertia: f64,
    /// Inspected nodes allowed before the search gives up
    pub max_expansions: usize,
}

impl Default for RouteConfig {
    fn default() -> Self {
        RouteConfig {
            step: 10.0,
            inertia: 5.0,
            max_expansions: 100_000,
        }
    }
}

impl RouteConfig {
    /// Create a validated configuration
    pub fn new(step: f64, inertia: f64) -> Result<Self> {
        let config = RouteConfig {
            step,
            inertia,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = max_expansions;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(RouteError::InvalidStep(self.step));
        }
        if !self.inertia.is_finite() || self.inertia < 0.0 {
            return Err(RouteError::InvalidInertia(self.inertia));
        }
        Ok(())
    }

    /// Configure from a parameter map. Unknown keys are ignored; on error the
    /// configuration is left unchanged.
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<()> {
        let mut next = self.clone();

        if let Some(&step) = params.get("step") {
            next.step = step;
        }

        if let Some(&inertia) = params.get("inertia") {
            next.inertia = inertia;
        }

        if let Some(&max_expansions) = params.get("max_expansions") {
            if !max_expansions.is_finite() || max_expansions < 1.0 {
                return Err(RouteError::InvalidParameter {
                    name: "max_expansions".to_string(),
                    value: max_expansions,
                });
            }
            next.max_expansions = max_expansions as usize;
        }

        next.validate()?;
        *self = next;
        Ok(())
    }
}
