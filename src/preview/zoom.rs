use crate::core::{Result, SyncError};

/// Inclusive zoom bounds and step size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub initial: f64,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 3.0,
            step: 0.25,
            initial: 1.0,
        }
    }
}

impl ZoomRange {
    pub fn new(min: f64, max: f64, step: f64, initial: f64) -> Result<Self> {
        let range = Self {
            min,
            max,
            step,
            initial,
        };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [self.min, self.max, self.step, self.initial]
            .iter()
            .all(|value| value.is_finite());
        if !finite {
            return Err(SyncError::Config("zoom bounds must be finite".to_string()));
        }
        if self.min <= 0.0 || self.min > self.max {
            return Err(SyncError::Config(format!(
                "invalid zoom range {}..={}",
                self.min, self.max
            )));
        }
        if self.step <= 0.0 {
            return Err(SyncError::Config("zoom step must be positive".to_string()));
        }
        if !(self.min..=self.max).contains(&self.initial) {
            return Err(SyncError::Config(format!(
                "initial zoom {} outside {}..={}",
                self.initial, self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn clamp(&self, factor: f64) -> f64 {
        factor.clamp(self.min, self.max)
    }
}

/// Zoom factor of a preview, always inside its range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    range: ZoomRange,
    factor: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new(ZoomRange::default())
    }
}

impl ZoomState {
    pub fn new(range: ZoomRange) -> Self {
        Self {
            factor: range.clamp(range.initial),
            range,
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn percent(&self) -> u32 {
        (self.factor * 100.0).round() as u32
    }

    pub fn range(&self) -> &ZoomRange {
        &self.range
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set(self.factor + self.range.step)
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set(self.factor - self.range.step)
    }

    pub fn set(&mut self, factor: f64) -> f64 {
        if factor.is_finite() {
            self.factor = self.range.clamp(factor);
        }
        self.factor
    }

    pub fn reset(&mut self) {
        self.factor = self.range.clamp(self.range.initial);
    }

    pub fn can_zoom_in(&self) -> bool {
        self.factor < self.range.max
    }

    pub fn can_zoom_out(&self) -> bool {
        self.factor > self.range.min
    }
}
