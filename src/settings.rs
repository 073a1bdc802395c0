use std::ops::RangeInclusive;

use crate::error::{Result, SculptError};

/// Range the brush strength is kept in by interactive controls.
pub const AMOUNT_RANGE: RangeInclusive<f32> = 0.005..=1.0;
/// Range the brush radius is kept in by interactive controls.
pub const RADIUS_RANGE: RangeInclusive<u32> = 1..=10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NormalMethod {
    /// Sum of the unnormalized face normals around each vertex.
    #[default]
    AreaWeighted,
    /// Central differences over the height grid.
    CentralDifference,
}

/// Fixed layout of the sculpted grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainConfig {
    pub vertex_size: usize,
    pub cell_size: f32,
    pub normal_method: NormalMethod,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            vertex_size: 200,
            cell_size: 0.5,
            normal_method: NormalMethod::default(),
        }
    }
}

/// Brush parameters owned by whoever drives the sculptor.
///
/// Setters reject values the sculptor can't use; the `nudge_*` helpers are
/// for interactive controls and clamp into [`AMOUNT_RANGE`] / [`RADIUS_RANGE`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SculptSettings {
    amount: f32,
    radius: u32,
}

impl Default for SculptSettings {
    fn default() -> Self {
        Self {
            amount: 0.05,
            radius: 4,
        }
    }
}

impl SculptSettings {
    pub fn new(amount: f32, radius: u32) -> Result<Self> {
        let mut settings = Self::default();
        settings.set_amount(amount)?;
        settings.set_radius(radius)?;
        Ok(settings)
    }

    pub fn amount(&self) -> f32 {
        self.amount
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn set_amount(&mut self, amount: f32) -> Result<()> {
        validate_amount(amount)?;
        self.amount = amount;
        Ok(())
    }

    pub fn set_radius(&mut self, radius: u32) -> Result<()> {
        validate_radius(radius)?;
        self.radius = radius;
        Ok(())
    }

    /// Scales the amount by `factor`, clamped to [`AMOUNT_RANGE`].
    pub fn nudge_amount(&mut self, factor: f32) {
        let scaled = self.amount * factor;
        if scaled.is_finite() {
            self.amount = scaled.clamp(*AMOUNT_RANGE.start(), *AMOUNT_RANGE.end());
        }
    }

    /// Steps the radius by `step`, clamped to [`RADIUS_RANGE`].
    pub fn nudge_radius(&mut self, step: i32) {
        let stepped = self.radius as i64 + step as i64;
        self.radius = stepped.clamp(*RADIUS_RANGE.start() as i64, *RADIUS_RANGE.end() as i64) as u32;
    }
}

pub(crate) fn validate_amount(amount: f32) -> Result<()> {
    if !amount.is_finite() || amount <= 0. {
        return Err(SculptError::parameter(
            "amount",
            format!("must be a positive finite number, got {amount}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_radius(radius: u32) -> Result<()> {
    if radius < 1 {
        return Err(SculptError::parameter("radius", "must be at least 1"));
    }
    Ok(())
}
