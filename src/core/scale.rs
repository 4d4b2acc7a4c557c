use crate::error::{ChartError, ChartResult};

/// Affine map from a value domain onto a pixel band `[offset, offset + extent]`.
///
/// With `inverted` the domain start lands at the bottom of the band, which is
/// what price axes need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    offset_px: f64,
    extent_px: f64,
    inverted: bool,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64, extent_px: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !extent_px.is_finite() || extent_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "scale pixel extent must be finite and > 0".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            offset_px: 0.0,
            extent_px,
            inverted: false,
        })
    }

    /// Builds a price-style scale: values grow upwards, with headroom around the
    /// data range so extremes do not touch the band edges.
    pub fn for_prices(
        min: f64,
        max: f64,
        offset_px: f64,
        extent_px: f64,
        padding_ratio: f64,
    ) -> ChartResult<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(ChartError::InvalidData(
                "price range must be finite and ordered".to_owned(),
            ));
        }
        let span = (max - min).max(f64::EPSILON.max(max.abs() * 1e-6));
        let pad = span * padding_ratio.max(0.0);
        let mut scale = Self::new(min - pad, min + span + pad, extent_px)?;
        scale.offset_px = offset_px;
        scale.inverted = true;
        Ok(scale)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    pub fn to_pixel(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        let along = if self.inverted {
            1.0 - normalized
        } else {
            normalized
        };
        Ok(self.offset_px + along * self.extent_px)
    }

    pub fn from_pixel(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }
        let along = (pixel - self.offset_px) / self.extent_px;
        let normalized = if self.inverted { 1.0 - along } else { along };
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }
}
