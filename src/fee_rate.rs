use super::*;

/// Fee rate in sat/vB.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct FeeRate(pub(crate) f64);

impl FromStr for FeeRate {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::try_from(f64::from_str(s)?)
  }
}

impl TryFrom<f64> for FeeRate {
  type Error = Error;

  fn try_from(rate: f64) -> Result<Self, Self::Error> {
    if rate.is_sign_negative() | rate.is_nan() | rate.is_infinite() {
      anyhow::bail!("invalid fee rate: {rate}")
    }
    Ok(Self(rate))
  }
}

impl From<FeeRate> for f64 {
  fn from(fee_rate: FeeRate) -> Self {
    fee_rate.0
  }
}

impl Display for FeeRate {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl FeeRate {
  pub fn n(self) -> f64 {
    self.0
  }

  pub fn at_least(self, floor: FeeRate) -> FeeRate {
    if self.0 < floor.0 {
      floor
    } else {
      self
    }
  }

  /// `floor(vsize × rate / divisor)`
  pub(crate) fn fee(self, vsize: usize, divisor: f64) -> Amount {
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    #[allow(clippy::cast_precision_loss)]
    Amount::from_sat((vsize as f64 * self.0 / divisor).floor() as u64)
  }
}
