use super::*;

/// Errors produced while fetching outputs and assembling a split.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)), visibility(pub(crate)))]
#[non_exhaustive]
pub enum SplitError {
  #[snafu(display("invalid address `{address}`"))]
  InvalidAddress { address: String },
  #[snafu(display(
    "insufficient `{rune_id}` balance: requested {requested}, only {available} available"
  ))]
  InsufficientTokenBalance {
    rune_id: RuneId,
    available: u128,
    requested: u128,
  },
  #[snafu(display(
    "insufficient bitcoin balance: selected {} sat, fee requires {} sat",
    available.to_sat(),
    fee.to_sat(),
  ))]
  InsufficientBitcoinBalance { available: Amount, fee: Amount },
  #[snafu(display("split amount must be greater than zero"))]
  ZeroAmount,
  #[snafu(display("invalid public key `{key}`: {reason}"))]
  InvalidPublicKey { key: String, reason: String },
  #[snafu(display("invalid rune id `{input}`: {reason}"))]
  InvalidRuneId { input: String, reason: String },
  #[snafu(display("indexer request to `{url}` failed"))]
  IndexerRequest { url: String, source: reqwest::Error },
  #[snafu(display("indexer returned code {code}: {message}"))]
  IndexerResponse { code: i64, message: String },
  #[snafu(display("failed to decode indexer response from `{url}`: {reason}"))]
  IndexerDecode { url: String, reason: String },
}

#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)), visibility(pub(crate)))]
pub(crate) enum SnafuError {
  #[snafu(display("{err}"))]
  Anyhow { err: anyhow::Error },
  #[snafu(display(
    "environment variable `{variable}` not valid unicode: `{}`",
    value.to_string_lossy()
  ))]
  EnvVarUnicode {
    backtrace: Backtrace,
    value: OsString,
    variable: String,
  },
  #[snafu(display("I/O error at `{}`", path.display()))]
  Io {
    backtrace: Backtrace,
    path: PathBuf,
    source: io::Error,
  },
  #[snafu(display("failed to parse config file `{}`", path.display()))]
  ConfigParse {
    backtrace: Backtrace,
    path: PathBuf,
    source: serde_yaml::Error,
  },
}

impl From<Error> for SnafuError {
  fn from(err: Error) -> SnafuError {
    Self::Anyhow { err }
  }
}

impl From<SplitError> for SnafuError {
  fn from(err: SplitError) -> SnafuError {
    Self::Anyhow { err: err.into() }
  }
}

/// `anyhow::Context` shadows `snafu::ResultExt::{context, with_context}`
/// in this crate, so snafu contexts are attached through this trait.
pub(crate) trait ResultExt<T, E>: Sized {
  fn snafu_context<C, E2>(self, context: C) -> Result<T, E2>
  where
    C: snafu::IntoError<E2, Source = E>,
    E2: std::error::Error + snafu::ErrorCompat;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E> {
  fn snafu_context<C, E2>(self, context: C) -> Result<T, E2>
  where
    C: snafu::IntoError<E2, Source = E>,
    E2: std::error::Error + snafu::ErrorCompat,
  {
    use snafu::ResultExt;
    self.context(context)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn insufficient_token_balance_message() {
    assert_eq!(
      SplitError::InsufficientTokenBalance {
        rune_id: RuneId { block: 840000, tx: 3 },
        available: 10,
        requested: 11,
      }
      .to_string(),
      "insufficient `840000:3` balance: requested 11, only 10 available",
    );
  }

  #[test]
  fn insufficient_bitcoin_balance_message() {
    assert_eq!(
      SplitError::InsufficientBitcoinBalance {
        available: Amount::from_sat(5_000),
        fee: Amount::from_sat(26_250),
      }
      .to_string(),
      "insufficient bitcoin balance: selected 5000 sat, fee requires 26250 sat",
    );
  }

  #[test]
  fn split_errors_convert_into_anyhow_snafu_errors() {
    assert_matches!(
      SnafuError::from(SplitError::ZeroAmount),
      SnafuError::Anyhow { .. }
    );
  }
}
