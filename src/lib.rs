#![allow(clippy::result_large_err, clippy::too_many_arguments)]
#![deny(
  clippy::cast_lossless,
  clippy::cast_possible_truncation,
  clippy::cast_possible_wrap,
  clippy::cast_sign_loss
)]

use {
  self::{
    arguments::Arguments,
    config::Config,
    error::{ResultExt, SnafuError},
    options::Options,
    subcommand::{OutputFormat, Subcommand, SubcommandResult},
  },
  anyhow::{anyhow, ensure, Context, Error},
  bitcoin::{
    absolute::LockTime,
    address::{Address, NetworkUnchecked},
    key::XOnlyPublicKey,
    psbt::{self, Psbt},
    transaction::Version,
    Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness,
  },
  clap::{ArgGroup, Parser},
  ordinals::{Edict, RuneId, Runestone},
  reqwest::{header::HeaderMap, Url},
  serde::{Deserialize, Serialize},
  snafu::{Backtrace, ErrorCompat, Snafu},
  std::{
    backtrace::BacktraceStatus,
    env,
    ffi::OsString,
    fmt::{self, Display, Formatter},
    fs::File,
    io,
    path::PathBuf,
    process,
    str::FromStr,
    time::Duration,
  },
};

pub use self::{
  chain::Chain,
  error::SplitError,
  fee_oracle::FeeOracle,
  fee_rate::FeeRate,
  indexer::{Indexer, RunicBalance, RunicUtxo, Utxo},
  settings::Settings,
  splitter::{estimator::Sizing, Split, SplitRequest, Splitter},
};


#[cfg(test)]
use self::test::*;

pub mod api;
pub mod arguments;
pub mod chain;
mod config;
mod error;
mod fee_oracle;
mod fee_rate;
pub mod indexer;
pub mod options;
pub mod settings;
pub mod splitter;
pub mod subcommand;

type Result<T = (), E = Error> = std::result::Result<T, E>;
type SnafuResult<T = (), E = SnafuError> = std::result::Result<T, E>;

const TARGET_POSTAGE: Amount = Amount::from_sat(546);

pub fn base64_encode(data: &[u8]) -> String {
  use base64::Engine;
  base64::engine::general_purpose::STANDARD.encode(data)
}

fn default<T: Default>() -> T {
  Default::default()
}

pub fn main() {
  env_logger::init();

  let args = Arguments::parse();

  let format = args.options.format;

  match args.run() {
    Err(err) => {
      eprintln!("error: {err}");

      if let SnafuError::Anyhow { err } = err {
        for (i, err) in err.chain().skip(1).enumerate() {
          if i == 0 {
            eprintln!();
            eprintln!("because:");
          }

          eprintln!("- {err}");
        }

        if env::var_os("RUST_BACKTRACE")
          .map(|val| val == "1")
          .unwrap_or_default()
        {
          eprintln!("{}", err.backtrace());
        }
      } else {
        for (i, err) in err.iter_chain().skip(1).enumerate() {
          if i == 0 {
            eprintln!();
            eprintln!("because:");
          }

          eprintln!("- {err}");
        }

        if let Some(backtrace) = err.backtrace() {
          if backtrace.status() == BacktraceStatus::Captured {
            eprintln!("backtrace:");
            eprintln!("{backtrace}");
          }
        }
      }

      process::exit(1);
    }
    Ok(output) => {
      if let Some(output) = output {
        output.print(format.unwrap_or_default());
      }
    }
  }
}
