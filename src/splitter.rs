use {super::*, estimator::Sizing};

pub mod estimator;

/// Output receiving the requested amount.
const SPLIT_OUTPUT: u32 = 2;
/// Output receiving the remaining runes.
const CHANGE_OUTPUT: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct SplitRequest {
  pub address: Address,
  pub internal_key: XOnlyPublicKey,
  pub amount: u128,
  pub rune_id: RuneId,
}

impl SplitRequest {
  pub fn new(
    chain: Chain,
    address: &str,
    pubkey: &str,
    amount: u128,
    rune_id: &str,
  ) -> Result<Self, SplitError> {
    Ok(Self {
      address: chain.address_from_str(address)?,
      internal_key: internal_key(pubkey)?,
      amount,
      rune_id: rune_id
        .parse()
        .map_err(|err: <RuneId as FromStr>::Err| SplitError::InvalidRuneId {
          input: rune_id.into(),
          reason: err.to_string(),
        })?,
    })
  }
}

/// The x-only internal key is bytes 1..33 of a serialized public key,
/// dropping the parity or format prefix.
fn internal_key(pubkey: &str) -> Result<XOnlyPublicKey, SplitError> {
  let invalid = |reason: String| SplitError::InvalidPublicKey {
    key: pubkey.into(),
    reason,
  };

  let bytes = hex::decode(pubkey).map_err(|err| invalid(err.to_string()))?;

  if bytes.len() != 33 && bytes.len() != 65 {
    return Err(invalid(format!(
      "expected 33 or 65 bytes, got {}",
      bytes.len()
    )));
  }

  XOnlyPublicKey::from_slice(&bytes[1..33]).map_err(|err| invalid(err.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Split {
  pub psbt: Psbt,
  pub fee: Amount,
  pub fee_rate: FeeRate,
  pub edicts: Vec<Edict>,
  pub rune_inputs: Vec<OutPoint>,
  pub cardinal_inputs: Vec<OutPoint>,
}

/// Assembles split transactions from already fetched outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Splitter {
  pub(crate) fee_rate_floor: FeeRate,
  pub(crate) min_funding_value: Amount,
  pub(crate) postage: Amount,
  pub(crate) sizing: Sizing,
}

impl Default for Splitter {
  fn default() -> Self {
    Self {
      fee_rate_floor: FeeOracle::FEE_RATE_FLOOR,
      min_funding_value: Self::MIN_FUNDING_VALUE,
      postage: TARGET_POSTAGE,
      sizing: Sizing::default(),
    }
  }
}

impl Splitter {
  /// Cardinal outputs must be worth more than this to fund fees.
  pub const MIN_FUNDING_VALUE: Amount = Amount::from_sat(10_000);

  pub fn split(
    &self,
    request: &SplitRequest,
    cardinals: &[Utxo],
    runic: &RunicBalance,
    fee_rate: FeeRate,
  ) -> Result<Split, SplitError> {
    if request.amount == 0 {
      return error::ZeroAmount.fail();
    }

    if runic.total < request.amount {
      return error::InsufficientTokenBalance {
        rune_id: request.rune_id,
        available: runic.total,
        requested: request.amount,
      }
      .fail();
    }

    let mut psbt = Psbt {
      unsigned_tx: Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: Vec::new(),
        output: Vec::new(),
      },
      version: 0,
      xpub: default(),
      proprietary: default(),
      unknown: default(),
      inputs: Vec::new(),
      outputs: Vec::new(),
    };

    let mut consumed = 0u128;
    let mut rune_inputs = Vec::new();

    for runic_utxo in &runic.utxos {
      if consumed >= request.amount {
        break;
      }

      add_input(&mut psbt, &runic_utxo.utxo, request.internal_key);
      rune_inputs.push(runic_utxo.utxo.outpoint);
      consumed = consumed.saturating_add(runic_utxo.amount);
    }

    if consumed < request.amount {
      return error::InsufficientTokenBalance {
        rune_id: request.rune_id,
        available: consumed,
        requested: request.amount,
      }
      .fail();
    }

    log::info!(
      "Selected {} runic outputs holding {consumed} of rune {}",
      rune_inputs.len(),
      request.rune_id,
    );

    let edicts = vec![
      Edict {
        id: request.rune_id,
        amount: request.amount,
        output: SPLIT_OUTPUT,
      },
      Edict {
        id: request.rune_id,
        amount: consumed - request.amount,
        output: CHANGE_OUTPUT,
      },
    ];

    let runestone = Runestone {
      edicts: edicts.clone(),
      ..default()
    };

    add_output(
      &mut psbt,
      TxOut {
        value: Amount::ZERO,
        script_pubkey: runestone.encipher(),
      },
    );

    for _ in [CHANGE_OUTPUT, SPLIT_OUTPUT] {
      add_output(
        &mut psbt,
        TxOut {
          value: self.postage,
          script_pubkey: request.address.script_pubkey(),
        },
      );
    }

    let fee_rate = fee_rate.at_least(self.fee_rate_floor);

    let mut funded = Amount::ZERO;
    let mut cardinal_inputs = Vec::new();

    for utxo in cardinals {
      let fee = self.sizing.estimate_fee(&psbt.unsigned_tx, fee_rate);

      if funded >= fee {
        break;
      }

      if utxo.value > self.min_funding_value {
        add_input(&mut psbt, utxo, request.internal_key);
        cardinal_inputs.push(utxo.outpoint);
        funded += utxo.value;
      }
    }

    let fee = self.sizing.estimate_fee(&psbt.unsigned_tx, fee_rate);

    if funded < fee {
      return error::InsufficientBitcoinBalance {
        available: funded,
        fee,
      }
      .fail();
    }

    log::info!(
      "Selected {} cardinal outputs worth {} sat to pay {} sat fee at {fee_rate} sat/vB",
      cardinal_inputs.len(),
      funded.to_sat(),
      fee.to_sat(),
    );

    add_output(
      &mut psbt,
      TxOut {
        value: funded - fee,
        script_pubkey: request.address.script_pubkey(),
      },
    );

    Ok(Split {
      psbt,
      fee,
      fee_rate,
      edicts,
      rune_inputs,
      cardinal_inputs,
    })
  }
}

fn add_input(psbt: &mut Psbt, utxo: &Utxo, internal_key: XOnlyPublicKey) {
  psbt.unsigned_tx.input.push(TxIn {
    previous_output: utxo.outpoint,
    script_sig: ScriptBuf::new(),
    sequence: Sequence::MAX,
    witness: Witness::new(),
  });

  psbt.inputs.push(psbt::Input {
    witness_utxo: Some(utxo.tx_out()),
    tap_internal_key: Some(internal_key),
    ..default()
  });
}

fn add_output(psbt: &mut Psbt, output: TxOut) {
  psbt.unsigned_tx.output.push(output);
  psbt.outputs.push(default());
}
