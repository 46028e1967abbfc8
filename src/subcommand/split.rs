use super::*;

#[derive(Debug, Parser)]
pub struct Split {
  #[arg(long, help = "Split runes held by <ADDRESS> and send both parts back to it.")]
  pub(crate) address: String,
  #[arg(
    long,
    help = "Use hex-encoded public key <PUBKEY> as the taproot internal key of every input."
  )]
  pub(crate) pubkey: String,
  #[arg(long, help = "Move <AMOUNT> base units of the rune to the split output.")]
  pub(crate) amount: u128,
  #[arg(long, help = "Split rune with id <RUNE_ID>, e.g. `840000:3`.")]
  pub(crate) rune_id: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
  pub psbt: String,
  pub fee: u64,
  pub fee_rate: f64,
  pub rune_inputs: Vec<OutPoint>,
  pub cardinal_inputs: Vec<OutPoint>,
  pub edicts: Vec<Edict>,
}

impl Split {
  pub(crate) fn run(self, settings: Settings) -> SubcommandResult {
    let request = SplitRequest::new(
      settings.chain(),
      &self.address,
      &self.pubkey,
      self.amount,
      &self.rune_id,
    )?;

    let indexer = settings.indexer()?;

    let cardinals = indexer.cardinal_utxos(&request.address)?;

    let runic = indexer.runic_utxos(&request.address, request.rune_id)?;

    let fee_rate = settings.fee_oracle()?.fee_rate();

    let split = settings
      .splitter()
      .split(&request, &cardinals, &runic, fee_rate)?;

    Ok(Some(Box::new(Output {
      psbt: base64_encode(&split.psbt.serialize()),
      fee: split.fee.to_sat(),
      fee_rate: split.fee_rate.n(),
      rune_inputs: split.rune_inputs,
      cardinal_inputs: split.cardinal_inputs,
      edicts: split.edicts,
    })))
  }
}
