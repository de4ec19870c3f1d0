//! `lander tier`: show which checkout tier a price maps to

use clap::Args;
use lander_common::{nearest_tier, AUTHORIZED_TIERS};
use serde::Serialize;

use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct TierArgs {
    /// Requested price in USD
    pub amount: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TierMapping {
    #[serde(rename = "amountUSD")]
    amount_usd: f64,
    tier: u32,
    authorized_tiers: Vec<u32>,
}

impl TableDisplay for TierMapping {
    fn headers() -> Vec<&'static str> {
        vec!["Requested", "Tier", "Authorized"]
    }

    fn row(&self) -> Vec<String> {
        let tiers: Vec<String> = self.authorized_tiers.iter().map(|t| format!("${}", t)).collect();
        vec![
            format!("${}", self.amount_usd),
            format!("${}", self.tier),
            tiers.join(", "),
        ]
    }
}

pub fn execute(args: TierArgs, format: OutputFormat) -> anyhow::Result<i32> {
    let tier = nearest_tier(args.amount)?;
    print_item(
        &TierMapping {
            amount_usd: args.amount,
            tier,
            authorized_tiers: AUTHORIZED_TIERS.to_vec(),
        },
        format,
    );
    Ok(0)
}
