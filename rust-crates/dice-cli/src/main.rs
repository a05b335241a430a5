use clap::{
    Parser,
    Subcommand,
};
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use fair_dice::{
    Outcome,
    ProofBundle,
    Roll,
    Verification,
    payout,
};
use rand::{
    Rng,
    distr::Alphanumeric,
};
use tracing_subscriber::EnvFilter;

mod client;

const CLIENT_SEED_LEN: usize = 16;
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Parser, Debug)]
#[command(version, about = "Play and verify provably fair dice rounds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bet against a dice server, then check the revealed round locally.
    Roll {
        #[arg(long, default_value = DEFAULT_SERVER_URL)]
        server_url: String,
        #[arg(long)]
        bet: u64,
        #[arg(long)]
        balance: u64,
        /// Generated at random when omitted.
        #[arg(long)]
        client_seed: Option<String>,
        #[arg(long, default_value_t = 0)]
        nonce: u64,
    },
    /// Check a previously revealed round without contacting the server.
    Verify {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long)]
        hash_proof: String,
        #[arg(long)]
        roll: u8,
        #[arg(long, default_value_t = 0)]
        nonce: u64,
    },
}

fn random_client_seed() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CLIENT_SEED_LEN)
        .map(char::from)
        .collect()
}

fn print_verification(verification: &Verification) {
    let mark = |ok: bool| if ok { "ok" } else { "MISMATCH" };
    println!(
        "commitment: {}\nroll:       {} (expected {})",
        mark(verification.commitment_matches),
        mark(verification.roll_matches),
        verification.expected_roll,
    );
}

async fn run_roll(
    server_url: String,
    bet: u64,
    balance: u64,
    client_seed: Option<String>,
    nonce: u64,
) -> Result<()> {
    let client_seed = client_seed.unwrap_or_else(random_client_seed);
    tracing::debug!(%client_seed, nonce, "submitting bet");
    let client = client::DiceClient::new(server_url)?;
    let round = client.roll(bet, balance, &client_seed, nonce).await?;

    let outcome = match Outcome::of(round.proof.roll) {
        Outcome::Win => "win",
        Outcome::Loss => "loss",
    };
    println!(
        "rolled {} ({outcome}), balance {balance} -> {}",
        round.proof.roll, round.new_balance
    );
    println!(
        "server seed: {}\nhash proof:  {}\nclient seed: {}\nnonce:       {}",
        round.proof.server_seed, round.proof.hash_proof, round.proof.client_seed, round.proof.nonce
    );

    let verification =
        fair_dice::verify(&round.proof).wrap_err("server returned a malformed proof")?;
    print_verification(&verification);

    let expected_balance = balance
        .saturating_sub(bet)
        .saturating_add(payout::payout(round.proof.roll, bet));
    if round.proof.client_seed != client_seed || round.proof.nonce != nonce {
        return Err(eyre!("server did not echo the submitted client seed and nonce"));
    }
    if round.new_balance != expected_balance {
        return Err(eyre!(
            "server settled to {} but the pay table gives {expected_balance}",
            round.new_balance
        ));
    }
    if !verification.is_fair() {
        return Err(eyre!("round failed verification"));
    }
    println!("round verified");
    Ok(())
}

fn run_verify(
    server_seed: String,
    client_seed: String,
    hash_proof: String,
    roll: u8,
    nonce: u64,
) -> Result<()> {
    let roll =
        Roll::new(roll).ok_or_else(|| eyre!("roll must be between 1 and 6, got {roll}"))?;
    let bundle = ProofBundle {
        roll,
        server_seed,
        hash_proof,
        client_seed,
        nonce,
    };
    let verification = fair_dice::verify(&bundle)?;
    print_verification(&verification);
    if !verification.is_fair() {
        return Err(eyre!("round failed verification"));
    }
    println!("round verified");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init();
    let cli = Cli::parse();
    match cli.command {
        Command::Roll {
            server_url,
            bet,
            balance,
            client_seed,
            nonce,
        } => run_roll(server_url, bet, balance, client_seed, nonce).await,
        Command::Verify {
            server_seed,
            client_seed,
            hash_proof,
            roll,
            nonce,
        } => run_verify(server_seed, client_seed, hash_proof, roll, nonce),
    }
}
