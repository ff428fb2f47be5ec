//! `zksetup r1cs_file pk_file vk_file` - derive a reference string.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use groth16_cli::{init_tracing, read_binary, write_binary};
use groth16_core::codec;

#[derive(Parser)]
#[command(name = "zksetup", about = "Derive Groth16 proving and verifying keys")]
struct Args {
    /// Binary constraint-system file.
    r1cs_file: PathBuf,
    /// Output path for the proving key.
    pk_file: PathBuf,
    /// Output path for the verifying key.
    vk_file: PathBuf,
}

fn run(args: &Args) -> Result<()> {
    let r1cs = codec::decode_r1cs(&read_binary(&args.r1cs_file)?)?;
    tracing::info!(
        constraints = r1cs.n_cons,
        variables = r1cs.n_vars,
        public = r1cs.public_indices.len(),
        "constraint system loaded"
    );

    let crs = groth16_core::setup(&r1cs, &mut rand::thread_rng())?;

    write_binary(&args.pk_file, &codec::encode_proving_key(&crs.pk))?;
    write_binary(&args.vk_file, &codec::encode_verifying_key(&crs.vk))?;
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("zksetup: {err:#}");
            ExitCode::FAILURE
        }
    }
}
