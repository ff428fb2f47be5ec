//! `zkverify vk_file public_csv proof_file` - check a proof.
//!
//! Exits 0 when the proof verifies; 1 on any failure, an invalid proof
//! included.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use groth16_cli::{init_tracing, read_binary, read_field_csv};
use groth16_core::codec;

#[derive(Parser)]
#[command(name = "zkverify", about = "Verify a Groth16 proof")]
struct Args {
    /// Verifying key produced by zksetup.
    vk_file: PathBuf,
    /// CSV of public input values.
    public_csv: PathBuf,
    /// Proof produced by zkprove.
    proof_file: PathBuf,
}

fn run(args: &Args) -> Result<bool> {
    let vk = codec::decode_verifying_key(&read_binary(&args.vk_file)?)?;
    let public_values = read_field_csv(&args.public_csv)?;
    let proof = codec::decode_proof(&read_binary(&args.proof_file)?)?;
    Ok(groth16_core::verify(&vk, &public_values, &proof)?)
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    match run(&args) {
        Ok(true) => {
            println!("proof verified");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!("proof invalid");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("zkverify: {err:#}");
            ExitCode::FAILURE
        }
    }
}
