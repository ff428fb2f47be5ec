//! `zkprove r1cs_file pk_file public_csv private_csv proof_file` -
//! produce a proof for a witness split into public and private values.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use groth16_cli::{init_tracing, read_binary, read_field_csv, write_binary};
use groth16_core::{codec, groth16_qap::r1cs_to_qap};

#[derive(Parser)]
#[command(name = "zkprove", about = "Produce a Groth16 proof")]
struct Args {
    /// Binary constraint-system file.
    r1cs_file: PathBuf,
    /// Proving key produced by zksetup.
    pk_file: PathBuf,
    /// CSV of public input values, bound to the public indices in order.
    public_csv: PathBuf,
    /// CSV of private witness values for the remaining variables.
    private_csv: PathBuf,
    /// Output path for the proof.
    proof_file: PathBuf,
}

fn run(args: &Args) -> Result<()> {
    let r1cs = codec::decode_r1cs(&read_binary(&args.r1cs_file)?)?;
    let pk = codec::decode_proving_key(&read_binary(&args.pk_file)?)?;
    let public_values = read_field_csv(&args.public_csv)?;
    let private_values = read_field_csv(&args.private_csv)?;

    let qap = r1cs_to_qap(&r1cs)?;
    let witness = r1cs.assemble_witness(&public_values, &private_values)?;
    tracing::info!(variables = witness.len(), "witness assembled");

    let proof = groth16_core::prove(&pk, &qap, &witness, &mut rand::thread_rng())?;
    write_binary(&args.proof_file, &codec::encode_proof(&proof))?;
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("zkprove: {err:#}");
            ExitCode::FAILURE
        }
    }
}
