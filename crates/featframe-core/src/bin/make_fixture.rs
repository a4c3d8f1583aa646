//! Writes a small sample feature file for manual CLI runs.
//!
//! Layout matches the decoder's expectation: i32 LE frame count, then one
//! contiguous little-endian value block per feature. The sample uses the
//! two-feature schema from the integration tests (pitch: float, energy: int).

use std::env;
use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "sample.featframe".to_string());

    let pitch = [1.5f32, 2.5, 3.5];
    let energy = [7i32, 9, 11];

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(pitch.len() as i32).to_le_bytes());
    for value in pitch {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    for value in energy {
        bytes.extend_from_slice(&value.to_le_bytes());
    }

    fs::write(&path, bytes).map_err(|err| format!("failed to write {}: {}", path, err))?;
    eprintln!("wrote {} ({} frames)", path, pitch.len());
    Ok(())
}
